use super::repository;
use crate::shared::logger;
use contracts::domain::a006_generated_content::aggregate::{
    ContentKind, ContentStatus, GeneratedContent,
};

pub async fn save_draft(content: &mut GeneratedContent) -> anyhow::Result<()> {
    content
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    content.before_write();
    repository::insert(content).await
}

pub async fn list_by_product(product_ref: &str) -> anyhow::Result<Vec<GeneratedContent>> {
    repository::list_by_product(product_ref).await
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<GeneratedContent>> {
    repository::find_by_id(id).await
}

/// Последний одобренный контент вида (кандидат на публикацию)
pub async fn latest_approved(
    product_ref: &str,
    kind: ContentKind,
) -> anyhow::Result<Option<GeneratedContent>> {
    repository::find_latest(product_ref, kind, ContentStatus::Approved).await
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

/// Сменить статус: ошибка перехода возвращается как Ok(Err) для ответа 409
async fn change_status(
    id: &str,
    apply: fn(&mut GeneratedContent) -> Result<(), String>,
) -> anyhow::Result<Option<Result<GeneratedContent, String>>> {
    let Some(mut content) = repository::find_by_id(id).await? else {
        return Ok(None);
    };
    if let Err(e) = apply(&mut content) {
        return Ok(Some(Err(e)));
    }
    content.before_write();
    repository::update(&content).await?;

    for event in content.base.events.drain() {
        logger::log("a006", &format!("{} {}: {}", content.base.code, event, content.product_ref));
    }
    Ok(Some(Ok(content)))
}

pub async fn approve(id: &str) -> anyhow::Result<Option<Result<GeneratedContent, String>>> {
    change_status(id, GeneratedContent::approve).await
}

pub async fn reject(id: &str) -> anyhow::Result<Option<Result<GeneratedContent, String>>> {
    change_status(id, GeneratedContent::reject).await
}

/// Отметить контент опубликованным (после успешного PATCH в Anymarket)
pub async fn mark_published(content: &mut GeneratedContent) -> anyhow::Result<()> {
    content
        .mark_published()
        .map_err(|e| anyhow::anyhow!(e))?;
    content.before_write();
    repository::update(content).await?;
    content.base.events.drain();
    Ok(())
}
