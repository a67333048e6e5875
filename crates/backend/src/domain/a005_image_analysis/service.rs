use super::repository;
use contracts::domain::a005_image_analysis::aggregate::ImageAnalysis;

pub async fn save(analysis: &mut ImageAnalysis) -> anyhow::Result<()> {
    analysis
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    analysis.before_write();
    repository::insert(analysis).await
}

pub async fn list(product_ref: Option<&str>) -> anyhow::Result<Vec<ImageAnalysis>> {
    repository::list(product_ref, 500).await
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<ImageAnalysis>> {
    repository::find_by_id(id).await
}

pub async fn latest_for_product(product_ref: &str) -> anyhow::Result<Option<ImageAnalysis>> {
    repository::find_latest(product_ref).await
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}
