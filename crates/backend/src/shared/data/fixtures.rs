//! Наполнение тестовой БД: товар, SKU с картинками, LLM агент

use crate::domain::a002_llm_agent::service::{self as agents, LlmAgentDto};
use crate::domain::{a003_product, a004_sku};
use contracts::domain::a003_product::aggregate::Product;
use contracts::domain::a004_sku::aggregate::{Sku, SkuImage};
use contracts::enums::AgentPurpose;

pub async fn product(vtex_product_id: i64, name: &str) -> Product {
    let mut product = Product::new_for_vtex(vtex_product_id, name.to_string());
    product.brand_name = Some("Olympikus".into());
    a003_product::service::save_imported(&mut product)
        .await
        .unwrap();
    product
}

pub async fn sku(product: &Product, vtex_sku_id: i64, ref_id: Option<&str>, images: &[&str]) -> Sku {
    let mut sku = Sku::new_for_vtex(
        product.to_string_id(),
        product.vtex_product_id,
        vtex_sku_id,
        format!("{} {}", product.display_name(), vtex_sku_id),
    );
    sku.ref_id = ref_id.map(str::to_string);
    sku.images = images
        .iter()
        .map(|url| SkuImage {
            url: url.to_string(),
            name: None,
            label: None,
        })
        .collect();
    a004_sku::service::save_imported(&mut sku).await.unwrap();
    sku
}

pub fn agent_dto(code: &str, purpose: AgentPurpose, is_primary: bool) -> LlmAgentDto {
    LlmAgentDto {
        id: None,
        code: Some(code.to_string()),
        description: format!("Agent {}", code),
        comment: None,
        provider_type: "OpenAI".into(),
        api_endpoint: "https://api.openai.com/v1".into(),
        api_key: "sk-test-key".into(),
        model_name: "gpt-4o".into(),
        temperature: 0.2,
        max_tokens: 1024,
        system_prompt: Some("Você descreve fotos de produtos.".into()),
        prompt_template: "Analise {{product_name}} da marca {{brand}}".into(),
        purpose,
        is_primary,
    }
}

/// Создать агента и вернуть его ID строкой
pub async fn agent(code: &str, purpose: AgentPurpose, is_primary: bool) -> String {
    agents::create(agent_dto(code, purpose, is_primary))
        .await
        .unwrap()
        .to_string()
}
