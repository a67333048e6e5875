pub mod common;

pub mod a001_connection;
pub mod a002_llm_agent;
pub mod a003_product;
pub mod a004_sku;
pub mod a005_image_analysis;
pub mod a006_generated_content;
