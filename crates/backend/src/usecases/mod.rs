pub mod common;

pub mod u501_import_from_vtex;
pub mod u502_analyze_images;
pub mod u503_generate_content;
pub mod u504_publish_anymarket;
pub mod u505_import_stock;
