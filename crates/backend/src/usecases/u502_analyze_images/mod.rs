pub mod executor;

pub use executor::{analyze_product_images, AnalyzeImagesExecutor, CatalogImageAnalyzer, ImageAnalyzer};
