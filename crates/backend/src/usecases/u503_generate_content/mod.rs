pub mod executor;

pub use executor::{generate_for_product, GenerateBatchExecutor};
