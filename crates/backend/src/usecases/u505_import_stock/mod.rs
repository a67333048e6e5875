pub mod csv_source;
pub mod executor;

pub use executor::StockImportExecutor;
