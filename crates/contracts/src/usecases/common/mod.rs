//! Common types and traits for all UseCases

pub mod batch_report;
pub mod usecase_metadata;

// Re-exports
pub use batch_report::{BatchItemResult, BatchReport};
pub use usecase_metadata::UseCaseMetadata;
