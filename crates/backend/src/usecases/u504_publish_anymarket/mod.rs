pub mod executor;

pub use executor::PublishExecutor;
