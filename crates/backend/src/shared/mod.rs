pub mod config;
pub mod data;
pub mod format;
pub mod integrations;
pub mod llm;
pub mod logger;
pub mod media;
