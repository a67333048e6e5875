pub mod agent_purpose;
pub mod integration_kind;

pub use agent_purpose::AgentPurpose;
pub use integration_kind::IntegrationKind;
