pub mod gateway;
pub mod geolocation;
pub mod grounding;
pub mod models;
pub mod schema;
pub mod tasks;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use gateway::{GatewayConfig, GatewayError, GeminiGateway};
pub use grounding::{Citation, DisplayCitation, displayable_citations};
pub use models::*;
pub use workflow::{
    HealthAssistant, ProviderRunner, RiskRunner, SymptomRunner, create_provider_runner,
    create_risk_runner, create_symptom_runner,
};
