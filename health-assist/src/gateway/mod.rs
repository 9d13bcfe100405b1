pub mod client;
pub mod config;
pub mod error;
pub mod transport;
pub mod validation;
pub mod wire;

pub use client::{GeminiGateway, GroundedResponse, SYMPTOM_SYSTEM_INSTRUCTION};
pub use config::{GatewayConfig, ModelSelection};
pub use error::GatewayError;
pub use transport::{HttpTransport, ModelTransport};
pub use validation::{ProbabilityPolicy, RiskScorePolicy, ValidationPolicy};
