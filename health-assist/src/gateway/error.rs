use care_flow::FlowError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Network, auth, quota or any non-success status from the remote service
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The call succeeded but the payload is absent or has the wrong shape
    #[error("Response format error: {0}")]
    ResponseFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Upstream(_) => "upstream",
            GatewayError::ResponseFormat(_) => "response_format",
            GatewayError::Config(_) => "configuration",
        }
    }
}

impl From<GatewayError> for FlowError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Upstream(msg) => FlowError::Upstream(msg),
            GatewayError::ResponseFormat(msg) => FlowError::ResponseFormat(msg),
            GatewayError::Config(msg) => FlowError::Configuration(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
