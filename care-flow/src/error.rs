use thiserror::Error;

/// Errors surfaced by workflow tasks and the runner that drives them
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Caller-side input check failed; no remote call was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The remote service call itself failed
    #[error("Upstream call failed: {0}")]
    Upstream(String),

    /// The remote call succeeded but the payload did not match the expected shape
    #[error("Response format error: {0}")]
    ResponseFormat(String),

    /// A request is already in flight and the runner does not supersede
    #[error("A request is already in flight")]
    Busy,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl FlowError {
    /// Stable label used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            FlowError::InvalidInput(_) => "invalid_input",
            FlowError::Upstream(_) => "upstream",
            FlowError::ResponseFormat(_) => "response_format",
            FlowError::Busy => "busy",
            FlowError::Configuration(_) => "configuration",
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
