//! Gateway configuration, read once at startup and injected into the client.

use std::fmt;

use super::error::{GatewayError, Result};
use super::validation::{ProbabilityPolicy, RiskScorePolicy, ValidationPolicy};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_SYMPTOM_MODEL: &str = "gemini-2.5-flash";
/// Risk assessment uses the larger model for multi-factor reasoning
pub const DEFAULT_RISK_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_PROVIDER_MODEL: &str = "gemini-2.5-flash";

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const FALLBACK_API_KEY_VAR: &str = "API_KEY";
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
pub const SYMPTOM_MODEL_VAR: &str = "GEMINI_SYMPTOM_MODEL";
pub const RISK_MODEL_VAR: &str = "GEMINI_RISK_MODEL";
pub const PROVIDER_MODEL_VAR: &str = "GEMINI_PROVIDER_MODEL";
pub const RISK_SCORE_POLICY_VAR: &str = "RISK_SCORE_POLICY";
pub const PROBABILITY_POLICY_VAR: &str = "PROBABILITY_POLICY";

/// Model identifier used by each workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub symptoms: String,
    pub risk: String,
    pub providers: String,
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self {
            symptoms: DEFAULT_SYMPTOM_MODEL.to_string(),
            risk: DEFAULT_RISK_MODEL.to_string(),
            providers: DEFAULT_PROVIDER_MODEL.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub base_url: String,
    pub models: ModelSelection,
    pub validation: ValidationPolicy,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("models", &self.models)
            .field("validation", &self.validation)
            .finish()
    }
}

impl GatewayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            models: ModelSelection::default(),
            validation: ValidationPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_models(mut self, models: ModelSelection) -> Self {
        self.models = models;
        self
    }

    pub fn with_validation(mut self, validation: ValidationPolicy) -> Self {
        self.validation = validation;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = read(API_KEY_VAR)
            .or_else(|| read(FALLBACK_API_KEY_VAR))
            .ok_or_else(|| {
                GatewayError::Config(format!(
                    "{} (or {}) environment variable is required",
                    API_KEY_VAR, FALLBACK_API_KEY_VAR
                ))
            })?;

        let defaults = ModelSelection::default();
        let models = ModelSelection {
            symptoms: read(SYMPTOM_MODEL_VAR).unwrap_or(defaults.symptoms),
            risk: read(RISK_MODEL_VAR).unwrap_or(defaults.risk),
            providers: read(PROVIDER_MODEL_VAR).unwrap_or(defaults.providers),
        };

        let risk_score = match read(RISK_SCORE_POLICY_VAR) {
            Some(value) => value.parse::<RiskScorePolicy>()?,
            None => RiskScorePolicy::default(),
        };
        let probability = match read(PROBABILITY_POLICY_VAR) {
            Some(value) => value.parse::<ProbabilityPolicy>()?,
            None => ProbabilityPolicy::default(),
        };

        Ok(Self {
            api_key,
            base_url: read(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            models,
            validation: ValidationPolicy {
                risk_score,
                probability,
            },
        })
    }
}
