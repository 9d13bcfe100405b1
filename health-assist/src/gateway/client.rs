use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::config::GatewayConfig;
use super::error::{GatewayError, Result};
use super::transport::{HttpTransport, ModelTransport};
use super::validation::{parse_risk_prediction, parse_symptom_response};
use super::wire::{GenerateContentRequest, Tool};
use crate::grounding::Citation;
use crate::models::{GeoCoordinate, RiskPredictionResult, SymptomResponse};
use crate::schema::{risk_prediction_schema, symptom_response_schema};

pub const SYMPTOM_SYSTEM_INSTRUCTION: &str = "You are a helpful AI medical assistant. You are not a doctor. \
Always include a disclaimer that this is not a medical diagnosis.";

/// Narrative answer of a grounded search plus the sources it cites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundedResponse {
    pub text: Option<String>,
    pub citations: Vec<Citation>,
}

/// Client for the three remote workflows
///
/// Holds no per-request state; clones share the config and transport.
#[derive(Clone)]
pub struct GeminiGateway {
    config: Arc<GatewayConfig>,
    transport: Arc<dyn ModelTransport>,
}

impl GeminiGateway {
    /// Gateway over the HTTPS transport
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn ModelTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Candidate conditions for a free-text symptom description.
    ///
    /// The caller trims and rejects empty input.
    pub async fn analyze_symptoms(&self, symptoms: &str) -> Result<SymptomResponse> {
        let model = &self.config.models.symptoms;
        info!(workflow = "symptoms", model = %model, "Starting symptom analysis");

        let request = GenerateContentRequest::from_prompt(format!(
            "Analyze the following symptoms and provide possible conditions, urgency, and advice.\nSymptoms: {}",
            symptoms
        ))
        .with_system_instruction(SYMPTOM_SYSTEM_INSTRUCTION)
        .with_response_schema(symptom_response_schema());

        let payload = self.structured_call("symptoms", model, &request).await?;
        let response = parse_symptom_response(&payload, &self.config.validation)
            .inspect_err(|e| warn!(workflow = "symptoms", error_kind = e.kind(), "{}", e))?;

        info!(
            workflow = "symptoms",
            conditions = response.analysis.len(),
            "Symptom analysis completed"
        );
        Ok(response)
    }

    /// Risk assessment for a free-text profile summary
    pub async fn predict_health_risk(&self, profile: &str) -> Result<RiskPredictionResult> {
        let model = &self.config.models.risk;
        info!(workflow = "risk", model = %model, "Starting risk prediction");

        let request = GenerateContentRequest::from_prompt(format!(
            "Evaluate the health risk based on this profile: {}",
            profile
        ))
        .with_response_schema(risk_prediction_schema());

        let payload = self.structured_call("risk", model, &request).await?;
        let result = parse_risk_prediction(&payload, &self.config.validation)
            .inspect_err(|e| warn!(workflow = "risk", error_kind = e.kind(), "{}", e))?;

        info!(
            workflow = "risk",
            risk_score = result.risk_score,
            risk_level = %result.risk_level,
            "Risk prediction completed"
        );
        Ok(result)
    }

    /// Maps-grounded search for providers, optionally biased towards a position.
    ///
    /// No schema is requested, so only upstream failures are errors. Citations
    /// are returned unfiltered.
    pub async fn find_nearby_providers(
        &self,
        query: &str,
        coordinate: Option<GeoCoordinate>,
    ) -> Result<GroundedResponse> {
        let model = &self.config.models.providers;
        info!(
            workflow = "providers",
            model = %model,
            has_coordinate = coordinate.is_some(),
            "Starting provider search"
        );

        let mut request = GenerateContentRequest::from_prompt(format!(
            "Find {}. Provide a list of highly rated places.",
            query
        ))
        .with_tool(Tool::google_maps());
        if let Some(coordinate) = coordinate {
            request = request.with_retrieval_bias(coordinate);
        }

        let response = self.call("providers", model, &request).await?;
        let text = response.text();
        let citations: Vec<Citation> = response
            .into_grounding_chunks()
            .into_iter()
            .map(Citation::from)
            .collect();

        info!(
            workflow = "providers",
            citations = citations.len(),
            has_text = text.is_some(),
            "Provider search completed"
        );
        Ok(GroundedResponse { text, citations })
    }

    async fn call(
        &self,
        workflow: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<super::wire::GenerateContentResponse> {
        self.transport
            .generate_content(model, request)
            .await
            .inspect_err(|e| {
                error!(workflow = %workflow, error_kind = e.kind(), "Remote call failed: {}", e)
            })
    }

    /// Text payload of a structured call; a missing payload is a format error
    async fn structured_call(
        &self,
        workflow: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String> {
        let response = self.call(workflow, model, request).await?;

        response.text().ok_or_else(|| {
            let reason = response
                .block_reason()
                .or(response.finish_reason())
                .unwrap_or("no candidates");
            warn!(workflow = %workflow, reason = %reason, "No response text generated");
            GatewayError::ResponseFormat(format!("No response text generated ({})", reason))
        })
    }
}
