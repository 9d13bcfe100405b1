use async_trait::async_trait;
use care_flow::{FlowError, Result, Task};
use tracing::info;

use crate::gateway::GeminiGateway;
use crate::models::{RiskPredictionResult, RiskProfile};

pub struct RiskAssessmentTask {
    gateway: GeminiGateway,
}

impl RiskAssessmentTask {
    pub fn new(gateway: GeminiGateway) -> Self {
        Self { gateway }
    }
}

/// Required form fields must hold a positive number
fn require_positive(label: &str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FlowError::InvalidInput(format!("{} is required", label)));
    }
    match value.parse::<f64>() {
        Ok(n) if n > 0.0 => Ok(()),
        _ => Err(FlowError::InvalidInput(format!(
            "{} must be a positive number",
            label
        ))),
    }
}

#[async_trait]
impl Task for RiskAssessmentTask {
    type Input = RiskProfile;
    type Output = RiskPredictionResult;

    fn id(&self) -> &str {
        "risk_assessment"
    }

    fn validate(&self, profile: &RiskProfile) -> Result<()> {
        require_positive("Age", &profile.age)?;
        require_positive("Weight", &profile.weight_kg)?;
        require_positive("Height", &profile.height_cm)?;
        Ok(())
    }

    fn failure_message(&self) -> &str {
        "Error generating prediction. Please try again."
    }

    async fn run(&self, profile: RiskProfile) -> Result<RiskPredictionResult> {
        info!(task_id = %self.id(), "Running risk assessment");
        let result = self.gateway.predict_health_risk(&profile.summary()).await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskBand, SmokingStatus};
    use crate::testing::{RISK_PAYLOAD, StubTransport, gateway_with};
    use care_flow::{FlowRunner, RequestStatus};
    use std::sync::Arc;

    fn profile() -> RiskProfile {
        RiskProfile {
            age: "58".to_string(),
            weight_kg: "96".to_string(),
            height_cm: "175".to_string(),
            smoker: SmokingStatus::Yes,
            ..RiskProfile::default()
        }
    }

    #[tokio::test]
    async fn test_high_score_bands_high() {
        let transport = StubTransport::text(RISK_PAYLOAD);
        let runner = FlowRunner::new(Arc::new(RiskAssessmentTask::new(gateway_with(
            transport.clone(),
        ))));

        let snapshot = runner.submit(profile()).await.unwrap();

        assert_eq!(snapshot.status, RequestStatus::Settled);
        let result = snapshot.result.unwrap();
        assert_eq!(result.risk_score, 72);
        assert_eq!(result.band(), RiskBand::High);
        assert_eq!(result.recommendations.len(), 2);

        let (_, request) = transport.last_call();
        assert!(request.prompt_text().unwrap().contains("Smoker: Yes"));
    }

    #[tokio::test]
    async fn test_missing_required_fields_block_submission() {
        let transport = StubTransport::text(RISK_PAYLOAD);
        let task = Arc::new(RiskAssessmentTask::new(gateway_with(transport.clone())));
        let runner = FlowRunner::new(task);

        let no_age = RiskProfile {
            age: String::new(),
            ..profile()
        };
        let err = runner.submit(no_age).await.unwrap_err();
        assert_eq!(err, FlowError::InvalidInput("Age is required".to_string()));

        let bad_height = RiskProfile {
            height_cm: "tall".to_string(),
            ..profile()
        };
        assert!(runner.submit(bad_height).await.is_err());

        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_payload_settles_with_generic_error() {
        let transport = StubTransport::text(r#"{"riskScore": 40, "riskLevel": "Elevated"}"#);
        let runner = FlowRunner::new(Arc::new(RiskAssessmentTask::new(gateway_with(transport))));

        let snapshot = runner.submit(profile()).await.unwrap();

        assert_eq!(snapshot.status, RequestStatus::SettledWithError);
        assert_eq!(
            snapshot.error.as_deref(),
            Some("Error generating prediction. Please try again.")
        );
    }
}
