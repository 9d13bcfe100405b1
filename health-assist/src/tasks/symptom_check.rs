use async_trait::async_trait;
use care_flow::{FlowError, Result, Task};
use tracing::info;

use crate::gateway::GeminiGateway;
use crate::models::SymptomResponse;

pub struct SymptomCheckTask {
    gateway: GeminiGateway,
}

impl SymptomCheckTask {
    pub fn new(gateway: GeminiGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Task for SymptomCheckTask {
    type Input = String;
    type Output = SymptomResponse;

    fn id(&self) -> &str {
        "symptom_check"
    }

    fn validate(&self, input: &String) -> Result<()> {
        if input.trim().is_empty() {
            return Err(FlowError::InvalidInput(
                "Please describe your symptoms".to_string(),
            ));
        }
        Ok(())
    }

    fn failure_message(&self) -> &str {
        "Failed to analyze symptoms. Please try again."
    }

    async fn run(&self, input: String) -> Result<SymptomResponse> {
        info!(task_id = %self.id(), chars = input.len(), "Running symptom check");
        let response = self.gateway.analyze_symptoms(input.trim()).await?;
        Ok(response)
    }
}
