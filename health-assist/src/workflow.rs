use crate::gateway::GeminiGateway;
use crate::geolocation::LocationProvider;
use crate::tasks::*;
use care_flow::{ConcurrencyPolicy, FlowRunner};
use std::sync::Arc;

pub type SymptomRunner = FlowRunner<SymptomCheckTask>;
pub type RiskRunner = FlowRunner<RiskAssessmentTask>;
pub type ProviderRunner = FlowRunner<ProviderSearchTask>;

pub fn create_symptom_runner(gateway: GeminiGateway) -> SymptomRunner {
    FlowRunner::new(Arc::new(SymptomCheckTask::new(gateway)))
}

pub fn create_risk_runner(gateway: GeminiGateway) -> RiskRunner {
    FlowRunner::new(Arc::new(RiskAssessmentTask::new(gateway)))
}

pub fn create_provider_runner(
    gateway: GeminiGateway,
    location: Option<Arc<dyn LocationProvider>>,
) -> ProviderRunner {
    let task = match location {
        Some(provider) => ProviderSearchTask::new(gateway).with_location(provider),
        None => ProviderSearchTask::new(gateway),
    };
    FlowRunner::new(Arc::new(task))
}

/// The three workflows, each with its own independent request state
#[derive(Clone)]
pub struct HealthAssistant {
    pub symptoms: SymptomRunner,
    pub risk: RiskRunner,
    pub providers: ProviderRunner,
}

impl HealthAssistant {
    pub fn new(gateway: GeminiGateway, location: Option<Arc<dyn LocationProvider>>) -> Self {
        Self {
            symptoms: create_symptom_runner(gateway.clone()),
            risk: create_risk_runner(gateway.clone()),
            providers: create_provider_runner(gateway, location),
        }
    }

    pub fn with_policy(self, policy: ConcurrencyPolicy) -> Self {
        Self {
            symptoms: self.symptoms.with_policy(policy),
            risk: self.risk.with_policy(policy),
            providers: self.providers.with_policy(policy),
        }
    }
}
