pub mod provider_search;
pub mod risk_assessment;
pub mod symptom_check;

pub use provider_search::ProviderSearchTask;
pub use risk_assessment::RiskAssessmentTask;
pub use symptom_check::SymptomCheckTask;
