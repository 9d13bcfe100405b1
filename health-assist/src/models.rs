use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grounding::{Citation, DisplayCitation, displayable_citations};

/// Scores at or above this band as moderate
pub const MODERATE_RISK_THRESHOLD: i64 = 30;
/// Scores at or above this band as high
pub const HIGH_RISK_THRESHOLD: i64 = 60;

/// Shown when a provider search returns no narrative text
pub const NO_SUMMARY_FALLBACK: &str = "No summary provided.";

/// Four-level ordinal severity of a candidate condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub const ALL: [Urgency; 4] = [
        Urgency::Low,
        Urgency::Medium,
        Urgency::High,
        Urgency::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
            Urgency::Critical => "Critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomAnalysisResult {
    pub condition: String,
    /// Free-form likelihood, e.g. "70%" or "Likely"
    pub probability: String,
    pub description: String,
    pub urgency: Urgency,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomResponse {
    pub analysis: Vec<SymptomAnalysisResult>,
    /// Always non-empty once validated
    pub disclaimer: String,
}

impl SymptomResponse {
    /// Highest urgency among the candidate conditions
    pub fn most_urgent(&self) -> Option<Urgency> {
        self.analysis.iter().map(|entry| entry.urgency).max()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Moderate, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display banding of a numeric risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    pub fn from_score(score: i64) -> Self {
        if score < MODERATE_RISK_THRESHOLD {
            RiskBand::Low
        } else if score < HIGH_RISK_THRESHOLD {
            RiskBand::Moderate
        } else {
            RiskBand::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskPredictionResult {
    pub risk_score: i64,
    pub risk_level: RiskLevel,
    pub summary: String,
    pub recommendations: Vec<String>,
}

impl RiskPredictionResult {
    pub fn band(&self) -> RiskBand {
        RiskBand::from_score(self.risk_score)
    }

    /// `(risk, remaining)` split of a 0-100 gauge
    pub fn gauge(&self) -> (u8, u8) {
        let risk = self.risk_score.clamp(0, 100) as u8;
        (risk, 100 - risk)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SmokingStatus {
    #[default]
    No,
    Yes,
    Occasionally,
    #[serde(rename = "Former Smoker")]
    FormerSmoker,
}

impl fmt::Display for SmokingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SmokingStatus::No => "No",
            SmokingStatus::Yes => "Yes",
            SmokingStatus::Occasionally => "Occasionally",
            SmokingStatus::FormerSmoker => "Former Smoker",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    #[serde(rename = "Lightly Active")]
    LightlyActive,
    #[serde(rename = "Moderately Active")]
    ModeratelyActive,
    #[serde(rename = "Very Active")]
    VeryActive,
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightlyActive => "Lightly Active",
            ActivityLevel::ModeratelyActive => "Moderately Active",
            ActivityLevel::VeryActive => "Very Active",
        })
    }
}

/// Risk form state. Numeric fields stay as typed text until validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub age: String,
    pub gender: Gender,
    pub weight_kg: String,
    pub height_cm: String,
    pub smoker: SmokingStatus,
    pub activity: ActivityLevel,
    pub diet: String,
    pub family_history: String,
}

impl Default for RiskProfile {
    fn default() -> Self {
        Self {
            age: String::new(),
            gender: Gender::default(),
            weight_kg: String::new(),
            height_cm: String::new(),
            smoker: SmokingStatus::default(),
            activity: ActivityLevel::default(),
            diet: "Average".to_string(),
            family_history: String::new(),
        }
    }
}

impl RiskProfile {
    /// Free-text composite sent to the model
    pub fn summary(&self) -> String {
        format!(
            "Age: {}, Gender: {}, Weight: {}kg, Height: {}cm, Smoker: {}, Activity Level: {}, Diet: {}, Family History: {}",
            self.age.trim(),
            self.gender,
            self.weight_kg.trim(),
            self.height_cm.trim(),
            self.smoker,
            self.activity,
            self.diet.trim(),
            self.family_history.trim()
        )
    }
}

/// Provider search form state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProviderQuery {
    /// e.g. "Cardiologist"
    pub specialty: String,
    /// City or zip; when empty the current position is used if available
    pub location: Option<String>,
}

impl ProviderQuery {
    pub fn new(specialty: impl Into<String>) -> Self {
        Self {
            specialty: specialty.into(),
            location: None,
        }
    }

    pub fn near(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Location text, if any was typed
    pub fn location_text(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|location| !location.is_empty())
    }

    /// Query text sent to the model
    pub fn query_text(&self) -> String {
        let specialty = self.specialty.trim();
        match self.location_text() {
            Some(location) => format!("{} near {}", specialty, location),
            None => specialty.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSearchResult {
    /// Query text actually sent
    pub query: String,
    pub coordinate: Option<GeoCoordinate>,
    pub summary: String,
    pub citations: Vec<Citation>,
}

impl ProviderSearchResult {
    pub fn displayable(&self) -> Vec<DisplayCitation> {
        displayable_citations(&self.citations)
    }
}
