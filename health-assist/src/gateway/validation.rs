//! Parsing of structured model output into the typed models.
//!
//! Shape violations (bad JSON, missing required fields, unknown enum values,
//! empty disclaimer) always fail. Value ranges the remote contract leaves
//! open are governed by [`ValidationPolicy`].

use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use super::error::{GatewayError, Result};
use crate::models::{RiskLevel, RiskPredictionResult, SymptomResponse};

/// How a `riskScore` outside `0..=100` or with a fractional part is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskScorePolicy {
    /// Round to the nearest integer, no range check
    #[default]
    Passthrough,
    /// Round, then clamp into `0..=100`
    Clamp,
    /// Fail with a format error
    Reject,
}

impl FromStr for RiskScorePolicy {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passthrough" => Ok(RiskScorePolicy::Passthrough),
            "clamp" => Ok(RiskScorePolicy::Clamp),
            "reject" => Ok(RiskScorePolicy::Reject),
            other => Err(GatewayError::Config(format!(
                "unknown risk score policy '{}', expected passthrough, clamp or reject",
                other
            ))),
        }
    }
}

/// How the free-form `probability` of a symptom entry is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbabilityPolicy {
    #[default]
    FreeText,
    /// A number in `0..=100`, optionally followed by `%`
    Percentage,
}

impl FromStr for ProbabilityPolicy {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free-text" | "free_text" | "freetext" => Ok(ProbabilityPolicy::FreeText),
            "percentage" => Ok(ProbabilityPolicy::Percentage),
            other => Err(GatewayError::Config(format!(
                "unknown probability policy '{}', expected free-text or percentage",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationPolicy {
    pub risk_score: RiskScorePolicy,
    pub probability: ProbabilityPolicy,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRiskPrediction {
    risk_score: f64,
    risk_level: RiskLevel,
    summary: String,
    recommendations: Vec<String>,
}

/// Remove a surrounding Markdown code fence, if any
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Language tag in any case: ```json, ```JSON, ```Json
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub fn parse_symptom_response(payload: &str, policy: &ValidationPolicy) -> Result<SymptomResponse> {
    let response: SymptomResponse = serde_json::from_str(strip_code_fence(payload))
        .map_err(|e| GatewayError::ResponseFormat(format!("symptom response: {}", e)))?;

    if response.disclaimer.trim().is_empty() {
        return Err(GatewayError::ResponseFormat(
            "symptom response: disclaimer is missing or empty".to_string(),
        ));
    }

    if policy.probability == ProbabilityPolicy::Percentage {
        for entry in &response.analysis {
            if !is_percentage(&entry.probability) {
                return Err(GatewayError::ResponseFormat(format!(
                    "symptom response: probability '{}' for '{}' is not a percentage",
                    entry.probability, entry.condition
                )));
            }
        }
    }

    debug!(entries = response.analysis.len(), "Parsed symptom response");
    Ok(response)
}

pub fn parse_risk_prediction(
    payload: &str,
    policy: &ValidationPolicy,
) -> Result<RiskPredictionResult> {
    let raw: RawRiskPrediction = serde_json::from_str(strip_code_fence(payload))
        .map_err(|e| GatewayError::ResponseFormat(format!("risk prediction: {}", e)))?;

    let risk_score = apply_score_policy(raw.risk_score, policy.risk_score)?;

    Ok(RiskPredictionResult {
        risk_score,
        risk_level: raw.risk_level,
        summary: raw.summary,
        recommendations: raw.recommendations,
    })
}

fn apply_score_policy(score: f64, policy: RiskScorePolicy) -> Result<i64> {
    match policy {
        RiskScorePolicy::Passthrough => Ok(score.round() as i64),
        RiskScorePolicy::Clamp => Ok(score.round().clamp(0.0, 100.0) as i64),
        RiskScorePolicy::Reject => {
            if score.fract() != 0.0 || !(0.0..=100.0).contains(&score) {
                Err(GatewayError::ResponseFormat(format!(
                    "risk prediction: riskScore {} is not an integer in 0..=100",
                    score
                )))
            } else {
                Ok(score as i64)
            }
        }
    }
}

fn is_percentage(value: &str) -> bool {
    let number = value.trim();
    let number = number.strip_suffix('%').unwrap_or(number).trim();
    number
        .parse::<f64>()
        .map(|n| (0.0..=100.0).contains(&n))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Urgency;

    const MIGRAINE: &str = r#"{
        "analysis": [{
            "condition": "Migraine",
            "probability": "70%",
            "description": "Recurrent headache with light sensitivity.",
            "urgency": "High",
            "advice": "Rest in a dark room and consult a doctor if it worsens."
        }],
        "disclaimer": "This is not a medical diagnosis."
    }"#;

    fn lenient() -> ValidationPolicy {
        ValidationPolicy::default()
    }

    #[test]
    fn test_valid_symptom_payload_maps_one_to_one() {
        let response = parse_symptom_response(MIGRAINE, &lenient()).unwrap();
        assert_eq!(response.analysis.len(), 1);
        assert_eq!(response.analysis[0].condition, "Migraine");
        assert_eq!(response.analysis[0].urgency, Urgency::High);
        assert_eq!(response.disclaimer, "This is not a medical diagnosis.");
    }

    #[test]
    fn test_fenced_payload_is_accepted() {
        let fenced = format!("```json\n{}\n```", MIGRAINE);
        assert!(parse_symptom_response(&fenced, &lenient()).is_ok());
    }

    #[test]
    fn test_fence_tag_is_case_insensitive() {
        let upper = format!("```JSON\n{}\n```", MIGRAINE);
        assert!(parse_symptom_response(&upper, &lenient()).is_ok());

        let untagged = format!("```\n{}\n```", MIGRAINE);
        assert!(parse_symptom_response(&untagged, &lenient()).is_ok());

        assert_eq!(strip_code_fence("```json {\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn test_unknown_urgency_is_rejected() {
        let payload = MIGRAINE.replace("\"High\"", "\"Severe\"");
        let err = parse_symptom_response(&payload, &lenient()).unwrap_err();
        assert_eq!(err.kind(), "response_format");
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let payload = r#"{"analysis": [{"condition": "Flu", "probability": "Likely",
            "description": "Viral", "urgency": "Low"}], "disclaimer": "Not advice."}"#;
        assert!(matches!(
            parse_symptom_response(payload, &lenient()),
            Err(GatewayError::ResponseFormat(_))
        ));
    }

    #[test]
    fn test_empty_disclaimer_is_rejected() {
        let payload = r#"{"analysis": [], "disclaimer": "  "}"#;
        let err = parse_symptom_response(payload, &lenient()).unwrap_err();
        assert!(err.to_string().contains("disclaimer"));

        let missing = r#"{"analysis": []}"#;
        assert!(parse_symptom_response(missing, &lenient()).is_err());
    }

    #[test]
    fn test_empty_analysis_is_valid() {
        let payload = r#"{"analysis": [], "disclaimer": "Consult a professional."}"#;
        let response = parse_symptom_response(payload, &lenient()).unwrap();
        assert!(response.analysis.is_empty());
    }

    #[test]
    fn test_percentage_policy() {
        let strict = ValidationPolicy {
            probability: ProbabilityPolicy::Percentage,
            ..ValidationPolicy::default()
        };
        assert!(parse_symptom_response(MIGRAINE, &strict).is_ok());

        let qualitative = MIGRAINE.replace("70%", "Likely");
        assert!(parse_symptom_response(&qualitative, &lenient()).is_ok());
        assert!(parse_symptom_response(&qualitative, &strict).is_err());
    }

    #[test]
    fn test_not_json_is_a_format_error() {
        let err = parse_risk_prediction("I cannot help with that.", &lenient()).unwrap_err();
        assert_eq!(err.kind(), "response_format");
    }

    fn risk_payload(score: &str) -> String {
        format!(
            r#"{{"riskScore": {}, "riskLevel": "High", "summary": "Elevated cardiovascular risk.",
                "recommendations": ["Stop smoking", "Walk 30 minutes daily"]}}"#,
            score
        )
    }

    #[test]
    fn test_risk_prediction_keeps_recommendation_order() {
        let result = parse_risk_prediction(&risk_payload("72"), &lenient()).unwrap();
        assert_eq!(result.risk_score, 72);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(
            result.recommendations,
            vec!["Stop smoking".to_string(), "Walk 30 minutes daily".to_string()]
        );
    }

    #[test]
    fn test_unknown_risk_level_is_rejected() {
        let payload = risk_payload("40").replace("\"High\"", "\"Extreme\"");
        assert!(parse_risk_prediction(&payload, &lenient()).is_err());
    }

    #[test]
    fn test_risk_score_policies() {
        let with = |risk_score| ValidationPolicy {
            risk_score,
            ..ValidationPolicy::default()
        };

        let passthrough = parse_risk_prediction(&risk_payload("130.4"), &lenient()).unwrap();
        assert_eq!(passthrough.risk_score, 130);

        let clamped =
            parse_risk_prediction(&risk_payload("130.4"), &with(RiskScorePolicy::Clamp)).unwrap();
        assert_eq!(clamped.risk_score, 100);

        let reject = with(RiskScorePolicy::Reject);
        assert!(parse_risk_prediction(&risk_payload("130"), &reject).is_err());
        assert!(parse_risk_prediction(&risk_payload("55.5"), &reject).is_err());
        assert_eq!(
            parse_risk_prediction(&risk_payload("55"), &reject).unwrap().risk_score,
            55
        );
    }

    #[test]
    fn test_policy_names_parse() {
        assert_eq!("Clamp".parse::<RiskScorePolicy>().unwrap(), RiskScorePolicy::Clamp);
        assert_eq!(
            "percentage".parse::<ProbabilityPolicy>().unwrap(),
            ProbabilityPolicy::Percentage
        );
        assert!("sometimes".parse::<RiskScorePolicy>().is_err());
    }
}
