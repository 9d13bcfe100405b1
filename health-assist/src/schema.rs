//! Structured-output schemas sent with each structured request.
//!
//! Enum lists come from the model enums so the schema and the parser agree.

use serde_json::{Value, json};

use crate::models::{RiskLevel, Urgency};

/// Schema for [`SymptomResponse`](crate::models::SymptomResponse)
pub fn symptom_response_schema() -> Value {
    let urgencies: Vec<&str> = Urgency::ALL.iter().map(Urgency::as_str).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "analysis": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "condition": { "type": "STRING" },
                        "probability": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "urgency": { "type": "STRING", "enum": urgencies },
                        "advice": { "type": "STRING" }
                    },
                    "required": ["condition", "probability", "description", "urgency", "advice"]
                }
            },
            "disclaimer": { "type": "STRING" }
        },
        "required": ["analysis", "disclaimer"]
    })
}

/// Schema for [`RiskPredictionResult`](crate::models::RiskPredictionResult)
pub fn risk_prediction_schema() -> Value {
    let levels: Vec<&str> = RiskLevel::ALL.iter().map(RiskLevel::as_str).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "riskScore": {
                "type": "NUMBER",
                "description": "A score from 0 to 100 where 100 is highest risk"
            },
            "riskLevel": { "type": "STRING", "enum": levels },
            "summary": { "type": "STRING" },
            "recommendations": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["riskScore", "riskLevel", "summary", "recommendations"]
    })
}
