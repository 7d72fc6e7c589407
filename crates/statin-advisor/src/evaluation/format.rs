use serde::{Deserialize, Serialize};

use super::{Classification, Recommendation, RuleId};

/// Published response body for `POST /evaluate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub recommendation: Classification,
    pub risk_level: u8,
    pub rationale: Vec<RuleId>,
    pub policy_version: String,
}

pub fn format(recommendation: &Recommendation, policy_version: &str) -> EvaluationResponse {
    EvaluationResponse {
        recommendation: recommendation.classification,
        risk_level: recommendation.risk_level,
        rationale: recommendation.rationale.clone(),
        policy_version: policy_version.to_string(),
    }
}
