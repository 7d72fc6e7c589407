//! Statin decision pipeline: normalize the raw request, run the rule table against a policy
//! snapshot, and shape the published response.

mod format;
mod guidance;
mod measurement;
mod policy;
pub mod router;
mod rules;
mod store;

#[cfg(test)]
mod tests;

pub use format::{format, EvaluationResponse};
pub use guidance::{classification_summary, rule_guidance};
pub use measurement::{normalize, ClinicalMeasurement, FieldViolation, ValidationError};
pub use policy::{PolicyLoadError, PolicySource, ThresholdPolicy};
pub use router::evaluation_router;
pub use rules::{evaluate, InternalEvaluationError};
pub use store::PolicyStore;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, error, info};

/// Therapy recommendation, ordered by increasing severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Continue,
    Monitor,
    ReduceDose,
    Discontinue,
}

impl Classification {
    pub fn risk_level(self) -> u8 {
        match self {
            Classification::Continue => 0,
            Classification::Monitor => 1,
            Classification::ReduceDose => 2,
            Classification::Discontinue => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Classification::Continue => "CONTINUE",
            Classification::Monitor => "MONITOR",
            Classification::ReduceDose => "REDUCE_DOSE",
            Classification::Discontinue => "DISCONTINUE",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier of a rule in the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleId {
    R1,
    R2,
    R3,
    R4,
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            RuleId::R1 => "R1",
            RuleId::R2 => "R2",
            RuleId::R3 => "R3",
            RuleId::R4 => "R4",
        };
        f.write_str(id)
    }
}

/// Evaluator output; `rationale` lists fired rules in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub classification: Classification,
    pub risk_level: u8,
    pub rationale: Vec<RuleId>,
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Internal(#[from] InternalEvaluationError),
}

impl IntoResponse for AssessmentError {
    fn into_response(self) -> Response {
        match self {
            AssessmentError::Validation(err) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(err)).into_response()
            }
            AssessmentError::Internal(_) => {
                let payload = json!({ "error": "An unexpected error occurred." });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
            }
        }
    }
}

/// Run a raw request through normalizer, evaluator and formatter against one snapshot.
pub fn assess(raw: &Value, policy: &ThresholdPolicy) -> Result<EvaluationResponse, AssessmentError> {
    let measurement = normalize(raw).map_err(|err| {
        info!(fields = ?err.fields().collect::<Vec<_>>(), "measurement rejected");
        err
    })?;

    let recommendation = evaluate(&measurement, policy).map_err(|err| {
        error!(
            error = %err,
            ?measurement,
            ?policy,
            "rule evaluation failed to resolve"
        );
        err
    })?;

    debug!(
        classification = %recommendation.classification,
        risk_level = recommendation.risk_level,
        policy_version = %policy.version,
        "measurement evaluated"
    );

    Ok(format(&recommendation, &policy.version))
}
