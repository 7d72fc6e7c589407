use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::{assess, AssessmentError, EvaluationResponse, PolicyStore, ThresholdPolicy, ValidationError};
use crate::error::AppError;

/// Router builder exposing the decision endpoint and policy audit routes.
pub fn evaluation_router(store: Arc<PolicyStore>) -> Router {
    Router::new()
        .route("/evaluate", post(evaluate_handler))
        .route("/policy", get(policy_handler))
        .route("/policy/reload", post(reload_handler))
        .with_state(store)
}

pub(crate) async fn evaluate_handler(
    State(store): State<Arc<PolicyStore>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EvaluationResponse>, AssessmentError> {
    let Json(raw) = payload.map_err(|rejection| ValidationError::body(rejection.body_text()))?;

    let policy = store.snapshot();
    assess(&raw, &policy).map(Json)
}

pub(crate) async fn policy_handler(
    State(store): State<Arc<PolicyStore>>,
) -> Json<ThresholdPolicy> {
    Json(store.snapshot().as_ref().clone())
}

pub(crate) async fn reload_handler(
    State(store): State<Arc<PolicyStore>>,
) -> Result<Json<Value>, AppError> {
    let policy = store.reload()?;
    Ok(Json(json!({
        "status": "reloaded",
        "policy_version": policy.version,
    })))
}
