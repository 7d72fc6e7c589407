use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};

use crate::evaluation::{evaluation_router, ClinicalMeasurement, PolicyStore, ThresholdPolicy};

pub(super) fn policy() -> ThresholdPolicy {
    ThresholdPolicy {
        version: "test-2024.1".to_string(),
        ck_critical: 1000.0,
        ck_high: 500.0,
        transaminase_limit: 60.0,
        bilirubin_limit: 1.5,
    }
}

pub(super) fn measurement(
    ck_value: f64,
    transaminase: f64,
    bilirubin: f64,
    muscle_symptoms: bool,
) -> ClinicalMeasurement {
    ClinicalMeasurement::new(ck_value, transaminase, bilirubin, muscle_symptoms)
        .expect("valid measurement")
}

pub(super) fn baseline() -> ClinicalMeasurement {
    measurement(250.5, 35.0, 1.2, false)
}

pub(super) fn request(ck_value: f64, transaminase: f64, bilirubin: f64, symptoms: bool) -> Value {
    json!({
        "ck_value": ck_value,
        "transaminase": transaminase,
        "bilirubin": bilirubin,
        "muscle_symptoms": symptoms,
    })
}

pub(super) fn router_with_policy(policy: ThresholdPolicy) -> axum::Router {
    evaluation_router(Arc::new(PolicyStore::fixed(policy)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Writes `contents` to a fresh file under the system temp directory.
pub(super) fn policy_file(contents: &str) -> PathBuf {
    static SEQUENCE: AtomicU64 = AtomicU64::new(0);
    let id = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "statin-policy-{}-{id}.json",
        std::process::id()
    ));
    std::fs::write(&path, contents).expect("write policy file");
    path
}

pub(super) fn policy_json(version: &str, ck_high: f64) -> String {
    json!({
        "version": version,
        "ck_critical": 1000.0,
        "ck_high": ck_high,
        "transaminase_limit": 60.0,
        "bilirubin_limit": 1.5,
    })
    .to_string()
}
