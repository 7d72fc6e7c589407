//! Statin therapy advisor: maps CK, transaminase, bilirubin and muscle-symptom observations to a
//! graded recommendation with a traceable rule rationale.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod telemetry;

/// Public service name reported by the metadata endpoint and the CLI.
pub const SERVICE_NAME: &str = "Statin Recommendation API";
