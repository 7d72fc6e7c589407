use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Versioned cutoffs consulted by the rule table.
///
/// Values are illustrative policy, not validated clinical constants; deployments are expected to
/// supply their own file through [`PolicySource::File`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdPolicy {
    pub version: String,
    /// CK (U/L) above which muscle symptoms mandate discontinuation.
    pub ck_critical: f64,
    /// CK (U/L) above which the dose should be reduced.
    pub ck_high: f64,
    /// Transaminase (U/L) above which liver function is monitored.
    pub transaminase_limit: f64,
    /// Bilirubin (mg/dL) above which liver function is monitored.
    pub bilirubin_limit: f64,
}

impl ThresholdPolicy {
    pub fn builtin() -> Self {
        Self {
            version: "builtin-illustrative-1".to_string(),
            ck_critical: 1000.0,
            ck_high: 500.0,
            transaminase_limit: 60.0,
            bilirubin_limit: 1.5,
        }
    }

    /// Reject policies that would leave a rule undefined or ordered inconsistently.
    pub fn validate(&self) -> Result<(), PolicyLoadError> {
        let mut problems = Vec::new();

        if self.version.trim().is_empty() {
            problems.push("version must not be empty".to_string());
        }

        for (name, value) in [
            ("ck_critical", self.ck_critical),
            ("ck_high", self.ck_high),
            ("transaminase_limit", self.transaminase_limit),
            ("bilirubin_limit", self.bilirubin_limit),
        ] {
            if !value.is_finite() || value < 0.0 {
                problems.push(format!("{name} must be a finite, non-negative number"));
            }
        }

        if self.ck_critical < self.ck_high {
            problems.push(format!(
                "ck_critical ({}) must not be below ck_high ({})",
                self.ck_critical, self.ck_high
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(PolicyLoadError::Invalid { problems })
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, PolicyLoadError> {
        let policy: ThresholdPolicy = serde_json::from_str(raw)?;
        policy.validate()?;
        Ok(policy)
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Where the service obtains its thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicySource {
    Builtin,
    File(PathBuf),
}

impl PolicySource {
    pub fn load(&self) -> Result<ThresholdPolicy, PolicyLoadError> {
        match self {
            PolicySource::Builtin => Ok(ThresholdPolicy::builtin()),
            PolicySource::File(path) => load_file(path),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            PolicySource::Builtin => "built-in illustrative thresholds".to_string(),
            PolicySource::File(path) => path.display().to_string(),
        }
    }
}

fn load_file(path: &Path) -> Result<ThresholdPolicy, PolicyLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| PolicyLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ThresholdPolicy::from_json(&raw)
}

/// Threshold configuration could not be turned into a usable policy.
#[derive(Debug, thiserror::Error)]
pub enum PolicyLoadError {
    #[error("unable to read policy file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("policy is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("policy rejected: {}", .problems.join("; "))]
    Invalid { problems: Vec<String> },
}
