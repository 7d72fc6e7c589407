use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use super::policy::{PolicyLoadError, PolicySource, ThresholdPolicy};

/// Holds the active threshold snapshot and swaps it wholesale on reload.
///
/// Readers clone the `Arc` and evaluate against that snapshot; a concurrent reload never alters
/// a snapshot already handed out.
#[derive(Debug)]
pub struct PolicyStore {
    /// `None` for stores pinned with [`PolicyStore::fixed`].
    source: Option<PolicySource>,
    current: RwLock<Arc<ThresholdPolicy>>,
}

impl PolicyStore {
    /// Load the initial snapshot; failure here must stop the process.
    pub fn load(source: PolicySource) -> Result<Self, PolicyLoadError> {
        let policy = source.load()?;
        info!(
            version = %policy.version,
            source = %source.describe(),
            "threshold policy loaded"
        );
        Ok(Self {
            source: Some(source),
            current: RwLock::new(Arc::new(policy)),
        })
    }

    /// Store pinned to one policy; `reload` keeps serving it.
    pub fn fixed(policy: ThresholdPolicy) -> Self {
        Self {
            source: None,
            current: RwLock::new(Arc::new(policy)),
        }
    }

    pub fn snapshot(&self) -> Arc<ThresholdPolicy> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-read the source and publish the result; the old snapshot stays active on failure.
    pub fn reload(&self) -> Result<Arc<ThresholdPolicy>, PolicyLoadError> {
        let Some(source) = &self.source else {
            let current = self.snapshot();
            info!(version = %current.version, "fixed threshold policy kept on reload");
            return Ok(current);
        };

        let policy = match source.load() {
            Ok(policy) => Arc::new(policy),
            Err(err) => {
                warn!(error = %err, source = %source.describe(), "policy reload rejected");
                return Err(err);
            }
        };

        let previous = {
            let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *guard, policy.clone())
        };

        info!(
            previous = %previous.version,
            current = %policy.version,
            "threshold policy reloaded"
        );
        Ok(policy)
    }
}
