use std::time::Duration;

use crate::error::RunError;

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Orchestrator gRPC endpoint.
    pub endpoint: String,
    /// Deadline after which still-registered units are reclaimed.
    pub timeout: Duration,
    /// Disarm the reclaimer when the stream ends naturally (default: true).
    ///
    /// When `false` the reclaimer fires at the deadline even after a clean finish.
    pub cancel_on_completion: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5001".to_string(),
            timeout: Duration::from_secs(60),
            cancel_on_completion: true,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), RunError> {
        if self.endpoint.trim().is_empty() {
            return Err(RunError::InvalidConfig("endpoint cannot be empty".into()));
        }
        if self.timeout.is_zero() {
            return Err(RunError::InvalidConfig("timeout must be positive".into()));
        }
        Ok(())
    }
}
