use async_trait::async_trait;
use lambda_model::{RunRequest, UnitId};

use crate::{demux::MessageStream, error::RunError};

/// Remote orchestration service, as seen by a run.
///
/// The gRPC client is the production implementation; tests plug in-memory ones.
#[async_trait]
pub trait Orchestrator: Send + Sync + 'static {
    /// Submit the run and open its response stream.
    ///
    /// Fails with [`RunError::Submission`] before any message is received.
    async fn run_and_wait(&self, request: &RunRequest) -> Result<Box<dyn MessageStream>, RunError>;

    /// Forcibly remove the given units. Best-effort; callers ignore the result.
    async fn remove_units(&self, units: &[UnitId]) -> Result<(), RunError>;
}
