use thiserror::Error;

use lambda_model::ModelError;

/// Every failure of a run. None of them is retried at this layer.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to connect to orchestrator: {0}")]
    Connection(String),

    #[error("run submission failed: {0}")]
    Submission(String),

    #[error("response stream interrupted: {0}")]
    Stream(String),

    #[error("malformed exit code sentinel: {payload:?}")]
    MalformedSentinel { payload: String },

    #[error(transparent)]
    Encoding(#[from] ModelError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
