use thiserror::Error;

use lambda_core::RunError;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("grpc call failed: {}: {}", .0.code(), .0.message())]
    Status(#[source] Box<tonic::Status>),
}

impl From<tonic::Status> for RpcError {
    fn from(status: tonic::Status) -> Self {
        RpcError::Status(Box::new(status))
    }
}

impl RpcError {
    pub(crate) fn connection(self) -> RunError {
        RunError::Connection(self.to_string())
    }

    pub(crate) fn submission(self) -> RunError {
        RunError::Submission(self.to_string())
    }

    pub(crate) fn stream(self) -> RunError {
        RunError::Stream(self.to_string())
    }
}
