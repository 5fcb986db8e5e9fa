use async_trait::async_trait;
use tonic::{Request, Streaming, transport::Channel};
use tracing::{debug, warn};

use lambda_core::{MessageStream, Orchestrator, RunError};
use lambda_model::{RunRequest, StreamMessage, UnitId};

use crate::{
    convert::remove_options,
    errors::RpcError,
    proto::{DeployOptions, RunAndWaitMessage, core_rpc_client::CoreRpcClient},
};

/// [`Orchestrator`] backed by the orchestrator's gRPC API.
///
/// The underlying channel is shared; cloning the client per call is cheap.
#[derive(Clone)]
pub struct GrpcOrchestrator {
    client: CoreRpcClient<Channel>,
    endpoint: String,
}

impl GrpcOrchestrator {
    /// Connect to `endpoint`. Fails with [`RunError::Connection`].
    pub async fn connect(endpoint: impl Into<String>) -> Result<Self, RunError> {
        let endpoint = endpoint.into();
        let client = CoreRpcClient::connect(endpoint.clone())
            .await
            .map_err(|e| RpcError::from(e).connection())?;

        debug!(target: "lambda.rpc", %endpoint, "connected");
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Orchestrator for GrpcOrchestrator {
    async fn run_and_wait(&self, request: &RunRequest) -> Result<Box<dyn MessageStream>, RunError> {
        let mut client = self.client.clone();
        let opts = DeployOptions::from(request);

        let stream = client
            .run_and_wait(Request::new(opts))
            .await
            .map_err(|s| RpcError::from(s).submission())?
            .into_inner();

        Ok(Box::new(GrpcMessageStream { inner: stream }))
    }

    async fn remove_units(&self, units: &[UnitId]) -> Result<(), RunError> {
        let mut client = self.client.clone();

        let mut stream = client
            .remove_container(Request::new(remove_options(units)))
            .await
            .map_err(|s| RpcError::from(s).submission())?
            .into_inner();

        while let Some(msg) = stream
            .message()
            .await
            .map_err(|s| RpcError::from(s).stream())?
        {
            if msg.success {
                debug!(target: "lambda.rpc", unit = %msg.id, "unit removed");
            } else {
                warn!(target: "lambda.rpc", unit = %msg.id, reason = %msg.message, "unit removal failed");
            }
        }
        Ok(())
    }
}

struct GrpcMessageStream {
    inner: Streaming<RunAndWaitMessage>,
}

#[async_trait]
impl MessageStream for GrpcMessageStream {
    async fn next_message(&mut self) -> Result<Option<StreamMessage>, RunError> {
        let msg = self
            .inner
            .message()
            .await
            .map_err(|s| RpcError::from(s).stream())?;
        Ok(msg.map(StreamMessage::from))
    }
}
