//! gRPC binding of the orchestration service.

pub mod proto {
    tonic::include_proto!("lambda.v1");
}

mod convert;

mod errors;
pub use errors::RpcError;

mod client;
pub use client::GrpcOrchestrator;
