use std::collections::HashMap;

use crate::{
    env::namespace_env,
    error::ModelError,
    manifest::{APP_NAME, DeploymentManifest},
    params::RunParams,
};

/// Wire-level deployment request derived from [`RunParams`].
///
/// Built once per invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub pool: String,
    pub image: String,
    pub entrypoint: String,
    pub command: String,
    pub working_dir: String,
    pub volumes: Vec<String>,
    pub manifest: DeploymentManifest,
    /// Network name mapped to an empty, reserved per-network value.
    pub networks: HashMap<String, String>,
    /// Namespaced environment entries.
    pub env: Vec<String>,
    pub cpu: f64,
    pub memory: i64,
    pub count: i32,
}

impl RunRequest {
    /// Application name the request is deployed under.
    pub fn app_name(&self) -> &'static str {
        APP_NAME
    }
}

/// Build the request for one run.
///
/// The only failure is manifest serialization, surfaced before any network call.
pub fn build(params: &RunParams) -> Result<RunRequest, ModelError> {
    let manifest = DeploymentManifest::render(
        &params.name,
        &params.command,
        &params.working_dir,
        &params.volumes,
    )?;

    let mut networks = HashMap::with_capacity(1);
    networks.insert(params.network.clone(), String::new());

    Ok(RunRequest {
        pool: params.pool.clone(),
        image: params.image.clone(),
        entrypoint: params.name.clone(),
        command: params.command.clone(),
        working_dir: params.working_dir.clone(),
        volumes: params.volumes.clone(),
        manifest,
        networks,
        env: namespace_env(&params.env),
        cpu: params.cpu,
        memory: params.memory,
        count: params.count,
    })
}
