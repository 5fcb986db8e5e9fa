use lambda_model::{RunRequest, StreamMessage, UnitId};

use crate::proto;

impl From<&RunRequest> for proto::DeployOptions {
    fn from(req: &RunRequest) -> Self {
        proto::DeployOptions {
            specs: req.manifest.as_str().to_string(),
            appname: req.app_name().to_string(),
            image: req.image.clone(),
            podname: req.pool.clone(),
            entrypoint: req.entrypoint.clone(),
            cpu_quota: req.cpu,
            memory: req.memory,
            count: req.count,
            networks: req.networks.clone(),
            env: req.env.clone(),
        }
    }
}

impl From<proto::RunAndWaitMessage> for StreamMessage {
    fn from(msg: proto::RunAndWaitMessage) -> Self {
        StreamMessage {
            unit: UnitId::from(msg.container_id),
            payload: msg.data,
        }
    }
}

pub(crate) fn remove_options(units: &[UnitId]) -> proto::RemoveContainerOptions {
    proto::RemoveContainerOptions {
        ids: units.iter().map(|u| u.as_str().to_string()).collect(),
    }
}
