//! Domain types for a single remote run.
//!
//! Everything here is pure: building a [`RunRequest`] from [`RunParams`] performs no I/O.

mod error;
pub use error::ModelError;

mod env;
pub use env::{ENV_PREFIX, namespace_env};

mod manifest;
pub use manifest::{APP_NAME, DeploymentManifest};

mod params;
pub use params::RunParams;

mod request;
pub use request::{RunRequest, build};

mod unit;
pub use unit::{SHORT_ID_LEN, StreamMessage, UnitId};
