pub mod config;
pub use config::RunConfig;

pub mod error;
pub use error::RunError;

pub mod registry;
pub use registry::UnitRegistry;

pub mod demux;
pub use demux::{Demultiplexer, Frame, MessageStream, SENTINEL_PREFIX, classify};

pub mod reclaim;
pub use reclaim::{ReclaimState, Reclaimer};

mod orchestrator;
pub use orchestrator::Orchestrator;

pub mod run;
pub use run::{RunOutcome, run_and_wait};
