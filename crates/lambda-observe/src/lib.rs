//! Logging bootstrap for lambda binaries.
//!
//! Diagnostics go to stderr; stdout is left to workload output.

mod logger;
pub use logger::*;
