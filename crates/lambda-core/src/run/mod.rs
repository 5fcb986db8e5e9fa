use std::{io::Write, sync::Arc};

use tracing::{debug, info, instrument, warn};

use lambda_model::{RunRequest, UnitId};

use crate::{
    config::RunConfig, demux::Demultiplexer, error::RunError, orchestrator::Orchestrator,
    reclaim::Reclaimer, registry::UnitRegistry,
};

/// Result of a run whose stream ended cleanly.
#[derive(Debug)]
pub struct RunOutcome {
    /// Exit code reported by the workload; `None` if the stream ended without one.
    pub exit_code: Option<i32>,
    /// Every unit seen on the stream, in first-seen order.
    pub units: Vec<UnitId>,
    /// Reclaimer of this run; cancelled already when `cancel_on_completion` is set.
    pub reclaimer: Reclaimer,
}

impl RunOutcome {
    /// Settle the reclaimer and return the exit code.
    ///
    /// A disarmed reclaimer settles at once; an armed one is awaited until it fires, so
    /// the removal call completes before the caller tears down the runtime.
    pub async fn finish(self) -> Option<i32> {
        let state = self.reclaimer.join().await;
        debug!(target: "lambda.core.reclaim", ?state, "reclaimer settled");
        self.exit_code
    }
}

/// Submit `request`, stream its output into `out`, and wait for the exit code.
///
/// A reclaimer is armed once the submission is accepted. If the stream is still open at
/// `config.timeout`, every unit seen so far is removed through the orchestrator; this does
/// not interrupt the stream itself. On a clean end-of-stream the reclaimer is disarmed
/// unless `config.cancel_on_completion` is off. On error it is left armed.
#[instrument(
    level = "debug",
    skip_all,
    fields(pool = %request.pool, image = %request.image, entrypoint = %request.entrypoint, count = request.count)
)]
pub async fn run_and_wait<O, W>(
    orchestrator: Arc<O>,
    request: &RunRequest,
    config: &RunConfig,
    out: W,
) -> Result<RunOutcome, RunError>
where
    O: Orchestrator + ?Sized,
    W: Write + Send,
{
    let mut stream = orchestrator.run_and_wait(request).await?;
    debug!("run submitted; streaming output");

    let registry = UnitRegistry::new();
    let reclaimer = {
        let orchestrator = Arc::clone(&orchestrator);
        Reclaimer::arm(config.timeout, registry.clone(), move |units| async move {
            if units.is_empty() {
                return;
            }
            if let Err(e) = orchestrator.remove_units(&units).await {
                warn!(target: "lambda.core.reclaim", units = units.len(), "reclaim failed: {}", e);
            }
        })
    };

    let mut demux = Demultiplexer::new(registry.clone(), out);
    let exit_code = demux.drain(stream.as_mut()).await?;

    if config.cancel_on_completion && reclaimer.cancel() {
        debug!("reclaimer disarmed");
    }
    info!(exit_code = ?exit_code, units = registry.len(), "run finished");

    Ok(RunOutcome {
        exit_code,
        units: registry.snapshot(),
        reclaimer,
    })
}
