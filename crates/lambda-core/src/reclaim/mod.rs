//! Deadline-bound reclamation of units that may still be alive.
//!
//! A [`Reclaimer`] is a one-shot deferred action: `Armed -> Fired` when the deadline
//! passes, or `Armed -> Cancelled` when disarmed first. Both end states are terminal
//! and the reclaim action runs at most once.

use std::{
    fmt,
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
    time::Duration,
};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use lambda_model::UnitId;

use crate::registry::UnitRegistry;

const ARMED: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclaimState {
    Armed,
    Fired,
    Cancelled,
}

impl ReclaimState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            FIRED => ReclaimState::Fired,
            CANCELLED => ReclaimState::Cancelled,
            _ => ReclaimState::Armed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReclaimState::Armed)
    }
}

pub struct Reclaimer {
    state: Arc<AtomicU8>,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Reclaimer {
    /// Arm a reclaimer on the current tokio runtime.
    ///
    /// Unless cancelled first, `reclaim` is called once at `deadline` with the registry
    /// snapshot taken at fire time. The action is best-effort: it should swallow its own
    /// failures.
    pub fn arm<F, Fut>(deadline: Duration, registry: UnitRegistry, reclaim: F) -> Self
    where
        F: FnOnce(Vec<UnitId>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let state = Arc::new(AtomicU8::new(ARMED));
        let token = CancellationToken::new();

        let handle = {
            let state = Arc::clone(&state);
            let token = token.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(deadline) => {
                        if transition(&state, FIRED) {
                            let units = registry.snapshot();
                            info!(target: "lambda.core.reclaim", units = units.len(), "deadline reached; reclaiming units");
                            reclaim(units).await;
                        }
                    }
                    _ = token.cancelled() => {
                        debug!(target: "lambda.core.reclaim", "disarmed before deadline");
                    }
                }
            })
        };
        debug!(target: "lambda.core.reclaim", ?deadline, "armed");

        Self {
            state,
            token,
            handle,
        }
    }

    pub fn state(&self) -> ReclaimState {
        ReclaimState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Disarm the reclaimer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&self) -> bool {
        let cancelled = transition(&self.state, CANCELLED);
        if cancelled {
            self.token.cancel();
        }
        cancelled
    }

    /// Wait for the deferred task to finish and report the final state.
    ///
    /// Waiting on an armed reclaimer lasts until its deadline.
    pub async fn join(self) -> ReclaimState {
        let Self { state, handle, .. } = self;
        let _ = handle.await;
        ReclaimState::from_raw(state.load(Ordering::Acquire))
    }
}

impl fmt::Debug for Reclaimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reclaimer")
            .field("state", &self.state())
            .finish()
    }
}

fn transition(state: &AtomicU8, to: u8) -> bool {
    state
        .compare_exchange(ARMED, to, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    type Calls = Arc<Mutex<Vec<Vec<UnitId>>>>;

    fn recorder() -> (Calls, impl FnOnce(Vec<UnitId>) -> std::future::Ready<()> + Send + 'static) {
        let calls: Calls = Arc::default();
        let sink = Arc::clone(&calls);
        let f = move |units: Vec<UnitId>| {
            sink.lock().unwrap().push(units);
            std::future::ready(())
        };
        (calls, f)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_at_deadline_with_current_snapshot() {
        let registry = UnitRegistry::new();
        registry.add(&UnitId::from("a"));
        let (calls, f) = recorder();

        let r = Reclaimer::arm(Duration::from_secs(10), registry.clone(), f);
        registry.add(&UnitId::from("b"));
        assert_eq!(r.state(), ReclaimState::Armed);

        assert_eq!(r.join().await, ReclaimState::Fired);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec![UnitId::from("a"), UnitId::from("b")]);
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_fire_before_deadline() {
        let (calls, f) = recorder();
        let r = Reclaimer::arm(Duration::from_secs(10), UnitRegistry::new(), f);

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(r.state(), ReclaimState::Armed);
        assert!(calls.lock().unwrap().is_empty());
        r.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_deadline_prevents_firing() {
        let registry = UnitRegistry::new();
        registry.add(&UnitId::from("a"));
        let (calls, f) = recorder();

        let r = Reclaimer::arm(Duration::from_secs(10), registry, f);
        assert!(r.cancel());
        assert_eq!(r.state(), ReclaimState::Cancelled);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(r.join().await, ReclaimState::Cancelled);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_fire_is_noop() {
        let (calls, f) = recorder();
        let r = Reclaimer::arm(Duration::from_millis(5), UnitRegistry::new(), f);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(r.state(), ReclaimState::Fired);
        assert!(!r.cancel());
        assert_eq!(r.state(), ReclaimState::Fired);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_twice_reports_once() {
        let (_calls, f) = recorder();
        let r = Reclaimer::arm(Duration::from_secs(1), UnitRegistry::new(), f);
        assert!(r.cancel());
        assert!(!r.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn fires_with_empty_snapshot() {
        let (calls, f) = recorder();
        let r = Reclaimer::arm(Duration::from_secs(1), UnitRegistry::new(), f);
        assert_eq!(r.join().await, ReclaimState::Fired);
        assert_eq!(calls.lock().unwrap().as_slice(), &[Vec::<UnitId>::new()]);
    }

    #[tokio::test(start_paused = true)]
    async fn join_after_cancel_does_not_wait_for_deadline() {
        let (_calls, f) = recorder();
        let started = tokio::time::Instant::now();
        let r = Reclaimer::arm(Duration::from_secs(60), UnitRegistry::new(), f);

        r.cancel();
        assert_eq!(r.join().await, ReclaimState::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[test]
    fn terminal_states() {
        assert!(!ReclaimState::Armed.is_terminal());
        assert!(ReclaimState::Fired.is_terminal());
        assert!(ReclaimState::Cancelled.is_terminal());
    }
}
