use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{CancelTarget, CancellationRequest, TxId};
use crate::ports::{PortError, TransactionServicePort, WalletConnectorPort, WalletPort};
use crate::session::WalletSession;
use crate::state_machine::{
    cancel_transition, CancelAction, CancelStatus, CancelStep, StateTransition, TransitionError,
};

/// Upper bound for each protocol step. A step that runs past its bound fails
/// with that step's error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTimeouts {
    pub build: Duration,
    pub sign: Duration,
    pub finalize: Duration,
    pub submit: Duration,
}

impl Default for StepTimeouts {
    fn default() -> Self {
        Self {
            build: Duration::from_secs(20),
            // Covers the user reading the wallet prompt.
            sign: Duration::from_secs(180),
            finalize: Duration::from_secs(20),
            submit: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Error)]
pub enum CancelError {
    #[error("build failed: {0}")]
    Build(PortError),
    #[error("sign failed: {0}")]
    Sign(PortError),
    #[error("finalize failed: {0}")]
    Finalize(PortError),
    #[error("submit failed: {0}")]
    Submit(PortError),
    #[error("cancellation not ready: {0}")]
    NotReady(&'static str),
    #[error("another cancellation is in flight")]
    Busy,
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl CancelError {
    pub fn step(&self) -> Option<CancelStep> {
        match self {
            Self::Build(_) => Some(CancelStep::Build),
            Self::Sign(_) => Some(CancelStep::Sign),
            Self::Finalize(_) => Some(CancelStep::Finalize),
            Self::Submit(_) => Some(CancelStep::Submit),
            Self::NotReady(_) | Self::Busy | Self::Transition(_) => None,
        }
    }
}

/// Receives the single outcome signal of an attempt.
pub trait CancelObserver {
    fn cancellation_succeeded(&self);
    fn cancellation_failed(&self);
}

#[derive(Debug)]
pub struct CancelReport {
    pub request: Option<CancellationRequest>,
    pub transitions: Vec<StateTransition>,
    pub result: Result<TxId, CancelError>,
}

impl CancelReport {
    fn rejected(error: CancelError) -> Self {
        Self {
            request: None,
            transitions: Vec::new(),
            result: Err(error),
        }
    }

    pub fn final_status(&self) -> CancelStatus {
        self.transitions
            .last()
            .map(|t| t.to)
            .unwrap_or(CancelStatus::Idle)
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

struct Attempt {
    status: CancelStatus,
    transitions: Vec<StateTransition>,
}

impl Attempt {
    fn new() -> Self {
        Self {
            status: CancelStatus::Idle,
            transitions: Vec::new(),
        }
    }

    fn advance(&mut self, action: CancelAction) -> Result<(), TransitionError> {
        let (to, reason) = cancel_transition(self.status, action)?;
        debug!(from = ?self.status, to = ?to, reason, "cancel transition");
        self.transitions.push(StateTransition {
            from: self.status,
            to,
            reason,
        });
        self.status = to;
        Ok(())
    }

    fn fail(&mut self, error: CancelError) -> CancelError {
        if let Err(e) = self.advance(CancelAction::Fail) {
            warn!(error = %e, "could not record failed step");
        }
        error
    }
}

/// Clears the in-flight flag when the attempt ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs build -> sign -> finalize -> submit for one pending transaction.
///
/// Only one attempt runs at a time; the history table disables every cancel
/// button while [`Self::is_busy`] is true. Nothing is persisted between steps,
/// so any failure discards the attempt and a retry starts from build.
pub struct CancellationCoordinator<S: TransactionServicePort> {
    service: S,
    timeouts: StepTimeouts,
    in_flight: AtomicBool,
}

impl<S: TransactionServicePort> CancellationCoordinator<S> {
    pub fn new(service: S) -> Self {
        Self::with_timeouts(service, StepTimeouts::default())
    }

    pub fn with_timeouts(service: S, timeouts: StepTimeouts) -> Self {
        Self {
            service,
            timeouts,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn timeouts(&self) -> StepTimeouts {
        self.timeouts
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Runs one attempt. The observer hears exactly once for attempts that
    /// reach the build step and never for `Busy`/`NotReady` rejections.
    pub async fn cancel<C: WalletConnectorPort>(
        &self,
        session: &WalletSession<C>,
        target: CancelTarget,
        observer: &dyn CancelObserver,
    ) -> CancelReport {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            warn!(tx_hash = %target.tx_hash, "cancellation ignored: another attempt in flight");
            return CancelReport::rejected(CancelError::Busy);
        };
        let Some((wallet, utxos)) = session.cancel_context() else {
            warn!(tx_hash = %target.tx_hash, "cancellation ignored: wallet utxos unresolved");
            return CancelReport::rejected(CancelError::NotReady("wallet utxos unresolved"));
        };

        let request = CancellationRequest::new(target, utxos);
        let mut attempt = Attempt::new();
        let result = self.run(&mut attempt, wallet.as_ref(), &request).await;

        match &result {
            Ok(tx_id) => {
                info!(
                    tx_hash = request.tx_hash(),
                    tx_index = request.tx_index(),
                    submitted = %tx_id,
                    "cancellation submitted"
                );
                observer.cancellation_succeeded();
            }
            Err(e) => {
                warn!(
                    tx_hash = request.tx_hash(),
                    tx_index = request.tx_index(),
                    step = ?e.step(),
                    error = %e,
                    "cancellation failed"
                );
                observer.cancellation_failed();
            }
        }

        CancelReport {
            request: Some(request),
            transitions: attempt.transitions,
            result,
        }
    }

    async fn run<W: WalletPort>(
        &self,
        attempt: &mut Attempt,
        wallet: &W,
        request: &CancellationRequest,
    ) -> Result<TxId, CancelError> {
        attempt.advance(CancelAction::Start)?;
        let build = bounded(self.timeouts.build, self.service.build_cancellation(request)).await;
        let unsigned = match build {
            Ok(tx) if !tx.is_empty() => tx,
            Ok(_) => return Err(attempt.fail(CancelError::Build(empty_payload("unsigned tx")))),
            Err(e) => return Err(attempt.fail(CancelError::Build(e))),
        };

        attempt.advance(CancelAction::Built)?;
        let sign = bounded(self.timeouts.sign, wallet.sign_tx(&unsigned, true)).await;
        let witness = match sign {
            Ok(w) if !w.is_empty() => w,
            Ok(_) => return Err(attempt.fail(CancelError::Sign(empty_payload("witness")))),
            Err(e) => return Err(attempt.fail(CancelError::Sign(e))),
        };

        attempt.advance(CancelAction::Signed)?;
        let finalize = bounded(
            self.timeouts.finalize,
            self.service.finalize(&unsigned, &witness),
        )
        .await;
        let signed = match finalize {
            Ok(tx) if !tx.is_empty() => tx,
            Ok(_) => return Err(attempt.fail(CancelError::Finalize(empty_payload("signed tx")))),
            Err(e) => return Err(attempt.fail(CancelError::Finalize(e))),
        };

        attempt.advance(CancelAction::Finalized)?;
        let tx_id = match bounded(self.timeouts.submit, wallet.submit_tx(&signed)).await {
            Ok(id) => id,
            Err(e) => return Err(attempt.fail(CancelError::Submit(e))),
        };

        attempt.advance(CancelAction::Submitted)?;
        Ok(tx_id)
    }
}

async fn bounded<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, PortError>>,
) -> Result<T, PortError> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(PortError::Timeout(whole_millis(limit))),
    }
}

fn whole_millis(limit: Duration) -> u64 {
    u64::try_from(limit.as_millis()).unwrap_or(u64::MAX)
}

fn empty_payload(what: &str) -> PortError {
    PortError::Validation(format!("empty {what} payload"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_millis_saturate() {
        assert_eq!(whole_millis(Duration::from_millis(20)), 20);
        assert_eq!(whole_millis(Duration::MAX), u64::MAX);
    }
}
