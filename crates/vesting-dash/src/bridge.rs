//! Bridge between the egui shell and the dashboard workspace crates.
//! The shell reaches the wallet and the transaction service only through here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use eframe::egui;
use eyre::WrapErr;
use tracing::{debug, info};
use vesting_dash_adapters::{AdapterConfig, BridgeWalletConnector, HttpTransactionService};
use vesting_dash_core::{
    CancelError, CancelObserver, CancelReadiness, CancelTarget, CancellationCoordinator,
    ConnectReport, SessionSnapshot, WalletSession,
};

/// Hand-off cell between a worker thread and the next frame.
pub type Slot<T> = Arc<Mutex<Option<T>>>;

pub fn store<T>(slot: &Slot<T>, value: T) {
    *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
}

pub fn take<T>(slot: &Slot<T>) -> Option<T> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

#[derive(Debug, Clone)]
pub enum ConnectOutcome {
    Connected(ConnectReport),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelSignal {
    Succeeded,
    Failed,
}

/// Forwards the coordinator's boolean outcome to the page.
struct PageObserver {
    slot: Slot<CancelSignal>,
    ctx: egui::Context,
}

impl CancelObserver for PageObserver {
    fn cancellation_succeeded(&self) {
        store(&self.slot, CancelSignal::Succeeded);
        self.ctx.request_repaint();
    }

    fn cancellation_failed(&self) {
        store(&self.slot, CancelSignal::Failed);
        self.ctx.request_repaint();
    }
}

/// Held from the click until the cancel worker exits, so the table locks
/// before the coordinator takes its own guard on the worker thread.
#[derive(Debug, Default, Clone)]
struct LaunchGate(Arc<AtomicBool>);

impl LaunchGate {
    fn try_begin(&self) -> Option<LaunchGuard> {
        if self.0.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(LaunchGuard(Arc::clone(&self.0)))
    }

    fn is_held(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct LaunchGuard(Arc<AtomicBool>);

impl Drop for LaunchGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct DashboardBridge {
    runtime: Arc<tokio::runtime::Runtime>,
    session: Arc<WalletSession<BridgeWalletConnector>>,
    coordinator: Arc<CancellationCoordinator<HttpTransactionService>>,
    config: Arc<AdapterConfig>,
    cancel_gate: LaunchGate,
}

impl DashboardBridge {
    pub fn new(config: &AdapterConfig) -> eyre::Result<Self> {
        // One runtime for every worker so pooled HTTP connections outlive a single call.
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .wrap_err("failed to start async runtime")?;
        let connector =
            BridgeWalletConnector::with_config(config).wrap_err("wallet bridge client")?;
        let service =
            HttpTransactionService::with_config(config).wrap_err("transaction service client")?;

        Ok(Self {
            runtime: Arc::new(runtime),
            session: Arc::new(WalletSession::new(connector)),
            coordinator: Arc::new(CancellationCoordinator::with_timeouts(
                service,
                config.step_timeouts(),
            )),
            config: Arc::new(config.clone()),
            cancel_gate: LaunchGate::default(),
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn readiness(&self) -> CancelReadiness {
        CancelReadiness {
            utxos_resolved: self.session.utxos_resolved(),
            attempt_in_flight: self.cancel_gate.is_held() || self.coordinator.is_busy(),
        }
    }

    pub fn connect(&self, wallet_name: String, ctx: &egui::Context, slot: Slot<ConnectOutcome>) {
        let runtime = Arc::clone(&self.runtime);
        let session = Arc::clone(&self.session);
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let outcome = match runtime.block_on(session.connect(&wallet_name)) {
                Ok(report) => ConnectOutcome::Connected(report),
                Err(e) => ConnectOutcome::Failed(format!("Could not enable {wallet_name}: {e}")),
            };
            store(&slot, outcome);
            ctx.request_repaint();
        });
    }

    pub fn disconnect(&self) {
        self.session.disconnect();
    }

    /// Starts a cancellation worker. Returns false when one is already running.
    pub fn cancel(
        &self,
        target: CancelTarget,
        ctx: &egui::Context,
        slot: Slot<CancelSignal>,
    ) -> bool {
        let Some(launch) = self.cancel_gate.try_begin() else {
            debug!("cancel click ignored, attempt already launched");
            return false;
        };
        let runtime = Arc::clone(&self.runtime);
        let session = Arc::clone(&self.session);
        let coordinator = Arc::clone(&self.coordinator);
        let config = Arc::clone(&self.config);
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let _launch = launch;
            let observer = PageObserver {
                slot,
                ctx: ctx.clone(),
            };
            let report = runtime.block_on(coordinator.cancel(&session, target, &observer));
            match &report.result {
                Ok(tx_id) => info!(
                    link = %config.transaction_link(&tx_id.0),
                    steps = report.transitions.len(),
                    "cancellation transaction submitted"
                ),
                Err(CancelError::Busy | CancelError::NotReady(_)) => {
                    debug!(error = ?report.result, "cancel click ignored")
                }
                Err(_) => debug!(transitions = ?report.transitions, "cancellation attempt trace"),
            }
            // The in-flight flags clear only after the observer fired.
            ctx.request_repaint();
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_gate_admits_one_attempt_until_released() {
        let gate = LaunchGate::default();

        let first = gate.try_begin().expect("first launch");
        assert!(gate.is_held());
        assert!(gate.try_begin().is_none());

        drop(first);
        assert!(!gate.is_held());
        assert!(gate.try_begin().is_some());
    }

    #[test]
    fn launched_attempt_disables_cancel_before_worker_runs() {
        let bridge = DashboardBridge::new(&AdapterConfig::default()).expect("bridge");
        assert!(!bridge.readiness().attempt_in_flight);

        let launch = bridge.cancel_gate.try_begin().expect("launch");

        assert!(bridge.readiness().attempt_in_flight);
        drop(launch);
        assert!(!bridge.readiness().attempt_in_flight);
    }
}
