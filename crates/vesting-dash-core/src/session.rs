//! Connected-wallet state shared by the history page and the cancellation
//! coordinator.
//!
//! `connect` resolves the wallet capability, then fetches the change address
//! and the UTXO set concurrently. Either may land first, so readers see each
//! field as independently optional. Every connect/disconnect bumps a
//! generation; results from a superseded connect are dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::domain::EncodedUtxo;
use crate::ports::{PortError, WalletConnectorPort, WalletPort};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub wallet_name: Option<String>,
    pub connected: bool,
    pub change_address: Option<String>,
    pub utxos: Option<Vec<EncodedUtxo>>,
}

impl SessionSnapshot {
    pub fn utxos_resolved(&self) -> bool {
        self.connected && self.utxos.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectReport {
    pub superseded: bool,
    pub utxos_resolved: bool,
    pub change_address_resolved: bool,
}

struct SessionState<W> {
    generation: u64,
    snapshot: SessionSnapshot,
    wallet: Option<Arc<W>>,
}

pub struct WalletSession<C: WalletConnectorPort> {
    connector: C,
    state: Mutex<SessionState<C::Wallet>>,
}

impl<C: WalletConnectorPort> WalletSession<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            state: Mutex::new(SessionState {
                generation: 0,
                snapshot: SessionSnapshot::default(),
                wallet: None,
            }),
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn lock(&self) -> MutexGuard<'_, SessionState<C::Wallet>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `f` only if no connect/disconnect happened since `generation`.
    fn store(&self, generation: u64, f: impl FnOnce(&mut SessionState<C::Wallet>)) -> bool {
        let mut g = self.lock();
        if g.generation != generation {
            return false;
        }
        f(&mut *g);
        true
    }

    pub async fn connect(&self, wallet_name: &str) -> Result<ConnectReport, PortError> {
        let generation = {
            let mut g = self.lock();
            g.generation = g.generation.saturating_add(1);
            g.wallet = None;
            g.snapshot = SessionSnapshot {
                wallet_name: Some(wallet_name.to_owned()),
                ..SessionSnapshot::default()
            };
            g.generation
        };

        let wallet = match self.connector.enable(wallet_name).await {
            Ok(wallet) => Arc::new(wallet),
            Err(e) => {
                warn!(wallet = wallet_name, error = %e, "wallet enable failed");
                self.store(generation, |s| s.snapshot.wallet_name = None);
                return Err(e);
            }
        };

        let stored = self.store(generation, |s| {
            s.wallet = Some(Arc::clone(&wallet));
            s.snapshot.connected = true;
        });
        if !stored {
            debug!(wallet = wallet_name, "connect superseded before enable resolved");
            return Ok(ConnectReport {
                superseded: true,
                ..ConnectReport::default()
            });
        }

        let (utxos_resolved, change_address_resolved) = tokio::join!(
            async {
                match wallet.get_utxos().await {
                    Ok(utxos) => {
                        debug!(count = utxos.len(), "utxos resolved");
                        self.store(generation, |s| s.snapshot.utxos = Some(utxos))
                    }
                    Err(e) => {
                        warn!(wallet = wallet_name, error = %e, "utxo fetch failed");
                        false
                    }
                }
            },
            async {
                match wallet.get_change_address().await {
                    Ok(address) => {
                        self.store(generation, |s| s.snapshot.change_address = Some(address))
                    }
                    Err(e) => {
                        warn!(wallet = wallet_name, error = %e, "change address fetch failed");
                        false
                    }
                }
            },
        );

        let superseded = self.lock().generation != generation;
        info!(
            wallet = wallet_name,
            utxos_resolved, change_address_resolved, superseded, "wallet session connected"
        );
        Ok(ConnectReport {
            superseded,
            utxos_resolved,
            change_address_resolved,
        })
    }

    pub fn disconnect(&self) {
        let mut g = self.lock();
        g.generation = g.generation.saturating_add(1);
        g.wallet = None;
        g.snapshot = SessionSnapshot::default();
        debug!("wallet session cleared");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot.clone()
    }

    pub fn utxos_resolved(&self) -> bool {
        self.lock().snapshot.utxos_resolved()
    }

    /// Wallet capability plus a copy of the UTXO set, when both are ready.
    pub fn cancel_context(&self) -> Option<(Arc<C::Wallet>, Vec<EncodedUtxo>)> {
        let g = self.lock();
        if !g.snapshot.connected {
            return None;
        }
        let wallet = g.wallet.as_ref()?;
        let utxos = g.snapshot.utxos.as_ref()?;
        Some((Arc::clone(wallet), utxos.clone()))
    }
}
