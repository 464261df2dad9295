#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use vesting_dash_core::{
    CancelObserver, CancellationRequest, EncodedUtxo, PortError, Row, SignedTx,
    TransactionServicePort, TxId, UnsignedTx, WalletConnectorPort, WalletPort, Witness,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Build,
    Sign,
    Finalize,
    Submit,
}

/// Shared record of every collaborator call, in order.
#[derive(Debug, Default)]
pub struct Script {
    pub calls: Vec<&'static str>,
    pub fail_at: Option<FailAt>,
    pub partial_flags: Vec<bool>,
    pub last_request: Option<CancellationRequest>,
    pub build_delay: Option<Duration>,
}

pub type SharedScript = Arc<Mutex<Script>>;

pub fn script(fail_at: Option<FailAt>) -> SharedScript {
    Arc::new(Mutex::new(Script {
        fail_at,
        ..Script::default()
    }))
}

pub fn calls(script: &SharedScript) -> Vec<&'static str> {
    script.lock().expect("script lock").calls.clone()
}

fn record(script: &SharedScript, call: &'static str) -> Option<FailAt> {
    let mut g = script.lock().expect("script lock");
    g.calls.push(call);
    g.fail_at
}

pub struct MockService {
    pub script: SharedScript,
}

impl TransactionServicePort for MockService {
    async fn build_cancellation(
        &self,
        request: &CancellationRequest,
    ) -> Result<UnsignedTx, PortError> {
        let fail_at = record(&self.script, "build");
        let delay = {
            let mut g = self.script.lock().expect("script lock");
            g.last_request = Some(request.clone());
            g.build_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fail_at == Some(FailAt::Build) {
            return Err(PortError::Rejected("stake request output already spent".to_owned()));
        }
        Ok(UnsignedTx::from_hex("84a40081825820").expect("unsigned hex"))
    }

    async fn finalize(
        &self,
        _unsigned_tx: &UnsignedTx,
        _witness: &Witness,
    ) -> Result<SignedTx, PortError> {
        if record(&self.script, "finalize") == Some(FailAt::Finalize) {
            return Err(PortError::Validation("malformed witness set".to_owned()));
        }
        Ok(SignedTx::from_hex("84a40081825820a100").expect("signed hex"))
    }
}

#[derive(Clone)]
pub struct MockWallet {
    pub script: SharedScript,
    pub utxos: Result<Vec<EncodedUtxo>, String>,
    pub change_address: Result<String, String>,
    pub utxo_delay: Option<Duration>,
}

impl MockWallet {
    pub fn new(script: SharedScript, utxo_count: usize) -> Self {
        Self {
            script,
            utxos: Ok(utxos(utxo_count)),
            change_address: Ok("addr_test1qz2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzer3".to_owned()),
            utxo_delay: None,
        }
    }
}

impl WalletPort for MockWallet {
    async fn get_utxos(&self) -> Result<Vec<EncodedUtxo>, PortError> {
        if let Some(delay) = self.utxo_delay {
            tokio::time::sleep(delay).await;
        }
        self.utxos.clone().map_err(PortError::Transport)
    }

    async fn get_change_address(&self) -> Result<String, PortError> {
        self.change_address.clone().map_err(PortError::Transport)
    }

    async fn sign_tx(&self, _tx: &UnsignedTx, partial: bool) -> Result<Witness, PortError> {
        let fail_at = record(&self.script, "sign");
        self.script
            .lock()
            .expect("script lock")
            .partial_flags
            .push(partial);
        if fail_at == Some(FailAt::Sign) {
            return Err(PortError::Rejected("user declined signing".to_owned()));
        }
        Ok(Witness::from_hex("a10081825820").expect("witness hex"))
    }

    async fn submit_tx(&self, _tx: &SignedTx) -> Result<TxId, PortError> {
        if record(&self.script, "submit") == Some(FailAt::Submit) {
            return Err(PortError::Rejected("inputs already spent".to_owned()));
        }
        Ok(TxId("5f1c0ffee".to_owned()))
    }
}

#[derive(Default)]
pub struct MockConnector {
    pub wallets: HashMap<String, MockWallet>,
}

impl MockConnector {
    pub fn with_wallet(mut self, name: &str, wallet: MockWallet) -> Self {
        self.wallets.insert(name.to_owned(), wallet);
        self
    }
}

impl WalletConnectorPort for MockConnector {
    type Wallet = MockWallet;

    async fn enable(&self, wallet_name: &str) -> Result<MockWallet, PortError> {
        self.wallets
            .get(wallet_name)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("wallet not installed: {wallet_name}")))
    }
}

#[derive(Debug, Default)]
pub struct CountingObserver {
    pub succeeded: AtomicUsize,
    pub failed: AtomicUsize,
}

impl CountingObserver {
    pub fn counts(&self) -> (usize, usize) {
        (
            self.succeeded.load(Ordering::SeqCst),
            self.failed.load(Ordering::SeqCst),
        )
    }
}

impl CancelObserver for CountingObserver {
    fn cancellation_succeeded(&self) {
        self.succeeded.fetch_add(1, Ordering::SeqCst);
    }

    fn cancellation_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn utxos(count: usize) -> Vec<EncodedUtxo> {
    (0..count)
        .map(|i| EncodedUtxo::from_hex(&format!("8282582000{i:02x}")).expect("utxo hex"))
        .collect()
}

pub fn pending_row() -> Row {
    Row::from_json(&json!({
        "txHash": "abc",
        "txIndex": "0",
        "status": "Pending"
    }))
    .expect("object row")
}
