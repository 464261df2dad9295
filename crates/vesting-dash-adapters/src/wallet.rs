//! CIP-30 wallet reached through a local JSON-RPC bridge.
//!
//! The bridge forwards each call to the named browser wallet and relays its
//! answer. Every call carries the wallet name as its first parameter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;
use vesting_dash_core::{
    EncodedUtxo, PortError, SignedTx, TxId, UnsignedTx, WalletConnectorPort, WalletPort, Witness,
};

use crate::config::AdapterConfig;

/// CIP-30 `TxSignError.UserDeclined` / `APIError.Refused` code.
pub const USER_DECLINED_CODE: i64 = 2;

#[derive(Debug)]
struct BridgeRpc {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
    timeouts: CallTimeouts,
}

/// Per-call transport bounds. Calls that open a wallet prompt wait as long as
/// the matching cancellation step so the step bound is the one that fires.
#[derive(Debug, Clone, Copy)]
struct CallTimeouts {
    plain: Duration,
    sign: Duration,
    submit: Duration,
}

impl CallTimeouts {
    fn from_config(config: &AdapterConfig) -> Self {
        let plain = config.http_timeout();
        let steps = config.step_timeouts();
        Self {
            plain,
            sign: steps.sign.max(plain),
            submit: steps.submit.max(plain),
        }
    }

    fn for_method(&self, method: &str) -> Duration {
        match method {
            "signTx" => self.sign,
            "submitTx" => self.submit,
            _ => self.plain,
        }
    }
}

impl BridgeRpc {
    async fn call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeouts.for_method(method))
            .json(&payload)
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("wallet bridge request failed: {e}")))?;
        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| PortError::Transport(format!("wallet bridge read failed: {e}")))?;
        let body: Value = match serde_json::from_str(&raw) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(PortError::Transport(format!(
                    "wallet bridge status {status}: {raw}"
                )))
            }
            Err(e) => {
                return Err(PortError::Transport(format!(
                    "wallet bridge json decode failed: {e}"
                )))
            }
        };
        if let Some(err) = body.get("error").filter(|e| !e.is_null()) {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("wallet error")
                .to_owned();
            return match err.get("code").and_then(Value::as_i64) {
                Some(USER_DECLINED_CODE) => Err(PortError::Rejected(message)),
                _ => Err(PortError::Transport(format!(
                    "wallet bridge returned error: {err}"
                ))),
            };
        }
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "wallet bridge status {status}: {body}"
            )));
        }
        debug!(method, id, "wallet bridge call resolved");
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport("wallet bridge missing result".to_owned()))
    }
}

fn expect_string(method: &str, value: Value) -> Result<String, PortError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(PortError::Validation(format!(
            "{method}: string expected, got {other}"
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct BridgeWalletConnector {
    rpc: Arc<BridgeRpc>,
}

impl BridgeWalletConnector {
    pub fn with_config(config: &AdapterConfig) -> Result<Self, PortError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.http_timeout())
            .build()
            .map_err(|e| PortError::Transport(format!("http client init failed: {e}")))?;
        Ok(Self {
            rpc: Arc::new(BridgeRpc {
                url: config.wallet_bridge_url.clone(),
                client,
                next_id: AtomicU64::new(1),
                timeouts: CallTimeouts::from_config(config),
            }),
        })
    }
}

impl WalletConnectorPort for BridgeWalletConnector {
    type Wallet = BridgeWallet;

    async fn enable(&self, wallet_name: &str) -> Result<BridgeWallet, PortError> {
        let result = self.rpc.call("enable", json!([wallet_name])).await?;
        if result == Value::Bool(false) || result.is_null() {
            return Err(PortError::NotFound(format!(
                "wallet not available: {wallet_name}"
            )));
        }
        Ok(BridgeWallet {
            rpc: Arc::clone(&self.rpc),
            name: wallet_name.to_owned(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct BridgeWallet {
    rpc: Arc<BridgeRpc>,
    name: String,
}

impl BridgeWallet {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl WalletPort for BridgeWallet {
    async fn get_utxos(&self) -> Result<Vec<EncodedUtxo>, PortError> {
        let result = self.rpc.call("getUtxos", json!([self.name])).await?;
        let items = match result {
            Value::Null => return Ok(Vec::new()),
            Value::Array(items) => items,
            other => {
                return Err(PortError::Validation(format!(
                    "getUtxos: array expected, got {other}"
                )))
            }
        };
        items
            .into_iter()
            .map(|item| {
                let hex = expect_string("getUtxos", item)?;
                EncodedUtxo::from_hex(&hex)
                    .map_err(|e| PortError::Validation(format!("invalid utxo hex: {e}")))
            })
            .collect()
    }

    async fn get_change_address(&self) -> Result<String, PortError> {
        let result = self.rpc.call("getChangeAddress", json!([self.name])).await?;
        expect_string("getChangeAddress", result)
    }

    async fn sign_tx(&self, tx: &UnsignedTx, partial: bool) -> Result<Witness, PortError> {
        let result = self
            .rpc
            .call("signTx", json!([self.name, tx.to_hex(), partial]))
            .await?;
        let hex = expect_string("signTx", result)?;
        Witness::from_hex(&hex)
            .map_err(|e| PortError::Validation(format!("invalid witness hex: {e}")))
    }

    async fn submit_tx(&self, tx: &SignedTx) -> Result<TxId, PortError> {
        let result = self
            .rpc
            .call("submitTx", json!([self.name, tx.to_hex()]))
            .await?;
        expect_string("submitTx", result).map(TxId)
    }
}
