//! HTTP client of the transaction service that builds and finalizes
//! stake-request cancellations.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use vesting_dash_core::{
    CancellationRequest, EncodedUtxo, PortError, SignedTx, TransactionServicePort, UnsignedTx,
    Witness,
};

use crate::config::AdapterConfig;

pub const CANCEL_PATH: &str = "/transaction/stake/cancel";
pub const FINALIZE_PATH: &str = "/transaction/finalize";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputReferenceDto<'a> {
    tx_hash: &'a str,
    index: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelStakeRequestDto<'a> {
    stake_request_output_reference: OutputReferenceDto<'a>,
    wallet_utxo_list_cbor: &'a [EncodedUtxo],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FinalizeRequestDto<'a> {
    unsigned_tx_cbor: &'a UnsignedTx,
    tx_witness_cbor: &'a Witness,
}

#[derive(Debug, Clone)]
pub struct HttpTransactionService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransactionService {
    pub fn with_config(config: &AdapterConfig) -> Result<Self, PortError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| PortError::Transport(format!("http client init failed: {e}")))?;
        Ok(Self {
            base_url: config.tx_service_base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_for_hex(&self, path: &str, body: &impl Serialize) -> Result<String, PortError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("tx service request failed: {e}")))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PortError::Transport(format!("tx service body read failed: {e}")))?;
        if !status.is_success() {
            return Err(PortError::Rejected(format!("tx service status {status}: {text}")));
        }
        debug!(path, status = status.as_u16(), "tx service responded");
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::String(hex)) => Ok(hex),
            Ok(other) => Err(PortError::Validation(format!(
                "tx service returned non-string payload: {other}"
            ))),
            Err(e) => Err(PortError::Validation(format!(
                "tx service json decode failed: {e}"
            ))),
        }
    }
}

impl TransactionServicePort for HttpTransactionService {
    async fn build_cancellation(
        &self,
        request: &CancellationRequest,
    ) -> Result<UnsignedTx, PortError> {
        let body = CancelStakeRequestDto {
            stake_request_output_reference: OutputReferenceDto {
                tx_hash: request.tx_hash(),
                index: request.tx_index(),
            },
            wallet_utxo_list_cbor: request.utxos(),
        };
        let hex = self.post_for_hex(CANCEL_PATH, &body).await?;
        UnsignedTx::from_hex(&hex)
            .map_err(|e| PortError::Validation(format!("invalid unsigned tx hex: {e}")))
    }

    async fn finalize(
        &self,
        unsigned_tx: &UnsignedTx,
        witness: &Witness,
    ) -> Result<SignedTx, PortError> {
        let body = FinalizeRequestDto {
            unsigned_tx_cbor: unsigned_tx,
            tx_witness_cbor: witness,
        };
        let hex = self.post_for_hex(FINALIZE_PATH, &body).await?;
        SignedTx::from_hex(&hex)
            .map_err(|e| PortError::Validation(format!("invalid signed tx hex: {e}")))
    }
}
