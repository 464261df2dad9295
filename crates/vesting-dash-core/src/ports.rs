use thiserror::Error;

use crate::domain::{CancellationRequest, EncodedUtxo, SignedTx, TxId, UnsignedTx, Witness};

#[derive(Debug, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("timed out after {0} ms")]
    Timeout(u64),
}

/// Remote service that assembles and finalizes cancellation transactions.
#[allow(async_fn_in_trait)]
pub trait TransactionServicePort {
    async fn build_cancellation(
        &self,
        request: &CancellationRequest,
    ) -> Result<UnsignedTx, PortError>;

    async fn finalize(
        &self,
        unsigned_tx: &UnsignedTx,
        witness: &Witness,
    ) -> Result<SignedTx, PortError>;
}

/// Capability object of an enabled wallet.
#[allow(async_fn_in_trait)]
pub trait WalletPort {
    async fn get_utxos(&self) -> Result<Vec<EncodedUtxo>, PortError>;
    async fn get_change_address(&self) -> Result<String, PortError>;
    /// `partial = true` asks for a witness only; the caller finalizes.
    async fn sign_tx(&self, tx: &UnsignedTx, partial: bool) -> Result<Witness, PortError>;
    async fn submit_tx(&self, tx: &SignedTx) -> Result<TxId, PortError>;
}

/// Entry point of a named wallet extension or bridge.
#[allow(async_fn_in_trait)]
pub trait WalletConnectorPort {
    type Wallet: WalletPort;

    async fn enable(&self, wallet_name: &str) -> Result<Self::Wallet, PortError>;
}
