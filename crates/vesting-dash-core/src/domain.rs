use alloy::primitives::Bytes;
use serde::{Deserialize, Serialize};

/// Column keys that locate a row's underlying transaction. Never displayed.
pub const TX_HASH_KEY: &str = "txHash";
pub const TX_INDEX_KEY: &str = "txIndex";
pub const STATUS_KEY: &str = "status";
pub const ACTIONS_KEY: &str = "actions";

pub fn is_structural_key(key: &str) -> bool {
    key == TX_HASH_KEY || key == TX_INDEX_KEY
}

/// Lifecycle of a vesting/stake transaction as reported by the row source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxStatus {
    Executed,
    Pending,
    Cancelled,
}

impl TxStatus {
    /// Exact, case-sensitive match against the row source labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Executed" => Some(Self::Executed),
            "Pending" => Some(Self::Pending),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Executed => "Executed",
            Self::Pending => "Pending",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Status cell payload. Labels outside the known set are kept verbatim so
/// newer backends can introduce states without breaking older dashboards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusKind {
    Known(TxStatus),
    Unrecognized(String),
}

impl StatusKind {
    pub fn from_label(label: &str) -> Self {
        TxStatus::from_label(label)
            .map(Self::Known)
            .unwrap_or_else(|| Self::Unrecognized(label.to_owned()))
    }

    pub fn known(&self) -> Option<TxStatus> {
        match self {
            Self::Known(status) => Some(*status),
            Self::Unrecognized(_) => None,
        }
    }
}

/// Output reference of the pending transaction a cancellation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelTarget {
    pub tx_hash: String,
    pub tx_index: String,
}

impl CancelTarget {
    pub fn new(tx_hash: impl Into<String>, tx_index: impl Into<String>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            tx_index: tx_index.into(),
        }
    }
}

macro_rules! cbor_payload {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(#[serde(with = "cbor_hex")] pub Bytes);

        impl $name {
            pub fn from_hex(raw: &str) -> Result<Self, alloy::hex::FromHexError> {
                alloy::hex::decode(raw.trim()).map(|bytes| Self(Bytes::from(bytes)))
            }

            pub fn to_hex(&self) -> String {
                alloy::hex::encode(&self.0)
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }
    };
}

cbor_payload!(
    /// One wallet UTXO, CBOR encoded as returned by `getUtxos`.
    EncodedUtxo
);
cbor_payload!(
    /// Cancellation transaction body awaiting a wallet witness.
    UnsignedTx
);
cbor_payload!(
    /// Witness set produced by a partial wallet signature.
    Witness
);
cbor_payload!(
    /// Fully witnessed transaction ready for submission.
    SignedTx
);

/// Identifier returned by the wallet after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(pub String);

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable request handed to the transaction service: the target output
/// plus the UTXO set as it was when the user asked for the cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationRequest {
    target: CancelTarget,
    utxos: Vec<EncodedUtxo>,
}

impl CancellationRequest {
    pub fn new(target: CancelTarget, utxos: Vec<EncodedUtxo>) -> Self {
        Self { target, utxos }
    }

    pub fn target(&self) -> &CancelTarget {
        &self.target
    }

    pub fn tx_hash(&self) -> &str {
        &self.target.tx_hash
    }

    pub fn tx_index(&self) -> &str {
        &self.target.tx_index
    }

    pub fn utxos(&self) -> &[EncodedUtxo] {
        &self.utxos
    }
}

/// Hex without `0x`, the way CIP-30 wallets and the sync API exchange CBOR.
mod cbor_hex {
    use alloy::primitives::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&alloy::hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let raw = String::deserialize(deserializer)?;
        alloy::hex::decode(raw.trim())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
