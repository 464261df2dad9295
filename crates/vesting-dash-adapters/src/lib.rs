pub mod config;
pub mod tx_service;
pub mod wallet;

pub use config::{AdapterConfig, ConfigError};
pub use tx_service::HttpTransactionService;
pub use wallet::{BridgeWallet, BridgeWalletConnector};
