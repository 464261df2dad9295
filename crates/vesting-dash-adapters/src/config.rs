use std::time::Duration;

use vesting_dash_core::StepTimeouts;

const ENV_PREFIX: &str = "VESTING_DASH_";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an unsigned integer, got {value:?}")]
    InvalidNumber { var: String, value: String },
    #[error("{var} must not be empty")]
    Empty { var: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub tx_service_base_url: String,
    pub wallet_bridge_url: String,
    pub default_wallet_name: String,
    pub http_timeout_ms: u64,
    pub build_timeout_ms: u64,
    pub sign_timeout_ms: u64,
    pub finalize_timeout_ms: u64,
    pub submit_timeout_ms: u64,
    pub explorer_base_url: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            tx_service_base_url: "http://127.0.0.1:7020".to_owned(),
            wallet_bridge_url: "http://127.0.0.1:7021/rpc".to_owned(),
            default_wallet_name: "nami".to_owned(),
            http_timeout_ms: 15_000,
            build_timeout_ms: 20_000,
            sign_timeout_ms: 180_000,
            finalize_timeout_ms: 20_000,
            submit_timeout_ms: 30_000,
            explorer_base_url: "https://cardanoscan.io/transaction".to_owned(),
        }
    }
}

impl AdapterConfig {
    /// Defaults overridden by any `VESTING_DASH_*` variable that is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        let get = |suffix: &str| {
            let var = format!("{ENV_PREFIX}{suffix}");
            lookup(&var).map(|value| (var, value))
        };

        for (suffix, slot) in [
            ("TX_SERVICE_URL", &mut cfg.tx_service_base_url),
            ("WALLET_BRIDGE_URL", &mut cfg.wallet_bridge_url),
            ("WALLET_NAME", &mut cfg.default_wallet_name),
            ("EXPLORER_URL", &mut cfg.explorer_base_url),
        ] {
            if let Some((var, value)) = get(suffix) {
                let value = value.trim();
                if value.is_empty() {
                    return Err(ConfigError::Empty { var });
                }
                *slot = value.trim_end_matches('/').to_owned();
            }
        }

        for (suffix, slot) in [
            ("HTTP_TIMEOUT_MS", &mut cfg.http_timeout_ms),
            ("BUILD_TIMEOUT_MS", &mut cfg.build_timeout_ms),
            ("SIGN_TIMEOUT_MS", &mut cfg.sign_timeout_ms),
            ("FINALIZE_TIMEOUT_MS", &mut cfg.finalize_timeout_ms),
            ("SUBMIT_TIMEOUT_MS", &mut cfg.submit_timeout_ms),
        ] {
            if let Some((var, value)) = get(suffix) {
                *slot = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber { var, value })?;
            }
        }

        Ok(cfg)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn step_timeouts(&self) -> StepTimeouts {
        StepTimeouts {
            build: Duration::from_millis(self.build_timeout_ms),
            sign: Duration::from_millis(self.sign_timeout_ms),
            finalize: Duration::from_millis(self.finalize_timeout_ms),
            submit: Duration::from_millis(self.submit_timeout_ms),
        }
    }

    pub fn transaction_link(&self, tx_hash: &str) -> String {
        format!("{}/{tx_hash}", self.explorer_base_url)
    }
}
