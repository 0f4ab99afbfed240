use std::fs;
use std::path::Path;

use flood_types::{Coin, FloodError, FloodResult, DEFAULT_GAS_ADJUSTMENT, DEFAULT_TICK_SPACING};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Keeper configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeeperConfig {
    /// Chain ID used in sign docs
    pub chain_id: String,

    /// gRPC endpoint for queries and broadcast
    pub grpc_address: String,

    /// CometBFT RPC endpoint, used for the event websocket
    pub rpc_address: String,

    /// Websocket path appended to `rpc_address`
    #[serde(default = "default_websocket_path")]
    pub websocket_path: String,

    /// Address the keeper signs as (the grantee)
    pub signer_address: String,

    /// File holding the hex-encoded secp256k1 private key
    pub key_file: String,

    /// Event query override, defaults to swaps in the configured pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_query: Option<String>,

    /// Exit the process when a run fails on a chain query
    #[serde(default = "default_true")]
    pub exit_on_query_error: bool,

    /// Power-perp market the keeper makes
    pub power: PowerConfig,

    /// Position placement
    pub strategy: StrategyConfig,

    /// Transaction fees and gas
    #[serde(default)]
    pub gas: GasConfig,

    /// Event subscription reconnect backoff
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Power-perp contract and the pool whose swaps trigger runs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PowerConfig {
    /// Power-perp controller contract
    pub contract_address: String,

    /// Pool watched for swap events
    pub pool_id: u64,
}

/// What to do with an account when its tick range cannot be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickFailurePolicy {
    /// Withdraw the account's positions, create nothing
    #[default]
    WithdrawOnly,
    /// Leave the account out of the batch entirely
    SkipAccount,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyConfig {
    /// Fraction of price between inner and outer boundaries, in [0, 1)
    #[serde(with = "rust_decimal::serde::str")]
    pub spread: Decimal,

    /// Pool tick spacing
    #[serde(default = "default_tick_spacing")]
    pub tick_spacing: i64,

    /// Deposit for the range above the current tick
    pub token0: Coin,

    /// Deposit for the range below the current tick
    pub token1: Coin,

    /// Quote pool prices as 1 / price
    #[serde(default = "default_true")]
    pub invert_prices: bool,

    #[serde(default)]
    pub tick_failure_policy: TickFailurePolicy,

    /// Accounts processed concurrently within one run
    #[serde(default = "default_max_concurrent_accounts")]
    pub max_concurrent_accounts: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GasConfig {
    /// Fixed gas limit; simulated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Multiplier applied to simulated gas
    #[serde(default = "default_gas_adjustment")]
    pub adjustment: f64,

    /// Fee paid per transaction
    pub fees: Coin,
}

/// Retry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Maximum consecutive reconnect attempts
    pub max_retries: u32,

    /// Base delay between retries in milliseconds
    pub base_delay_ms: u64,

    /// Maximum delay between retries in milliseconds
    pub max_delay_ms: u64,

    /// Exponential backoff multiplier
    pub backoff_multiplier: f64,
}

fn default_websocket_path() -> String {
    "/websocket".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tick_spacing() -> i64 {
    DEFAULT_TICK_SPACING
}

fn default_gas_adjustment() -> f64 {
    DEFAULT_GAS_ADJUSTMENT
}

fn default_max_concurrent_accounts() -> usize {
    1
}

impl KeeperConfig {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> FloodResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FloodError::invalid_configuration("config", format!("failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::from_toml(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration without validating it
    pub fn from_toml(content: &str) -> FloodResult<Self> {
        toml::from_str(content).map_err(|e| FloodError::invalid_configuration("config", e))
    }

    pub fn to_toml(&self) -> FloodResult<String> {
        toml::to_string_pretty(self).map_err(|e| FloodError::invalid_configuration("config", e))
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> FloodResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_toml()?).map_err(|e| {
            FloodError::invalid_configuration("config", format!("failed to write {}: {}", path.display(), e))
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> FloodResult<()> {
        for (name, value) in [
            ("chain_id", &self.chain_id),
            ("grpc_address", &self.grpc_address),
            ("rpc_address", &self.rpc_address),
            ("signer_address", &self.signer_address),
            ("key_file", &self.key_file),
            ("power.contract_address", &self.power.contract_address),
        ] {
            if value.trim().is_empty() {
                return Err(FloodError::invalid_parameter(name, "empty", "non-empty string"));
            }
        }

        if self.power.pool_id == 0 {
            return Err(FloodError::invalid_parameter("power.pool_id", "0", "greater than 0"));
        }

        if let Some(query) = &self.event_query {
            if query.trim().is_empty() {
                return Err(FloodError::invalid_parameter("event_query", "empty", "non-empty query"));
            }
        }

        self.strategy.validate()?;
        self.gas.validate()?;
        self.retry.validate()?;

        Ok(())
    }

    /// Websocket URL derived from the RPC address
    pub fn websocket_url(&self) -> FloodResult<String> {
        let address = self.rpc_address.trim_end_matches('/');
        let rest = if let Some(rest) = address.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = address.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else if let Some(rest) = address.strip_prefix("tcp://") {
            format!("ws://{}", rest)
        } else if address.starts_with("ws://") || address.starts_with("wss://") {
            address.to_string()
        } else {
            return Err(FloodError::invalid_parameter(
                "rpc_address",
                &self.rpc_address,
                "http://, https://, tcp://, ws:// or wss:// URL",
            ));
        };

        let path = self.websocket_path.trim();
        if path.starts_with('/') {
            Ok(format!("{}{}", rest, path))
        } else {
            Ok(format!("{}/{}", rest, path))
        }
    }

    /// Query selecting swaps in the watched pool
    pub fn event_query(&self) -> String {
        match &self.event_query {
            Some(query) => query.clone(),
            None => format!(
                "token_swapped.module = 'gamm' AND token_swapped.pool_id = '{}'",
                self.power.pool_id
            ),
        }
    }
}

impl StrategyConfig {
    fn validate(&self) -> FloodResult<()> {
        if self.spread.is_sign_negative() || self.spread >= Decimal::ONE {
            return Err(FloodError::invalid_parameter(
                "strategy.spread",
                &self.spread.to_string(),
                "in [0, 1)",
            ));
        }

        if self.tick_spacing <= 0 {
            return Err(FloodError::InvalidTickSpacing { spacing: self.tick_spacing });
        }

        if self.token0.denom == self.token1.denom {
            return Err(FloodError::invalid_parameter(
                "strategy.token1",
                &self.token1.denom,
                "a denom different from token0",
            ));
        }

        if self.max_concurrent_accounts == 0 {
            return Err(FloodError::invalid_parameter("strategy.max_concurrent_accounts", "0", "greater than 0"));
        }

        Ok(())
    }
}

impl GasConfig {
    fn validate(&self) -> FloodResult<()> {
        if self.limit == Some(0) {
            return Err(FloodError::invalid_parameter("gas.limit", "0", "greater than 0"));
        }

        if !self.adjustment.is_finite() || self.adjustment < 1.0 {
            return Err(FloodError::invalid_parameter(
                "gas.adjustment",
                &self.adjustment.to_string(),
                "at least 1.0",
            ));
        }

        Ok(())
    }
}

impl RetryConfig {
    /// Validate retry configuration
    fn validate(&self) -> FloodResult<()> {
        if self.max_retries == 0 {
            return Err(FloodError::invalid_parameter("max_retries", "0", "greater than 0"));
        }

        if self.base_delay_ms == 0 {
            return Err(FloodError::invalid_parameter("base_delay_ms", "0", "greater than 0"));
        }

        if self.max_delay_ms < self.base_delay_ms {
            return Err(FloodError::invalid_parameter(
                "max_delay_ms",
                &self.max_delay_ms.to_string(),
                &format!("greater than or equal to base_delay_ms ({})", self.base_delay_ms),
            ));
        }

        if self.backoff_multiplier <= 1.0 {
            return Err(FloodError::invalid_parameter(
                "backoff_multiplier",
                &self.backoff_multiplier.to_string(),
                "greater than 1.0",
            ));
        }

        Ok(())
    }

    /// Calculate delay for retry attempt
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        if attempt == 0 {
            return self.base_delay_ms;
        }

        let exponential_delay = self.base_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        (exponential_delay as u64).min(self.max_delay_ms)
    }
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            limit: None,
            adjustment: DEFAULT_GAS_ADJUSTMENT,
            fees: Coin::new("uosmo", 10_000),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

/// Example configuration for a local node
pub fn example_config() -> KeeperConfig {
    KeeperConfig {
        chain_id: "osmosis-1".to_string(),
        grpc_address: "http://localhost:9090".to_string(),
        rpc_address: "http://localhost:26657".to_string(),
        websocket_path: default_websocket_path(),
        signer_address: "osmo1keeper".to_string(),
        key_file: "keeper.key".to_string(),
        event_query: None,
        exit_on_query_error: true,
        power: PowerConfig {
            contract_address: "osmo1powercontroller".to_string(),
            pool_id: 1,
        },
        strategy: StrategyConfig {
            spread: Decimal::new(5, 2),
            tick_spacing: DEFAULT_TICK_SPACING,
            token0: Coin::new("uosmo", 1_000_000),
            token1: Coin::new("upower", 1_000_000),
            invert_prices: true,
            tick_failure_policy: TickFailurePolicy::WithdrawOnly,
            max_concurrent_accounts: 1,
        },
        gas: GasConfig::default(),
        retry: RetryConfig::default(),
    }
}

/// Create example configuration file
pub fn create_example_config(path: impl AsRef<Path>) -> FloodResult<()> {
    example_config().save(path)
}
