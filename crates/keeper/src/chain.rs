//! Chain collaborators the keeper depends on.
//!
//! The run loop only sees these traits; the gRPC implementations live in
//! `grpc` and `broadcast`, and tests substitute in-memory fakes.

use async_trait::async_trait;
use flood_types::{FloodError, FloodResult, Grant, PoolRef, Position, PowerMarket, RebalanceBatch};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Read access to chain state
#[async_trait]
pub trait ChainQuery: Send + Sync {
    /// Every grant where `grantee` is the grantee, all pages
    async fn grantee_grants(&self, grantee: &str) -> FloodResult<Vec<Grant>>;

    /// Power-perp contract configuration and state
    async fn power_market(&self, contract: &str) -> FloodResult<PowerMarket>;

    /// Price of `base_denom` in `quote_denom` in one pool
    async fn spot_price(&self, pool_id: u64, base_denom: &str, quote_denom: &str) -> FloodResult<Decimal>;

    /// Open positions of `address` in a pool
    async fn user_positions(&self, pool_id: u64, address: &str) -> FloodResult<Vec<Position>>;

    /// Current tick of a concentrated-liquidity pool
    async fn current_tick(&self, pool_id: u64) -> FloodResult<i64>;
}

/// Outcome of an accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub gas_limit: u64,
}

/// Submits a batch as one delegated-execution transaction signed by the grantee
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn submit(&self, grantee: &str, batch: &RebalanceBatch) -> FloodResult<TxReceipt>;
}

/// `(base_price, instrument_price)` for a power market.
///
/// The base asset is priced in its own pool; the instrument is priced in the
/// power pool against that pool's quote denom.
pub async fn fetch_spot_prices(query: &dyn ChainQuery, market: &PowerMarket) -> FloodResult<(Decimal, Decimal)> {
    let base_price = query
        .spot_price(market.base_pool.id, &market.base_denom, &market.base_pool.quote_denom)
        .await?;
    let instrument_price = query
        .spot_price(market.power_pool.id, &market.power_denom, &market.power_pool.quote_denom)
        .await?;

    Ok((base_price, instrument_price))
}

// ============================================================================
// Power Contract Responses
// ============================================================================

/// Smart query for the contract configuration
pub const CONFIG_QUERY: &str = r#"{"config":{}}"#;

/// Smart query for the contract state
pub const STATE_QUERY: &str = r#"{"state":{}}"#;

#[derive(Debug, Deserialize)]
struct ContractPool {
    #[serde(deserialize_with = "u64_from_str_or_number")]
    id: u64,
    quote_denom: String,
}

#[derive(Debug, Deserialize)]
struct ConfigResponse {
    base_denom: String,
    power_denom: String,
    base_pool: ContractPool,
    power_pool: ContractPool,
    #[serde(deserialize_with = "u64_from_str_or_number")]
    index_scale: u64,
}

#[derive(Debug, Deserialize)]
struct StateResponse {
    normalisation_factor: Decimal,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum U64Repr {
    Number(u64),
    Text(String),
}

fn u64_from_str_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match U64Repr::deserialize(deserializer)? {
        U64Repr::Number(value) => Ok(value),
        U64Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

/// Combine the contract's config and state query responses
pub fn power_market_from_responses(config: &[u8], state: &[u8]) -> FloodResult<PowerMarket> {
    let config: ConfigResponse =
        serde_json::from_slice(config).map_err(|e| FloodError::decode_error("power config", e))?;
    let state: StateResponse =
        serde_json::from_slice(state).map_err(|e| FloodError::decode_error("power state", e))?;

    if config.index_scale == 0 {
        return Err(FloodError::decode_error("power config", "index_scale is zero"));
    }
    if state.normalisation_factor <= Decimal::ZERO {
        return Err(FloodError::decode_error("power state", "normalisation_factor is not positive"));
    }

    Ok(PowerMarket {
        base_denom: config.base_denom,
        power_denom: config.power_denom,
        base_pool: PoolRef {
            id: config.base_pool.id,
            quote_denom: config.base_pool.quote_denom,
        },
        power_pool: PoolRef {
            id: config.power_pool.id,
            quote_denom: config.power_pool.quote_denom,
        },
        index_scale: config.index_scale,
        normalisation_factor: state.normalisation_factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const CONFIG: &str = r#"{
        "fee_pool_contract": "osmo1fees",
        "base_denom": "uosmo",
        "power_denom": "factory/osmo1power/upower",
        "base_pool": { "id": "678", "quote_denom": "uusdc" },
        "power_pool": { "id": 1066, "quote_denom": "uosmo" },
        "funding_period": 1512000,
        "index_scale": "100"
    }"#;

    const STATE: &str = r#"{
        "normalisation_factor": "0.951234567890123456",
        "last_funding_update": "1700000000",
        "is_open": true
    }"#;

    #[test]
    fn test_power_market_from_responses() {
        let market = power_market_from_responses(CONFIG.as_bytes(), STATE.as_bytes()).unwrap();
        assert_eq!(market.base_denom, "uosmo");
        assert_eq!(market.power_denom, "factory/osmo1power/upower");
        assert_eq!(market.base_pool, PoolRef { id: 678, quote_denom: "uusdc".to_string() });
        assert_eq!(market.power_pool.id, 1066);
        assert_eq!(market.index_scale, 100);
        assert_eq!(market.normalisation_factor, dec!(0.951234567890123456));
    }

    #[test]
    fn test_power_market_rejects_bad_responses() {
        assert!(matches!(
            power_market_from_responses(b"{}", STATE.as_bytes()),
            Err(FloodError::Decode { .. })
        ));

        let zero_scale = CONFIG.replace(r#""index_scale": "100""#, r#""index_scale": 0"#);
        assert!(power_market_from_responses(zero_scale.as_bytes(), STATE.as_bytes()).is_err());

        let zero_nf = r#"{"normalisation_factor": "0"}"#;
        assert!(power_market_from_responses(CONFIG.as_bytes(), zero_nf.as_bytes()).is_err());
    }

    #[test]
    fn test_smart_queries_are_json() {
        let config: serde_json::Value = serde_json::from_str(CONFIG_QUERY).unwrap();
        assert!(config.get("config").is_some());
        let state: serde_json::Value = serde_json::from_str(STATE_QUERY).unwrap();
        assert!(state.get("state").is_some());
    }
}
