/// Market inputs and outputs for one rebalancing run

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::MAX_SPREAD_EXCLUSIVE;
use crate::errors::{FloodError, FloodResult};

// ============================================================================
// Prices
// ============================================================================

/// Pool-facing prices for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSet {
    /// Current spot price of the pool
    pub spot_price: Decimal,
    /// Fair value the keeper quotes around
    pub target_price: Decimal,
    /// Fraction in [0, 1) added outside the inner boundaries
    pub spread: Decimal,
}

impl PriceSet {
    /// Build a price set, rejecting non-positive prices and spreads outside [0, 1)
    pub fn new(spot_price: Decimal, target_price: Decimal, spread: Decimal) -> FloodResult<Self> {
        if spot_price <= Decimal::ZERO {
            return Err(FloodError::invalid_price(spot_price, "spot price must be positive"));
        }
        if target_price <= Decimal::ZERO {
            return Err(FloodError::invalid_price(target_price, "target price must be positive"));
        }
        if spread < Decimal::ZERO || spread >= MAX_SPREAD_EXCLUSIVE {
            return Err(FloodError::invalid_parameter("spread", &spread.to_string(), "in [0, 1)"));
        }

        Ok(Self {
            spot_price,
            target_price,
            spread,
        })
    }

    /// `(buy_price, sell_price)`: the smaller and larger of the two prices
    pub fn ordered(&self) -> (Decimal, Decimal) {
        if self.spot_price < self.target_price {
            (self.spot_price, self.target_price)
        } else {
            (self.target_price, self.spot_price)
        }
    }
}

// ============================================================================
// Tick Range
// ============================================================================

/// Four spacing-aligned position boundaries, strictly increasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickRange {
    pub outer_low: i64,
    pub inner_low: i64,
    pub inner_high: i64,
    pub outer_high: i64,
}

impl TickRange {
    /// Build a range, failing with `InvalidTickOrder` unless
    /// `outer_low < inner_low < inner_high < outer_high`
    pub fn new(outer_low: i64, inner_low: i64, inner_high: i64, outer_high: i64) -> FloodResult<Self> {
        if !(outer_low < inner_low && inner_low < inner_high && inner_high < outer_high) {
            return Err(FloodError::InvalidTickOrder {
                outer_low,
                inner_low,
                inner_high,
                outer_high,
            });
        }

        Ok(Self {
            outer_low,
            inner_low,
            inner_high,
            outer_high,
        })
    }

    /// Range below the current tick, `(outer_low, inner_low)`
    pub fn lower_range(&self) -> (i64, i64) {
        (self.outer_low, self.inner_low)
    }

    /// Range above the current tick, `(inner_high, outer_high)`
    pub fn upper_range(&self) -> (i64, i64) {
        (self.inner_high, self.outer_high)
    }
}

impl fmt::Display for TickRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] [{}, {}]",
            self.outer_low, self.inner_low, self.inner_high, self.outer_high
        )
    }
}

// ============================================================================
// Power Market
// ============================================================================

/// A pool the power contract prices an asset against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRef {
    pub id: u64,
    pub quote_denom: String,
}

/// Power-perp contract configuration and state needed to price one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerMarket {
    /// Underlying asset denom
    pub base_denom: String,
    /// Synthetic power instrument denom
    pub power_denom: String,
    /// Pool quoting the base asset
    pub base_pool: PoolRef,
    /// Concentrated-liquidity pool quoting the power instrument; positions live here
    pub power_pool: PoolRef,
    pub index_scale: u64,
    pub normalisation_factor: Decimal,
}
