//! # Tick Range Calculator
//!
//! Turns a spot price, a target price and a spread into four spacing-aligned
//! boundaries for two resting positions: a buy range below the pool's current
//! tick and a sell range above it.
//!
//! The two prices are ordered first, so the calculator is symmetric in them.
//! Each pair of boundaries is then pushed off the current tick so neither
//! position is in range at creation, and an outer boundary left within one
//! spacing of the current tick is widened to avoid a degenerate range.

use flood_types::{FloodError, FloodResult, PriceSet, TickRange, NEAR_TICK_WIDENING_SPACINGS};
use rust_decimal::Decimal;
use tracing::debug;

use crate::safe::{safe_add_dec, safe_add_i64, safe_mul_dec, safe_mul_i64, safe_sub_dec, safe_sub_i64};
use crate::tick_math::{price_to_spaced_tick, round_down_tick_to_spacing};

/// Which of the two positions a pair of boundaries belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Below the current tick, outer boundary is the lower one
    Buy,
    /// Above the current tick, outer boundary is the upper one
    Sell,
}

/// Raw spacing-aligned ticks before current-tick adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTicks {
    /// Outer buy boundary, from `buy_price * (1 - spread)`
    pub low_tick: i64,
    /// Inner buy boundary, from `buy_price`
    pub buy_tick: i64,
    /// Inner sell boundary, from `sell_price`
    pub sell_tick: i64,
    /// Outer sell boundary, from `sell_price * (1 + spread)`
    pub high_tick: i64,
}

/// Compute the tick range for a spot and target price.
///
/// Fails with `InvalidTickOrder` when the adjusted boundaries are not strictly
/// increasing; nothing is returned for the run in that case.
pub fn compute_tick_range(
    spot_price: Decimal,
    target_price: Decimal,
    spread: Decimal,
    current_tick: i64,
    tick_spacing: i64,
) -> FloodResult<TickRange> {
    let prices = PriceSet::new(spot_price, target_price, spread)?;
    tick_range_for_prices(&prices, current_tick, tick_spacing)
}

/// Compute the tick range for an already validated price set
pub fn tick_range_for_prices(prices: &PriceSet, current_tick: i64, tick_spacing: i64) -> FloodResult<TickRange> {
    if tick_spacing <= 0 {
        return Err(FloodError::InvalidTickSpacing { spacing: tick_spacing });
    }

    let (buy_price, sell_price) = prices.ordered();
    let raw = raw_ticks(buy_price, sell_price, prices.spread, tick_spacing)?;

    debug!(
        buy_price = %buy_price,
        sell_price = %sell_price,
        low_tick = raw.low_tick,
        buy_tick = raw.buy_tick,
        sell_tick = raw.sell_tick,
        high_tick = raw.high_tick,
        current_tick,
        "Raw ticks"
    );

    let (low_tick, buy_tick) = adjust_for_current_tick(Side::Buy, current_tick, raw.low_tick, raw.buy_tick, tick_spacing)?;
    let (sell_tick, high_tick) =
        adjust_for_current_tick(Side::Sell, current_tick, raw.sell_tick, raw.high_tick, tick_spacing)?;

    TickRange::new(low_tick, buy_tick, sell_tick, high_tick)
}

/// Convert the four price points to spacing-aligned ticks
pub fn raw_ticks(buy_price: Decimal, sell_price: Decimal, spread: Decimal, tick_spacing: i64) -> FloodResult<RawTicks> {
    let buy_lower_bound = safe_mul_dec(buy_price, safe_sub_dec(Decimal::ONE, spread)?)?;
    let sell_upper_bound = safe_mul_dec(sell_price, safe_add_dec(Decimal::ONE, spread)?)?;

    Ok(RawTicks {
        low_tick: price_to_spaced_tick(buy_lower_bound, tick_spacing)?,
        buy_tick: price_to_spaced_tick(buy_price, tick_spacing)?,
        sell_tick: price_to_spaced_tick(sell_price, tick_spacing)?,
        high_tick: price_to_spaced_tick(sell_upper_bound, tick_spacing)?,
    })
}

/// Move one pair of boundaries off the current tick.
///
/// A pair bracketing `current_tick` has its inner boundary moved one spacing
/// past it (buy: down, sell: up). Both boundaries are re-rounded, and an outer
/// boundary within one spacing of `current_tick` is moved a further
/// `NEAR_TICK_WIDENING_SPACINGS` spacings away from it. An outer boundary on
/// the current tick moves outward for its side. A pair collapsed by the move
/// is left for the strict ordering check to reject.
pub fn adjust_for_current_tick(
    side: Side,
    current_tick: i64,
    lower_tick: i64,
    upper_tick: i64,
    tick_spacing: i64,
) -> FloodResult<(i64, i64)> {
    let mut lower_tick = lower_tick;
    let mut upper_tick = upper_tick;

    if lower_tick <= current_tick && current_tick <= upper_tick {
        match side {
            Side::Buy => upper_tick = safe_sub_i64(current_tick, tick_spacing)?,
            Side::Sell => lower_tick = safe_add_i64(current_tick, tick_spacing)?,
        }
        debug!(?side, lower_tick, upper_tick, current_tick, "Range straddled current tick");
    }

    let mut lower_tick = round_down_tick_to_spacing(lower_tick, tick_spacing)?;
    let mut upper_tick = round_down_tick_to_spacing(upper_tick, tick_spacing)?;

    let outer_tick = match side {
        Side::Buy => lower_tick,
        Side::Sell => upper_tick,
    };
    let distance = safe_sub_i64(outer_tick, current_tick)?;

    if distance.abs() < tick_spacing {
        // away from the current tick; outward for the side when on it
        let widening = safe_mul_i64(NEAR_TICK_WIDENING_SPACINGS, tick_spacing)?;
        let widened = match (distance.signum(), side) {
            (1, _) | (0, Side::Sell) => safe_add_i64(outer_tick, widening)?,
            _ => safe_sub_i64(outer_tick, widening)?,
        };
        let widened = round_down_tick_to_spacing(widened, tick_spacing)?;

        match side {
            Side::Buy => lower_tick = widened,
            Side::Sell => upper_tick = widened,
        }
        debug!(?side, outer_tick = widened, current_tick, "Widened outer tick");
    }

    Ok((lower_tick, upper_tick))
}
