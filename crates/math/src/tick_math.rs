//! # Tick Math
//!
//! Conversions between decimal prices and ticks for the pool's geometric
//! tick scheme. Each power of ten in price spans `TICKS_PER_DECADE` ticks and
//! ticks are evenly spaced inside a decade, with an increment of
//! `10^(k + EXPONENT_AT_PRICE_ONE)` in the decade `[10^k, 10^(k+1))`.
//! Price 1 is tick 0.

use flood_types::{
    FloodError, FloodResult, EXPONENT_AT_PRICE_ONE, MAX_SPOT_PRICE, MAX_TICK, MIN_INITIALIZED_TICK,
    MIN_SPOT_PRICE, TICKS_PER_DECADE,
};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use crate::safe::{pow10, safe_add_dec, safe_add_i64, safe_div_dec, safe_mul_dec, safe_mul_i64, safe_sub_dec};

const TEN: Decimal = Decimal::TEN;

/// Map a price to the tick whose price is the greatest not exceeding it
pub fn price_to_tick(price: Decimal) -> FloodResult<i64> {
    if price < MIN_SPOT_PRICE || price > MAX_SPOT_PRICE {
        return Err(FloodError::invalid_price(price, "outside supported range [1e-12, 1e28]"));
    }
    if price == Decimal::ONE {
        return Ok(0);
    }

    let exponent = decade_exponent(price);
    let decade_start = pow10(exponent)?;
    let increment = pow10(exponent + EXPONENT_AT_PRICE_ONE)?;

    let ticks_into_decade = safe_div_dec(safe_sub_dec(price, decade_start)?, increment)?
        .floor()
        .to_i64()
        .ok_or_else(|| FloodError::math_overflow("ticks into decade", &[&price.to_string()]))?;

    safe_add_i64(safe_mul_i64(exponent, TICKS_PER_DECADE)?, ticks_into_decade)
}

/// Price at the start of `tick`
pub fn tick_to_price(tick: i64) -> FloodResult<Decimal> {
    validate_tick(tick)?;
    if tick == 0 {
        return Ok(Decimal::ONE);
    }

    let exponent = tick.div_euclid(TICKS_PER_DECADE);
    let offset = tick.rem_euclid(TICKS_PER_DECADE);

    let decade_start = pow10(exponent)?;
    let increment = pow10(exponent + EXPONENT_AT_PRICE_ONE)?;

    safe_add_dec(decade_start, safe_mul_dec(Decimal::from(offset), increment)?)
}

/// Round a tick down (toward negative infinity) to a multiple of `tick_spacing`
pub fn round_down_tick_to_spacing(tick: i64, tick_spacing: i64) -> FloodResult<i64> {
    if tick_spacing <= 0 {
        return Err(FloodError::InvalidTickSpacing { spacing: tick_spacing });
    }

    let rounded = safe_mul_i64(tick.div_euclid(tick_spacing), tick_spacing)?;
    validate_tick(rounded)?;
    Ok(rounded)
}

/// Convert a price to a tick and round it down to the spacing
pub fn price_to_spaced_tick(price: Decimal, tick_spacing: i64) -> FloodResult<i64> {
    round_down_tick_to_spacing(price_to_tick(price)?, tick_spacing)
}

/// Check a tick sits in the initializable range
pub fn validate_tick(tick: i64) -> FloodResult<()> {
    if !(MIN_INITIALIZED_TICK..=MAX_TICK).contains(&tick) {
        return Err(FloodError::InvalidTick {
            tick,
            min_tick: MIN_INITIALIZED_TICK,
            max_tick: MAX_TICK,
        });
    }
    Ok(())
}

/// `k` such that `10^k <= price < 10^(k+1)`, for a price already range-checked
fn decade_exponent(price: Decimal) -> i64 {
    let mut exponent = 0;
    let mut start = Decimal::ONE;

    if price >= Decimal::ONE {
        while let Some(next) = start.checked_mul(TEN) {
            if next > price {
                break;
            }
            start = next;
            exponent += 1;
        }
    } else {
        while start > price {
            start /= TEN;
            exponent -= 1;
        }
    }

    exponent
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_known_ticks() {
        assert_eq!(price_to_tick(dec!(1)).unwrap(), 0);
        assert_eq!(price_to_tick(dec!(1.2)).unwrap(), 200_000);
        assert_eq!(price_to_tick(dec!(1.26)).unwrap(), 260_000);
        assert_eq!(price_to_tick(dec!(0.95)).unwrap(), -500_000);
        assert_eq!(price_to_tick(dec!(0.5)).unwrap(), -5_000_000);
        assert_eq!(price_to_tick(dec!(10)).unwrap(), 9_000_000);
        assert_eq!(price_to_tick(dec!(90)).unwrap(), 17_000_000);
        assert_eq!(price_to_tick(dec!(100)).unwrap(), 18_000_000);
        assert_eq!(price_to_tick(dec!(0.1)).unwrap(), -9_000_000);
    }

    #[test]
    fn test_price_between_ticks_rounds_down() {
        // increment near 1 is 1e-6
        assert_eq!(price_to_tick(dec!(1.0000015)).unwrap(), 1);
        // increment just below 1 is 1e-7
        assert_eq!(price_to_tick(dec!(0.99999995)).unwrap(), -1);
    }

    #[test]
    fn test_supported_price_bounds() {
        assert_eq!(price_to_tick(MIN_SPOT_PRICE).unwrap(), -108_000_000);
        assert!(price_to_tick(MAX_SPOT_PRICE).is_ok());
        assert!(matches!(
            price_to_tick(dec!(0.0000000000001)),
            Err(FloodError::InvalidPrice { .. })
        ));
        assert!(price_to_tick(Decimal::ZERO).is_err());
        assert!(price_to_tick(dec!(-1)).is_err());
    }

    #[test]
    fn test_tick_to_price_inverts_on_grid() {
        for tick in [-108_000_000, -9_000_000, -500_000, -1, 0, 1, 200_000, 17_000_000, 180_000_000] {
            let price = tick_to_price(tick).unwrap();
            assert_eq!(price_to_tick(price).unwrap(), tick, "tick {} price {}", tick, price);
        }
    }

    #[test]
    fn test_round_down_to_spacing() {
        assert_eq!(round_down_tick_to_spacing(182, 100).unwrap(), 100);
        assert_eq!(round_down_tick_to_spacing(200, 100).unwrap(), 200);
        assert_eq!(round_down_tick_to_spacing(-1, 100).unwrap(), -100);
        assert_eq!(round_down_tick_to_spacing(-100, 100).unwrap(), -100);
        assert_eq!(round_down_tick_to_spacing(-150, 100).unwrap(), -200);
        assert_eq!(round_down_tick_to_spacing(0, 1).unwrap(), 0);
    }

    #[test]
    fn test_round_down_rejects_bad_input() {
        assert_eq!(
            round_down_tick_to_spacing(100, 0),
            Err(FloodError::InvalidTickSpacing { spacing: 0 })
        );
        assert!(round_down_tick_to_spacing(100, -10).is_err());
        assert!(matches!(
            round_down_tick_to_spacing(MIN_INITIALIZED_TICK - 1, 100),
            Err(FloodError::InvalidTick { .. })
        ));
    }
}
