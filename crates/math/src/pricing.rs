//! Power-perp price formulas
//!
//! All inputs are decimals already read from chain. The index is the square
//! of the base price; the target is the instrument price (in base) at which
//! mark equals index.

use flood_types::{FloodError, FloodResult};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::safe::{safe_div_dec, safe_mul_dec, safe_sub_dec};

/// Parse a decimal string as returned by chain queries.
///
/// Accepts plain (`"1.250000000000000000"`) and scientific (`"1.25e-3"`) notation.
pub fn parse_decimal(name: &str, value: &str) -> FloodResult<Decimal> {
    let value = value.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| FloodError::invalid_parameter(name, value, "decimal number"))
}

/// `base^2`
pub fn index_price(base_price: Decimal) -> FloodResult<Decimal> {
    safe_mul_dec(base_price, base_price)
}

/// `base * normalisation_factor / index_scale`
pub fn target_price(base_price: Decimal, normalisation_factor: Decimal, index_scale: u64) -> FloodResult<Decimal> {
    let scaled = safe_mul_dec(base_price, normalisation_factor)?;
    safe_div_dec(scaled, Decimal::from(index_scale))
}

/// `base * instrument * index_scale / normalisation_factor`
pub fn mark_price(
    base_price: Decimal,
    instrument_price: Decimal,
    normalisation_factor: Decimal,
    index_scale: u64,
) -> FloodResult<Decimal> {
    let notional = safe_mul_dec(base_price, instrument_price)?;
    let scaled = safe_mul_dec(notional, Decimal::from(index_scale))?;
    safe_div_dec(scaled, normalisation_factor)
}

/// `mark / index - 1`
pub fn premium(mark_price: Decimal, index_price: Decimal) -> FloodResult<Decimal> {
    safe_sub_dec(safe_div_dec(mark_price, index_price)?, Decimal::ONE)
}

/// Spot and target as the pool quotes them.
///
/// The pool quotes the base asset in the instrument, so both prices are
/// inverted unless `invert` is false.
pub fn pool_prices(instrument_price: Decimal, target_price: Decimal, invert: bool) -> FloodResult<(Decimal, Decimal)> {
    if !invert {
        return Ok((instrument_price, target_price));
    }

    Ok((
        safe_div_dec(Decimal::ONE, instrument_price)?,
        safe_div_dec(Decimal::ONE, target_price)?,
    ))
}
