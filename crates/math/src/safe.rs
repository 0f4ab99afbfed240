/// Safe arithmetic operations with overflow protection
///
/// All operations return errors instead of panicking. Prices flow through
/// these helpers so an extreme on-chain value surfaces as a computation error
/// for the run rather than a panic in the keeper.

use flood_types::{FloodError, FloodResult};
use rust_decimal::Decimal;

// ============================================================================
// Safe Integer Arithmetic
// ============================================================================

/// Safe addition for i64 ticks
pub fn safe_add_i64(a: i64, b: i64) -> FloodResult<i64> {
    a.checked_add(b)
        .ok_or_else(|| FloodError::math_overflow("i64 addition", &[&a.to_string(), &b.to_string()]))
}

/// Safe subtraction for i64 ticks
pub fn safe_sub_i64(a: i64, b: i64) -> FloodResult<i64> {
    a.checked_sub(b)
        .ok_or_else(|| FloodError::math_overflow("i64 subtraction", &[&a.to_string(), &b.to_string()]))
}

/// Safe multiplication for i64 ticks
pub fn safe_mul_i64(a: i64, b: i64) -> FloodResult<i64> {
    a.checked_mul(b)
        .ok_or_else(|| FloodError::math_overflow("i64 multiplication", &[&a.to_string(), &b.to_string()]))
}

// ============================================================================
// Safe Decimal Arithmetic
// ============================================================================

/// Safe addition for decimals
pub fn safe_add_dec(a: Decimal, b: Decimal) -> FloodResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| FloodError::math_overflow("decimal addition", &[&a.to_string(), &b.to_string()]))
}

/// Safe subtraction for decimals
pub fn safe_sub_dec(a: Decimal, b: Decimal) -> FloodResult<Decimal> {
    a.checked_sub(b)
        .ok_or_else(|| FloodError::math_overflow("decimal subtraction", &[&a.to_string(), &b.to_string()]))
}

/// Safe multiplication for decimals
pub fn safe_mul_dec(a: Decimal, b: Decimal) -> FloodResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| FloodError::math_overflow("decimal multiplication", &[&a.to_string(), &b.to_string()]))
}

/// Safe division for decimals
pub fn safe_div_dec(a: Decimal, b: Decimal) -> FloodResult<Decimal> {
    if b.is_zero() {
        return Err(FloodError::division_by_zero(&format!("decimal division: {} / {}", a, b)));
    }
    a.checked_div(b)
        .ok_or_else(|| FloodError::math_overflow("decimal division", &[&a.to_string(), &b.to_string()]))
}

/// 10^exponent as a decimal, for exponents in [-28, 28]
pub fn pow10(exponent: i64) -> FloodResult<Decimal> {
    if !(-28..=28).contains(&exponent) {
        return Err(FloodError::math_overflow("power of ten", &[&exponent.to_string()]));
    }

    if exponent >= 0 {
        Decimal::try_from_i128_with_scale(10i128.pow(exponent as u32), 0)
            .map_err(|_| FloodError::math_overflow("power of ten", &[&exponent.to_string()]))
    } else {
        Ok(Decimal::new(1, (-exponent) as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_safe_i64() {
        assert_eq!(safe_add_i64(1, 2).unwrap(), 3);
        assert!(safe_add_i64(i64::MAX, 1).is_err());
        assert!(safe_sub_i64(i64::MIN, 1).is_err());
        assert!(safe_mul_i64(i64::MAX, 2).is_err());
    }

    #[test]
    fn test_safe_decimal() {
        assert_eq!(safe_mul_dec(dec!(1.5), dec!(2)).unwrap(), dec!(3));
        assert!(safe_mul_dec(Decimal::MAX, dec!(2)).is_err());
        assert!(matches!(
            safe_div_dec(dec!(1), Decimal::ZERO),
            Err(FloodError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_pow10() {
        assert_eq!(pow10(0).unwrap(), dec!(1));
        assert_eq!(pow10(3).unwrap(), dec!(1000));
        assert_eq!(pow10(-7).unwrap(), dec!(0.0000001));
        assert!(pow10(28).is_ok());
        assert!(pow10(29).is_err());
        assert!(pow10(-29).is_err());
    }
}
