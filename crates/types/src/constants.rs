/// Chain and strategy constants used across the Flood crates

use rust_decimal::Decimal;

// ============================================================================
// Type URLs
// ============================================================================

/// Generic authorization, the only grant kind the keeper can inspect
pub const GENERIC_AUTHORIZATION_TYPE_URL: &str = "/cosmos.authz.v1beta1.GenericAuthorization";

/// Delegated execution wrapper for a batch of granter messages
pub const MSG_EXEC_TYPE_URL: &str = "/cosmos.authz.v1beta1.MsgExec";

/// Open a concentrated-liquidity position
pub const MSG_CREATE_POSITION_TYPE_URL: &str = "/osmosis.concentratedliquidity.v1beta1.MsgCreatePosition";

/// Withdraw liquidity from a concentrated-liquidity position
pub const MSG_WITHDRAW_POSITION_TYPE_URL: &str = "/osmosis.concentratedliquidity.v1beta1.MsgWithdrawPosition";

/// Concentrated-liquidity pool as returned by the pool manager
pub const CL_POOL_TYPE_URL: &str = "/osmosis.concentratedliquidity.v1beta1.Pool";

/// Base account as returned by the auth module
pub const BASE_ACCOUNT_TYPE_URL: &str = "/cosmos.auth.v1beta1.BaseAccount";

/// Compressed secp256k1 public key
pub const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

/// Permissions a granter must have delegated before the keeper acts for it
pub const REQUIRED_PERMISSIONS: [&str; 2] = [MSG_CREATE_POSITION_TYPE_URL, MSG_WITHDRAW_POSITION_TYPE_URL];

// ============================================================================
// Tick and Price Constants
// ============================================================================

/// Exponent of the additive tick increment at price one (10^-6)
pub const EXPONENT_AT_PRICE_ONE: i64 = -6;

/// Number of ticks spanning one power of ten in price
pub const TICKS_PER_DECADE: i64 = 9_000_000;

/// Lowest tick a position boundary may sit on
pub const MIN_INITIALIZED_TICK: i64 = -108_000_000;

/// Highest tick a position boundary may sit on
pub const MAX_TICK: i64 = 342_000_000;

/// Default pool tick spacing
pub const DEFAULT_TICK_SPACING: i64 = 100;

/// Smallest supported spot price (1e-12)
pub const MIN_SPOT_PRICE: Decimal = Decimal::from_parts(1, 0, 0, false, 12);

/// Largest supported spot price (1e28, bounded by decimal precision)
pub const MAX_SPOT_PRICE: Decimal = Decimal::from_parts(268_435_456, 1_042_612_833, 542_101_086, false, 0);

/// Spread fraction is in [0, 1)
pub const MAX_SPREAD_EXCLUSIVE: Decimal = Decimal::ONE;

/// Outer boundaries this close to the current tick are widened by this many spacings
pub const NEAR_TICK_WIDENING_SPACINGS: i64 = 3;

// ============================================================================
// Transaction Constants
// ============================================================================

/// SIGN_MODE_DIRECT
pub const SIGN_MODE_DIRECT: i32 = 1;

/// BROADCAST_MODE_SYNC
pub const BROADCAST_MODE_SYNC: i32 = 2;

/// Default gas adjustment applied to simulated gas
pub const DEFAULT_GAS_ADJUSTMENT: f64 = 1.5;

/// Page size for paginated grant queries
pub const GRANT_PAGE_LIMIT: u64 = 100;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_price_bounds() {
        assert_eq!(MIN_SPOT_PRICE, Decimal::from_str("0.000000000001").unwrap());
        assert_eq!(MAX_SPOT_PRICE, Decimal::from_str("10000000000000000000000000000").unwrap());
    }
}
