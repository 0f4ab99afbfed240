//! Position Rebalancer
//!
//! Turns one account's open positions and the run's tick range into the
//! instructions executed on its behalf: withdraw everything, then open one
//! single-sided range on each side of the current tick.

use flood_types::proto::cl::{MsgCreatePosition, MsgWithdrawPosition};
use flood_types::{AccountPlan, Coin, Position, PositionInstruction, TickRange};
use tracing::debug;

/// Minimum amount guard on both sides of a new position
const NO_MINIMUM: &str = "0";

/// Instructions for one account.
///
/// One full-liquidity withdrawal per open position, followed by two
/// creations when `tick_range` is present: `(outer_low, inner_low)` funded
/// with `token1` and `(inner_high, outer_high)` funded with `token0`. Without
/// a tick range only the withdrawals are returned.
pub fn build_rebalance_instructions(
    account: &str,
    pool_id: u64,
    positions: &[Position],
    tick_range: Option<&TickRange>,
    token0: &Coin,
    token1: &Coin,
) -> Vec<PositionInstruction> {
    let mut instructions: Vec<PositionInstruction> = positions
        .iter()
        .map(|position| {
            debug!(
                account,
                position_id = position.id,
                lower_tick = position.lower_tick,
                upper_tick = position.upper_tick,
                liquidity = %position.liquidity,
                "Withdrawing position"
            );
            PositionInstruction::Withdraw(MsgWithdrawPosition {
                position_id: position.id,
                sender: account.to_string(),
                liquidity_amount: position.liquidity.clone(),
            })
        })
        .collect();

    if let Some(range) = tick_range {
        let (lower, upper) = range.lower_range();
        instructions.push(create_position(account, pool_id, lower, upper, token1));

        let (lower, upper) = range.upper_range();
        instructions.push(create_position(account, pool_id, lower, upper, token0));

        debug!(account, range = %range, "Creating positions");
    }

    instructions
}

/// Plan for one account, wrapping [`build_rebalance_instructions`]
pub fn plan_account(
    account: &str,
    pool_id: u64,
    positions: &[Position],
    tick_range: Option<&TickRange>,
    token0: &Coin,
    token1: &Coin,
) -> AccountPlan {
    AccountPlan {
        account: account.to_string(),
        instructions: build_rebalance_instructions(account, pool_id, positions, tick_range, token0, token1),
    }
}

fn create_position(account: &str, pool_id: u64, lower_tick: i64, upper_tick: i64, deposit: &Coin) -> PositionInstruction {
    PositionInstruction::Create(MsgCreatePosition {
        pool_id,
        sender: account.to_string(),
        lower_tick,
        upper_tick,
        tokens_provided: vec![deposit.to_proto()],
        token_min_amount0: NO_MINIMUM.to_string(),
        token_min_amount1: NO_MINIMUM.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT: &str = "osmo1alice";
    const POOL: u64 = 1066;

    fn position(id: u64, liquidity: &str) -> Position {
        Position {
            id,
            owner: ACCOUNT.to_string(),
            pool_id: POOL,
            liquidity: liquidity.to_string(),
            lower_tick: -1_000,
            upper_tick: 1_000,
        }
    }

    fn tokens() -> (Coin, Coin) {
        (Coin::new("uosmo", 1_000_000), Coin::new("upower", 2_000_000))
    }

    fn range() -> TickRange {
        TickRange::new(-500_000, 0, 200_000, 260_000).unwrap()
    }

    #[test]
    fn test_withdraws_then_creates() {
        let (token0, token1) = tokens();
        let positions = vec![
            position(7, "1517882343.751510418088349649"),
            position(9, "42"),
        ];

        let instructions = build_rebalance_instructions(ACCOUNT, POOL, &positions, Some(&range()), &token0, &token1);
        assert_eq!(instructions.len(), 4);

        assert_eq!(
            instructions[0],
            PositionInstruction::Withdraw(MsgWithdrawPosition {
                position_id: 7,
                sender: ACCOUNT.to_string(),
                liquidity_amount: "1517882343.751510418088349649".to_string(),
            })
        );
        assert!(matches!(&instructions[1], PositionInstruction::Withdraw(msg) if msg.position_id == 9));

        let PositionInstruction::Create(lower) = &instructions[2] else {
            panic!("expected creation, got {:?}", instructions[2]);
        };
        assert_eq!((lower.lower_tick, lower.upper_tick), (-500_000, 0));
        assert_eq!(lower.tokens_provided, vec![token1.to_proto()]);
        assert_eq!(lower.pool_id, POOL);
        assert_eq!(lower.token_min_amount0, "0");
        assert_eq!(lower.token_min_amount1, "0");

        let PositionInstruction::Create(upper) = &instructions[3] else {
            panic!("expected creation, got {:?}", instructions[3]);
        };
        assert_eq!((upper.lower_tick, upper.upper_tick), (200_000, 260_000));
        assert_eq!(upper.tokens_provided, vec![token0.to_proto()]);
    }

    #[test]
    fn test_no_positions_creates_two() {
        let (token0, token1) = tokens();
        let instructions = build_rebalance_instructions(ACCOUNT, POOL, &[], Some(&range()), &token0, &token1);
        assert_eq!(instructions.len(), 2);
        assert!(instructions.iter().all(PositionInstruction::is_create));
        assert!(instructions.iter().all(|i| i.sender() == ACCOUNT));
    }

    #[test]
    fn test_missing_tick_range_only_withdraws() {
        let (token0, token1) = tokens();
        let positions = vec![position(3, "100")];
        let plan = plan_account(ACCOUNT, POOL, &positions, None, &token0, &token1);

        assert_eq!(plan.account, ACCOUNT);
        assert_eq!(plan.withdrawals(), 1);
        assert_eq!(plan.creations(), 0);
    }

    #[test]
    fn test_missing_tick_range_without_positions_is_empty() {
        let (token0, token1) = tokens();
        let plan = plan_account(ACCOUNT, POOL, &[], None, &token0, &token1);
        assert!(plan.instructions.is_empty());
    }
}
