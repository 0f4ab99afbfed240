/// Concentrated-liquidity positions and the instructions the keeper proposes for them

use prost::Message;

use crate::constants::{MSG_CREATE_POSITION_TYPE_URL, MSG_WITHDRAW_POSITION_TYPE_URL};
use crate::proto::cl::{FullPositionBreakdown, MsgCreatePosition, MsgWithdrawPosition};
use crate::proto::Any;

// ============================================================================
// Position
// ============================================================================

/// An open position, owned by the chain. The keeper only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub id: u64,
    pub owner: String,
    pub pool_id: u64,
    /// Liquidity exactly as the chain reported it, passed back on withdrawal
    pub liquidity: String,
    pub lower_tick: i64,
    pub upper_tick: i64,
}

impl Position {
    /// Convert a query breakdown, `None` when the breakdown carries no position
    pub fn from_breakdown(breakdown: FullPositionBreakdown) -> Option<Self> {
        breakdown.position.map(|p| Self {
            id: p.position_id,
            owner: p.address,
            pool_id: p.pool_id,
            liquidity: p.liquidity,
            lower_tick: p.lower_tick,
            upper_tick: p.upper_tick,
        })
    }
}

// ============================================================================
// Instructions
// ============================================================================

/// One chain message executed on a granter's behalf
#[derive(Debug, Clone, PartialEq)]
pub enum PositionInstruction {
    Withdraw(MsgWithdrawPosition),
    Create(MsgCreatePosition),
}

impl PositionInstruction {
    pub fn type_url(&self) -> &'static str {
        match self {
            Self::Withdraw(_) => MSG_WITHDRAW_POSITION_TYPE_URL,
            Self::Create(_) => MSG_CREATE_POSITION_TYPE_URL,
        }
    }

    /// Account the message acts for
    pub fn sender(&self) -> &str {
        match self {
            Self::Withdraw(msg) => &msg.sender,
            Self::Create(msg) => &msg.sender,
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create(_))
    }

    /// Pack into an `Any` for delegated execution
    pub fn to_any(&self) -> Any {
        let value = match self {
            Self::Withdraw(msg) => msg.encode_to_vec(),
            Self::Create(msg) => msg.encode_to_vec(),
        };

        Any {
            type_url: self.type_url().to_string(),
            value,
        }
    }
}

// ============================================================================
// Account Plans and Batches
// ============================================================================

/// Instructions built for one granter in one run
#[derive(Debug, Clone, PartialEq)]
pub struct AccountPlan {
    pub account: String,
    pub instructions: Vec<PositionInstruction>,
}

impl AccountPlan {
    pub fn withdrawals(&self) -> usize {
        self.instructions.iter().filter(|i| !i.is_create()).count()
    }

    pub fn creations(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_create()).count()
    }
}

/// Every instruction for one triggering event, submitted atomically.
///
/// Built by folding account plans with [`RebalanceBatch::merge`]; only the
/// total content matters, not the order plans arrive in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RebalanceBatch {
    accounts: Vec<String>,
    instructions: Vec<PositionInstruction>,
}

impl RebalanceBatch {
    pub fn merge(mut self, plan: AccountPlan) -> Self {
        if !plan.instructions.is_empty() {
            self.accounts.push(plan.account);
            self.instructions.extend(plan.instructions);
        }
        self
    }

    pub fn from_plans(plans: impl IntoIterator<Item = AccountPlan>) -> Self {
        plans.into_iter().fold(Self::default(), Self::merge)
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Accounts contributing at least one instruction
    pub fn accounts(&self) -> &[String] {
        &self.accounts
    }

    pub fn instructions(&self) -> &[PositionInstruction] {
        &self.instructions
    }

    pub fn to_any_msgs(&self) -> Vec<Any> {
        self.instructions.iter().map(PositionInstruction::to_any).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::cl::Position as ProtoPosition;

    fn withdraw(sender: &str, id: u64) -> PositionInstruction {
        PositionInstruction::Withdraw(MsgWithdrawPosition {
            position_id: id,
            sender: sender.to_string(),
            liquidity_amount: "1000".to_string(),
        })
    }

    #[test]
    fn test_from_breakdown() {
        let breakdown = FullPositionBreakdown {
            position: Some(ProtoPosition {
                position_id: 7,
                address: "osmo1granter".to_string(),
                pool_id: 1,
                lower_tick: -100,
                upper_tick: 0,
                join_time: None,
                liquidity: "12345.000000000000000000".to_string(),
            }),
            asset0: None,
            asset1: None,
        };

        let position = Position::from_breakdown(breakdown).unwrap();
        assert_eq!(position.id, 7);
        assert_eq!(position.liquidity, "12345.000000000000000000");

        let empty = FullPositionBreakdown {
            position: None,
            asset0: None,
            asset1: None,
        };
        assert!(Position::from_breakdown(empty).is_none());
    }

    #[test]
    fn test_to_any_round_trips_type_url() {
        let any = withdraw("osmo1granter", 3).to_any();
        assert_eq!(any.type_url, MSG_WITHDRAW_POSITION_TYPE_URL);
        let decoded = MsgWithdrawPosition::decode(any.value.as_slice()).unwrap();
        assert_eq!(decoded.position_id, 3);
    }

    #[test]
    fn test_batch_fold_is_order_independent_in_content() {
        let a = AccountPlan {
            account: "osmo1a".to_string(),
            instructions: vec![withdraw("osmo1a", 1)],
        };
        let b = AccountPlan {
            account: "osmo1b".to_string(),
            instructions: vec![withdraw("osmo1b", 2), withdraw("osmo1b", 3)],
        };
        let empty = AccountPlan {
            account: "osmo1c".to_string(),
            instructions: vec![],
        };

        let forward = RebalanceBatch::from_plans(vec![a.clone(), b.clone(), empty.clone()]);
        let backward = RebalanceBatch::from_plans(vec![empty, b, a]);

        assert_eq!(forward.len(), 3);
        assert_eq!(backward.len(), 3);
        assert_eq!(forward.accounts().len(), 2);

        let mut f: Vec<_> = forward.instructions().iter().map(|i| format!("{:?}", i)).collect();
        let mut r: Vec<_> = backward.instructions().iter().map(|i| format!("{:?}", i)).collect();
        f.sort();
        r.sort();
        assert_eq!(f, r);
    }
}
