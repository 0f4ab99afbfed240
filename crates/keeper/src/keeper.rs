use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use flood_math::{
    index_price, mark_price, pool_prices, premium, target_price, tick_range_for_prices, tick_to_price,
};
use flood_types::{
    AccountPlan, FloodError, FloodResult, PriceSet, PowerMarket, RebalanceBatch, TickRange, REQUIRED_PERMISSIONS,
};
use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::authz::compute_eligible_granters;
use crate::chain::{fetch_spot_prices, Broadcaster, ChainQuery, TxReceipt};
use crate::config::{KeeperConfig, TickFailurePolicy};
use crate::events::SwapEvent;
use crate::rebalance::plan_account;

/// Chain state shared by every account in one run
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub market: PowerMarket,
    pub base_price: Decimal,
    pub instrument_price: Decimal,
    pub current_tick: i64,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// No granter holds every required permission
    NoEligibleAccounts,
    /// Nothing to withdraw or create
    EmptyBatch,
    /// Batch built and logged, not submitted
    DryRun,
    Submitted(TxReceipt),
}

/// Summary of one run, logged by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub eligible_accounts: usize,
    /// Accounts left out of the batch, with the reason
    pub skipped_accounts: Vec<(String, String)>,
    pub withdrawals: usize,
    pub creations: usize,
    /// `None` when the range could not be computed this run
    pub tick_range: Option<TickRange>,
    pub outcome: RunOutcome,
}

impl RunReport {
    fn empty(outcome: RunOutcome) -> Self {
        Self {
            eligible_accounts: 0,
            skipped_accounts: Vec::new(),
            withdrawals: 0,
            creations: 0,
            tick_range: None,
            outcome,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEligibleAccounts => write!(f, "no eligible accounts"),
            Self::EmptyBatch => write!(f, "empty batch"),
            Self::DryRun => write!(f, "dry run"),
            Self::Submitted(receipt) => write!(f, "submitted {}", receipt.tx_hash),
        }
    }
}

enum AccountOutcome {
    Planned(AccountPlan),
    Skipped { account: String, reason: String },
}

/// Rebalances every authorized account once per swap event
pub struct Keeper {
    /// Chain reads
    chain: Arc<dyn ChainQuery>,

    /// Transaction submission
    broadcaster: Arc<dyn Broadcaster>,

    /// Keeper configuration
    config: KeeperConfig,

    /// Dry run mode flag
    dry_run: bool,
}

impl Keeper {
    /// Create a new keeper instance
    pub fn new(
        chain: Arc<dyn ChainQuery>,
        broadcaster: Arc<dyn Broadcaster>,
        config: KeeperConfig,
        dry_run: bool,
    ) -> Self {
        Self {
            chain,
            broadcaster,
            config,
            dry_run,
        }
    }

    pub fn config(&self) -> &KeeperConfig {
        &self.config
    }

    /// Run one rebalance for a swap event.
    ///
    /// Query failures on grants or market state abort the run before anything
    /// is submitted. A failed position query only drops that account. Tick
    /// computation failure is handled per `tick_failure_policy`.
    pub async fn handle_swap_event(&self, event: &SwapEvent) -> FloodResult<RunReport> {
        debug!(height = ?event.height, "Handling swap event");

        let grantee = self.config.signer_address.as_str();
        let grants = self.chain.grantee_grants(grantee).await?;
        let eligible = compute_eligible_granters(&grants, &REQUIRED_PERMISSIONS, Utc::now());

        if eligible.is_empty() {
            info!(grants = grants.len(), "No granters with all required permissions");
            return Ok(RunReport::empty(RunOutcome::NoEligibleAccounts));
        }

        let snapshot = self.market_snapshot().await?;
        let tick_range = self.compute_tick_range(&snapshot);
        if let Err(e) = &tick_range {
            error!(
                error = %e,
                current_tick = snapshot.current_tick,
                policy = ?self.config.strategy.tick_failure_policy,
                "Tick range computation failed"
            );
        }

        let pool_id = snapshot.market.power_pool.id;
        let range = tick_range.as_ref().ok();
        let outcomes: Vec<AccountOutcome> = stream::iter(eligible.iter())
            .map(|account| self.plan_for_account(account, pool_id, range))
            .buffered(self.config.strategy.max_concurrent_accounts.max(1))
            .collect()
            .await;

        let mut skipped_accounts = Vec::new();
        let mut plans = Vec::new();
        for outcome in outcomes {
            match outcome {
                AccountOutcome::Planned(plan) => plans.push(plan),
                AccountOutcome::Skipped { account, reason } => skipped_accounts.push((account, reason)),
            }
        }

        let withdrawals = plans.iter().map(AccountPlan::withdrawals).sum();
        let creations = plans.iter().map(AccountPlan::creations).sum();
        let batch = RebalanceBatch::from_plans(plans);

        let outcome = self.submit(grantee, &batch).await?;

        let report = RunReport {
            eligible_accounts: eligible.len(),
            skipped_accounts,
            withdrawals,
            creations,
            tick_range: tick_range.ok(),
            outcome,
        };

        info!(
            eligible = report.eligible_accounts,
            skipped = report.skipped_accounts.len(),
            withdrawals = report.withdrawals,
            creations = report.creations,
            outcome = %report.outcome,
            "Run complete"
        );

        Ok(report)
    }

    /// Fetch the market, both spot prices and the current tick
    pub async fn market_snapshot(&self) -> FloodResult<MarketSnapshot> {
        let market = self.chain.power_market(&self.config.power.contract_address).await?;
        let (base_price, instrument_price) = fetch_spot_prices(self.chain.as_ref(), &market).await?;
        let current_tick = self.chain.current_tick(market.power_pool.id).await?;

        Ok(MarketSnapshot {
            market,
            base_price,
            instrument_price,
            current_tick,
        })
    }

    /// Derive the run's tick range from a snapshot
    pub fn compute_tick_range(&self, snapshot: &MarketSnapshot) -> FloodResult<TickRange> {
        let strategy = &self.config.strategy;
        let market = &snapshot.market;

        let index = index_price(snapshot.base_price)?;
        let target = target_price(snapshot.base_price, market.normalisation_factor, market.index_scale)?;
        let mark = mark_price(
            snapshot.base_price,
            snapshot.instrument_price,
            market.normalisation_factor,
            market.index_scale,
        )?;
        let premium = premium(mark, index)?;

        let (spot, target_for_pool) = pool_prices(snapshot.instrument_price, target, strategy.invert_prices)?;

        debug!(
            base_price = %snapshot.base_price,
            instrument_price = %snapshot.instrument_price,
            mark_price = %mark,
            index_price = %index,
            target_price = %target,
            premium = %premium,
            normalisation_factor = %market.normalisation_factor,
            pool_spot_price = %spot,
            pool_target_price = %target_for_pool,
            current_tick = snapshot.current_tick,
            "Market summary"
        );

        let prices = PriceSet::new(spot, target_for_pool, strategy.spread)?;
        let range = tick_range_for_prices(&prices, snapshot.current_tick, strategy.tick_spacing)?;
        info!(range = %range, current_tick = snapshot.current_tick, "Computed tick range");
        debug!(
            outer_low_price = ?tick_to_price(range.outer_low).ok(),
            inner_low_price = ?tick_to_price(range.inner_low).ok(),
            inner_high_price = ?tick_to_price(range.inner_high).ok(),
            outer_high_price = ?tick_to_price(range.outer_high).ok(),
            "Range boundary prices"
        );

        Ok(range)
    }

    async fn plan_for_account(&self, account: &str, pool_id: u64, tick_range: Option<&TickRange>) -> AccountOutcome {
        let strategy = &self.config.strategy;

        if tick_range.is_none() && strategy.tick_failure_policy == TickFailurePolicy::SkipAccount {
            return AccountOutcome::Skipped {
                account: account.to_string(),
                reason: "tick range unavailable".to_string(),
            };
        }

        let positions = match self.chain.user_positions(pool_id, account).await {
            Ok(positions) => positions,
            Err(e) => {
                error!(account, error = %e, "Position query failed, skipping account");
                return AccountOutcome::Skipped {
                    account: account.to_string(),
                    reason: e.to_string(),
                };
            }
        };

        let plan = plan_account(account, pool_id, &positions, tick_range, &strategy.token0, &strategy.token1);
        debug!(
            account,
            withdrawals = plan.withdrawals(),
            creations = plan.creations(),
            "Planned account"
        );

        AccountOutcome::Planned(plan)
    }

    async fn submit(&self, grantee: &str, batch: &RebalanceBatch) -> FloodResult<RunOutcome> {
        if batch.is_empty() {
            info!("Nothing to rebalance, skipping submission");
            return Ok(RunOutcome::EmptyBatch);
        }

        if self.dry_run {
            for instruction in batch.instructions() {
                info!(sender = instruction.sender(), type_url = instruction.type_url(), "DRY RUN: would execute");
            }
            warn!(messages = batch.len(), accounts = batch.accounts().len(), "DRY RUN: batch not submitted");
            return Ok(RunOutcome::DryRun);
        }

        match self.broadcaster.submit(grantee, batch).await {
            Ok(receipt) => Ok(RunOutcome::Submitted(receipt)),
            Err(e) => {
                error!(error = %e, messages = batch.len(), "Failed to submit rebalance batch");
                Err(e)
            }
        }
    }
}

/// Whether the event loop should stop after a failed run
pub fn is_fatal(error: &FloodError, exit_on_query_error: bool) -> bool {
    use flood_types::ErrorClass;

    match error.class() {
        ErrorClass::Setup => true,
        ErrorClass::Query => exit_on_query_error,
        ErrorClass::Computation | ErrorClass::Broadcast => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::example_config;
    use async_trait::async_trait;
    use flood_types::proto::authz::GenericAuthorization;
    use flood_types::{
        ErrorClass, Grant, PoolRef, Position, PositionInstruction, GENERIC_AUTHORIZATION_TYPE_URL,
        MSG_CREATE_POSITION_TYPE_URL, MSG_WITHDRAW_POSITION_TYPE_URL,
    };
    use prost::Message;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const KEEPER: &str = "osmo1keeper";
    const BASE_POOL: u64 = 1;
    const POWER_POOL: u64 = 2;

    fn grant(granter: &str, msg: &str) -> Grant {
        Grant {
            granter: granter.to_string(),
            grantee: KEEPER.to_string(),
            type_url: GENERIC_AUTHORIZATION_TYPE_URL.to_string(),
            payload: GenericAuthorization { msg: msg.to_string() }.encode_to_vec(),
            expiration: None,
        }
    }

    fn full_grants(granter: &str) -> Vec<Grant> {
        vec![
            grant(granter, MSG_CREATE_POSITION_TYPE_URL),
            grant(granter, MSG_WITHDRAW_POSITION_TYPE_URL),
        ]
    }

    fn position(owner: &str, id: u64) -> Position {
        Position {
            id,
            owner: owner.to_string(),
            pool_id: POWER_POOL,
            liquidity: "5000".to_string(),
            lower_tick: -100_000,
            upper_tick: 100_000,
        }
    }

    struct FakeChain {
        grants: FloodResult<Vec<Grant>>,
        positions: HashMap<String, FloodResult<Vec<Position>>>,
        base_price: Decimal,
        instrument_price: Decimal,
        current_tick: i64,
        market_queries: AtomicUsize,
    }

    impl FakeChain {
        /// base 2, instrument 0.8, nf 0.5, scale 1: target 1, pool prices 1.25 and 1
        fn new() -> Self {
            let mut grants = full_grants("osmo1alice");
            grants.extend(full_grants("osmo1bob"));
            grants.push(grant("osmo1carol", MSG_CREATE_POSITION_TYPE_URL));

            let mut positions = HashMap::new();
            positions.insert("osmo1alice".to_string(), Ok(vec![position("osmo1alice", 11)]));

            Self {
                grants: Ok(grants),
                positions,
                base_price: dec!(2),
                instrument_price: dec!(0.8),
                current_tick: 100_000,
                market_queries: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChainQuery for FakeChain {
        async fn grantee_grants(&self, grantee: &str) -> FloodResult<Vec<Grant>> {
            assert_eq!(grantee, KEEPER);
            self.grants.clone()
        }

        async fn power_market(&self, _contract: &str) -> FloodResult<PowerMarket> {
            self.market_queries.fetch_add(1, Ordering::SeqCst);
            Ok(PowerMarket {
                base_denom: "uosmo".to_string(),
                power_denom: "upower".to_string(),
                base_pool: PoolRef { id: BASE_POOL, quote_denom: "uusdc".to_string() },
                power_pool: PoolRef { id: POWER_POOL, quote_denom: "uosmo".to_string() },
                index_scale: 1,
                normalisation_factor: dec!(0.5),
            })
        }

        async fn spot_price(&self, pool_id: u64, base_denom: &str, quote_denom: &str) -> FloodResult<Decimal> {
            match (pool_id, base_denom, quote_denom) {
                (BASE_POOL, "uosmo", "uusdc") => Ok(self.base_price),
                (POWER_POOL, "upower", "uosmo") => Ok(self.instrument_price),
                _ => Err(FloodError::query_error("spot_price", "unknown pool")),
            }
        }

        async fn user_positions(&self, pool_id: u64, address: &str) -> FloodResult<Vec<Position>> {
            assert_eq!(pool_id, POWER_POOL);
            self.positions.get(address).cloned().unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn current_tick(&self, pool_id: u64) -> FloodResult<i64> {
            assert_eq!(pool_id, POWER_POOL);
            Ok(self.current_tick)
        }
    }

    #[derive(Default)]
    struct FakeBroadcaster {
        submitted: Mutex<Vec<(String, RebalanceBatch)>>,
        fail: bool,
    }

    #[async_trait]
    impl Broadcaster for FakeBroadcaster {
        async fn submit(&self, grantee: &str, batch: &RebalanceBatch) -> FloodResult<TxReceipt> {
            if self.fail {
                return Err(FloodError::broadcast_error("out of gas", Some(11), Some("ABC".to_string())));
            }
            self.submitted.lock().unwrap().push((grantee.to_string(), batch.clone()));
            Ok(TxReceipt {
                tx_hash: "HASH".to_string(),
                gas_limit: 300_000,
            })
        }
    }

    fn config() -> KeeperConfig {
        let mut config = example_config();
        config.signer_address = KEEPER.to_string();
        config.strategy.spread = dec!(0.05);
        config
    }

    fn keeper(chain: FakeChain, config: KeeperConfig, dry_run: bool) -> (Keeper, Arc<FakeChain>, Arc<FakeBroadcaster>) {
        keeper_with(chain, FakeBroadcaster::default(), config, dry_run)
    }

    fn keeper_with(
        chain: FakeChain,
        broadcaster: FakeBroadcaster,
        config: KeeperConfig,
        dry_run: bool,
    ) -> (Keeper, Arc<FakeChain>, Arc<FakeBroadcaster>) {
        let chain = Arc::new(chain);
        let broadcaster = Arc::new(broadcaster);
        let keeper = Keeper::new(chain.clone(), broadcaster.clone(), config, dry_run);
        (keeper, chain, broadcaster)
    }

    fn event() -> SwapEvent {
        SwapEvent { height: Some(100) }
    }

    #[tokio::test]
    async fn test_run_submits_one_batch_for_all_eligible_accounts() {
        let (keeper, chain, broadcaster) = keeper(FakeChain::new(), config(), false);

        let report = keeper.handle_swap_event(&event()).await.unwrap();

        // buy 1.00 -> 0, 0.95 -> -500000, sell 1.25 -> 250000, 1.3125 -> 312500
        assert_eq!(report.tick_range, Some(TickRange::new(-500_000, 0, 250_000, 312_500).unwrap()));
        assert_eq!(report.eligible_accounts, 2);
        assert_eq!(report.withdrawals, 1);
        assert_eq!(report.creations, 4);
        assert!(report.skipped_accounts.is_empty());
        assert!(matches!(report.outcome, RunOutcome::Submitted(ref receipt) if receipt.tx_hash == "HASH"));

        // market state is shared by every account
        assert_eq!(chain.market_queries.load(Ordering::SeqCst), 1);

        let submitted = broadcaster.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        let (grantee, batch) = &submitted[0];
        assert_eq!(grantee, KEEPER);
        assert_eq!(batch.len(), 5);
        assert_eq!(batch.accounts(), ["osmo1alice".to_string(), "osmo1bob".to_string()]);
        assert!(batch.instructions().iter().all(|i| i.sender() != "osmo1carol"));
        assert!(matches!(&batch.instructions()[0], PositionInstruction::Withdraw(msg) if msg.position_id == 11));
    }

    #[tokio::test]
    async fn test_concurrent_accounts_build_same_batch() {
        let (sequential, _, sequential_broadcaster) = keeper(FakeChain::new(), config(), false);
        sequential.handle_swap_event(&event()).await.unwrap();

        let mut concurrent_config = config();
        concurrent_config.strategy.max_concurrent_accounts = 4;
        let (concurrent, _, concurrent_broadcaster) = keeper(FakeChain::new(), concurrent_config, false);
        concurrent.handle_swap_event(&event()).await.unwrap();

        let a = sequential_broadcaster.submitted.lock().unwrap();
        let b = concurrent_broadcaster.submitted.lock().unwrap();
        assert_eq!(a[0].1.instructions().len(), b[0].1.instructions().len());
        for instruction in a[0].1.instructions() {
            assert!(b[0].1.instructions().contains(instruction));
        }
    }

    #[tokio::test]
    async fn test_tick_failure_withdraw_only() {
        // zero spread collapses both ranges
        let mut config = config();
        config.strategy.spread = Decimal::ZERO;
        let (keeper, _, broadcaster) = keeper(FakeChain::new(), config, false);

        let report = keeper.handle_swap_event(&event()).await.unwrap();
        assert_eq!(report.tick_range, None);
        assert_eq!(report.withdrawals, 1);
        assert_eq!(report.creations, 0);

        let submitted = broadcaster.submitted.lock().unwrap();
        assert_eq!(submitted[0].1.len(), 1);
        assert_eq!(submitted[0].1.accounts(), ["osmo1alice".to_string()]);
    }

    #[tokio::test]
    async fn test_tick_failure_skip_account() {
        let mut config = config();
        config.strategy.spread = Decimal::ZERO;
        config.strategy.tick_failure_policy = TickFailurePolicy::SkipAccount;
        let (keeper, _, broadcaster) = keeper(FakeChain::new(), config, false);

        let report = keeper.handle_swap_event(&event()).await.unwrap();
        assert_eq!(report.outcome, RunOutcome::EmptyBatch);
        assert_eq!(report.skipped_accounts.len(), 2);
        assert!(broadcaster.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_position_query_failure_isolates_account() {
        let mut chain = FakeChain::new();
        chain
            .positions
            .insert("osmo1bob".to_string(), Err(FloodError::query_error("UserPositions", "unavailable")));
        let (keeper, _, broadcaster) = keeper(chain, config(), false);

        let report = keeper.handle_swap_event(&event()).await.unwrap();
        assert_eq!(report.skipped_accounts.len(), 1);
        assert_eq!(report.skipped_accounts[0].0, "osmo1bob");

        let submitted = broadcaster.submitted.lock().unwrap();
        assert_eq!(submitted[0].1.accounts(), ["osmo1alice".to_string()]);
        assert_eq!(submitted[0].1.len(), 3);
    }

    #[tokio::test]
    async fn test_grant_query_failure_aborts_run() {
        let mut chain = FakeChain::new();
        chain.grants = Err(FloodError::transport("http://localhost:9090", "connection refused"));
        let (keeper, chain, broadcaster) = keeper(chain, config(), false);

        let error = keeper.handle_swap_event(&event()).await.unwrap_err();
        assert_eq!(error.class(), ErrorClass::Query);
        assert_eq!(chain.market_queries.load(Ordering::SeqCst), 0);
        assert!(broadcaster.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_eligible_accounts_skips_market_queries() {
        let mut chain = FakeChain::new();
        chain.grants = Ok(vec![grant("osmo1carol", MSG_CREATE_POSITION_TYPE_URL)]);
        let (keeper, chain, broadcaster) = keeper(chain, config(), false);

        let report = keeper.handle_swap_event(&event()).await.unwrap();
        assert_eq!(report.outcome, RunOutcome::NoEligibleAccounts);
        assert_eq!(chain.market_queries.load(Ordering::SeqCst), 0);
        assert!(broadcaster.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_submits_nothing() {
        let (keeper, _, broadcaster) = keeper(FakeChain::new(), config(), true);

        let report = keeper.handle_swap_event(&event()).await.unwrap();
        assert_eq!(report.outcome, RunOutcome::DryRun);
        assert_eq!(report.creations, 4);
        assert!(broadcaster.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_failure_is_reported() {
        let broadcaster = FakeBroadcaster {
            fail: true,
            ..Default::default()
        };
        let (keeper, _, _) = keeper_with(FakeChain::new(), broadcaster, config(), false);

        let error = keeper.handle_swap_event(&event()).await.unwrap_err();
        assert_eq!(error.class(), ErrorClass::Broadcast);
        assert!(!is_fatal(&error, true));
    }

    #[tokio::test]
    async fn test_current_tick_inside_range_moves_boundaries() {
        // current tick sits on the inner sell boundary
        let mut chain = FakeChain::new();
        chain.current_tick = 250_000;
        let (keeper, _, _) = keeper(chain, config(), true);

        let report = keeper.handle_swap_event(&event()).await.unwrap();
        assert_eq!(report.tick_range, Some(TickRange::new(-500_000, 0, 250_100, 312_500).unwrap()));
    }

    #[test]
    fn test_is_fatal() {
        let query = FloodError::query_error("Pool", "not found");
        assert!(is_fatal(&query, true));
        assert!(!is_fatal(&query, false));
        assert!(is_fatal(&FloodError::subscription("closed"), false));
        assert!(!is_fatal(
            &FloodError::InvalidTickOrder {
                outer_low: 0,
                inner_low: 0,
                inner_high: 1,
                outer_high: 2
            },
            true
        ));
    }
}
