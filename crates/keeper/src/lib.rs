pub mod authz;
pub mod broadcast;
pub mod chain;
pub mod config;
pub mod events;
pub mod grpc;
pub mod keeper;
pub mod rebalance;
pub mod signer;

pub use authz::{compute_eligible_granters, AuthorizationIndex, GrantSkip};
pub use broadcast::GrpcBroadcaster;
pub use chain::{fetch_spot_prices, Broadcaster, ChainQuery, TxReceipt};
pub use config::{KeeperConfig, RetryConfig, TickFailurePolicy};
pub use events::{SwapEvent, SwapSubscription};
pub use grpc::GrpcChainClient;
pub use keeper::{is_fatal, Keeper, RunOutcome, RunReport};
pub use rebalance::build_rebalance_instructions;
pub use signer::LocalSigner;
