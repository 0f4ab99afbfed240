/// Mathematical utilities for the Flood keeper
/// 
/// This crate provides checked decimal arithmetic, the geometric
/// price-to-tick mapping, the buy/sell tick range calculator and the
/// power-perp pricing formulas used by the keeper.

pub mod safe;
pub mod tick_math;
pub mod tick_range;
pub mod pricing;

// Re-export commonly used functions
pub use safe::*;
pub use tick_math::*;
pub use tick_range::*;
pub use pricing::*;
