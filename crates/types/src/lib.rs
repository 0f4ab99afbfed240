//! Shared types for the Flood keeper
//!
//! Common type definitions, chain wire messages, constants and the error
//! taxonomy used by the math and keeper crates.

pub mod coin;
pub mod constants;
pub mod errors;
pub mod grant;
pub mod market;
pub mod position;
pub mod proto;

// Re-export all public types
pub use coin::*;
pub use constants::*;
pub use errors::*;
pub use grant::*;
pub use market::*;
pub use position::*;
