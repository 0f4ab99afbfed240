use std::fmt;
use thiserror::Error;

// ============================================================================
// Main Error Enum
// ============================================================================

/// Error enum shared by every Flood crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FloodError {
    // ========================================================================
    // Math Errors
    // ========================================================================

    /// Arithmetic overflow occurred
    #[error("Math overflow in '{operation}' with values: {values:?}")]
    MathOverflow { operation: String, values: Vec<String> },

    /// Division by zero
    #[error("Division by zero in context: {context}")]
    DivisionByZero { context: String },

    /// Price outside the range the tick primitive supports
    #[error("Invalid price {price}: {reason}")]
    InvalidPrice { price: String, reason: String },

    /// Tick outside the initializable range
    #[error("Invalid tick {tick}: not in valid range [{min_tick}, {max_tick}]")]
    InvalidTick { tick: i64, min_tick: i64, max_tick: i64 },

    /// Tick spacing must be strictly positive
    #[error("Invalid tick spacing {spacing}: must be greater than 0")]
    InvalidTickSpacing { spacing: i64 },

    /// The four range boundaries are not strictly increasing
    #[error("Ticks are in the incorrect order: {outer_low} < {inner_low} < {inner_high} < {outer_high} does not hold")]
    InvalidTickOrder {
        outer_low: i64,
        inner_low: i64,
        inner_high: i64,
        outer_high: i64,
    },

    // ========================================================================
    // Validation Errors
    // ========================================================================

    /// Invalid parameter
    #[error("Invalid parameter '{parameter}': got '{value}', expected '{expected}'")]
    InvalidParameter { parameter: String, value: String, expected: String },

    /// Payload could not be decoded as the message its type URL names
    #[error("Failed to decode '{type_url}': {reason}")]
    Decode { type_url: String, reason: String },

    // ========================================================================
    // Network and Chain Errors
    // ========================================================================

    /// Endpoint unreachable or the channel failed
    #[error("Transport error talking to {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// A chain query returned an error status or an unusable response
    #[error("Query '{query}' failed: {reason}")]
    QueryFailed { query: String, reason: String },

    /// Transaction was rejected or could not be broadcast
    #[error("Broadcast failed (code {code:?}, tx {tx_hash:?}): {message}")]
    BroadcastFailed {
        message: String,
        code: Option<u32>,
        tx_hash: Option<String>,
    },

    /// Swap event subscription failed
    #[error("Subscription error: {reason}")]
    Subscription { reason: String },

    // ========================================================================
    // Setup Errors
    // ========================================================================

    /// Invalid configuration
    #[error("Invalid configuration for '{component}': {reason}")]
    InvalidConfiguration { component: String, reason: String },

    /// Signing identity could not be loaded or used
    #[error("Signer error: {reason}")]
    Signer { reason: String },

    /// Generic error with optional context
    #[error("Error: {message}")]
    Generic { message: String, context: Option<String> },
}

// ============================================================================
// Error Classes
// ============================================================================

/// Coarse error classes the run loop makes policy decisions on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Endpoints, configuration or signing identity unusable. Terminates the agent.
    Setup,
    /// A required read failed. Fatal to the run it happened in.
    Query,
    /// Tick or price computation failed. Affects creation for one run only.
    Computation,
    /// Submission rejected or timed out. Reported, never retried.
    Broadcast,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorClass::Setup => "setup",
            ErrorClass::Query => "query",
            ErrorClass::Computation => "computation",
            ErrorClass::Broadcast => "broadcast",
        };
        f.write_str(name)
    }
}

impl FloodError {
    /// Classify this error for the run loop
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::MathOverflow { .. }
            | Self::DivisionByZero { .. }
            | Self::InvalidPrice { .. }
            | Self::InvalidTick { .. }
            | Self::InvalidTickSpacing { .. }
            | Self::InvalidTickOrder { .. }
            | Self::InvalidParameter { .. } => ErrorClass::Computation,
            Self::Decode { .. } | Self::Transport { .. } | Self::QueryFailed { .. } => {
                ErrorClass::Query
            }
            Self::BroadcastFailed { .. } => ErrorClass::Broadcast,
            Self::Subscription { .. }
            | Self::InvalidConfiguration { .. }
            | Self::Signer { .. }
            | Self::Generic { .. } => ErrorClass::Setup,
        }
    }

    /// Create a math overflow error with context
    pub fn math_overflow(operation: &str, values: &[&str]) -> Self {
        Self::MathOverflow {
            operation: operation.to_string(),
            values: values.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create a division by zero error
    pub fn division_by_zero(context: &str) -> Self {
        Self::DivisionByZero { context: context.to_string() }
    }

    /// Create an invalid price error
    pub fn invalid_price(price: impl fmt::Display, reason: &str) -> Self {
        Self::InvalidPrice {
            price: price.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: &str, value: &str, expected: &str) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Create a decode error for a type URL
    pub fn decode_error(type_url: &str, reason: impl fmt::Display) -> Self {
        Self::Decode {
            type_url: type_url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a transport error
    pub fn transport(endpoint: &str, message: impl fmt::Display) -> Self {
        Self::Transport {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a query error
    pub fn query_error(query: &str, reason: impl fmt::Display) -> Self {
        Self::QueryFailed {
            query: query.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a broadcast error
    pub fn broadcast_error(message: impl fmt::Display, code: Option<u32>, tx_hash: Option<String>) -> Self {
        Self::BroadcastFailed {
            message: message.to_string(),
            code,
            tx_hash,
        }
    }

    /// Create a subscription error
    pub fn subscription(reason: impl fmt::Display) -> Self {
        Self::Subscription { reason: reason.to_string() }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(component: &str, reason: impl fmt::Display) -> Self {
        Self::InvalidConfiguration {
            component: component.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a signer error
    pub fn signer(reason: impl fmt::Display) -> Self {
        Self::Signer { reason: reason.to_string() }
    }

    /// Create a generic error
    pub fn generic(message: &str) -> Self {
        Self::Generic {
            message: message.to_string(),
            context: None,
        }
    }

    /// Create a generic error with context
    pub fn generic_with_context(message: &str, context: &str) -> Self {
        Self::Generic {
            message: message.to_string(),
            context: Some(context.to_string()),
        }
    }
}

/// Result type alias using the shared error type
pub type FloodResult<T> = std::result::Result<T, FloodError>;
