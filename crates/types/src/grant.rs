//! Delegation grants as the keeper sees them.
//!
//! A grant is a read-only snapshot fetched fresh on every run. Its payload is
//! only inspectable when the type URL names a generic authorization.

use chrono::{DateTime, Utc};
use prost::Message;

use crate::constants::GENERIC_AUTHORIZATION_TYPE_URL;
use crate::errors::{FloodError, FloodResult};
use crate::proto::authz::{GenericAuthorization, GrantAuthorization};
use crate::proto::Timestamp;

/// A delegation from `granter` to `grantee`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub granter: String,
    pub grantee: String,
    /// Type URL of the authorization payload, empty when the chain sent none
    pub type_url: String,
    /// Raw authorization payload, empty when the chain sent none
    pub payload: Vec<u8>,
    pub expiration: Option<DateTime<Utc>>,
}

impl Grant {
    /// A grant is active iff it has no expiration or expires strictly after `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiration {
            Some(expiration) => expiration > now,
            None => true,
        }
    }

    /// Decode the payload by its type tag
    pub fn authorization(&self) -> FloodResult<Authorization> {
        Authorization::decode(&self.type_url, &self.payload)
    }
}

impl From<GrantAuthorization> for Grant {
    fn from(grant: GrantAuthorization) -> Self {
        let (type_url, payload) = match grant.authorization {
            Some(any) => (any.type_url, any.value),
            None => (String::new(), Vec::new()),
        };

        Self {
            granter: grant.granter,
            grantee: grant.grantee,
            type_url,
            payload,
            expiration: grant.expiration.as_ref().map(timestamp_to_datetime),
        }
    }
}

/// Timestamps chrono cannot represent are mapped to the earliest instant so
/// the grant reads as expired rather than as never expiring.
fn timestamp_to_datetime(ts: &Timestamp) -> DateTime<Utc> {
    u32::try_from(ts.nanos)
        .ok()
        .and_then(|nanos| DateTime::<Utc>::from_timestamp(ts.seconds, nanos))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

// ============================================================================
// Authorization Variants
// ============================================================================

/// Decoded authorization payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// Permits one message type, named by its type URL
    Generic { msg: String },
    /// Any other authorization kind. Not understood, never an error.
    Unrecognized { type_url: String },
}

impl Authorization {
    /// Interpret `payload` according to `type_url`.
    ///
    /// Only a generic authorization is decoded; a payload that fails to decode
    /// as one, or names no message, is a decode error.
    pub fn decode(type_url: &str, payload: &[u8]) -> FloodResult<Self> {
        if type_url != GENERIC_AUTHORIZATION_TYPE_URL {
            return Ok(Self::Unrecognized { type_url: type_url.to_string() });
        }

        let generic = GenericAuthorization::decode(payload)
            .map_err(|e| FloodError::decode_error(type_url, e))?;

        if generic.msg.is_empty() {
            return Err(FloodError::decode_error(type_url, "authorization names no message"));
        }

        Ok(Self::Generic { msg: generic.msg })
    }

    /// Permission name carried by this authorization, if inspectable
    pub fn permission(&self) -> Option<&str> {
        match self {
            Self::Generic { msg } => Some(msg),
            Self::Unrecognized { .. } => None,
        }
    }
}
