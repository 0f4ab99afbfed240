//! # Grant Filter
//!
//! Decides which granters the keeper may act for. Each grant is checked on
//! its own and a bad grant is skipped, never fatal. A granter is eligible once
//! its active generic grants cover every required permission.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use flood_types::{Authorization, Grant, GENERIC_AUTHORIZATION_TYPE_URL};
use tracing::{debug, warn};

/// Why a grant did not count toward eligibility
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantSkip {
    /// Expiration at or before now
    Expired,
    /// No authorization payload
    EmptyPayload,
    /// Authorization kind other than generic
    UnrecognizedType(String),
    /// Generic payload that failed to decode
    Malformed(String),
}

impl fmt::Display for GrantSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "expired"),
            Self::EmptyPayload => write!(f, "empty payload"),
            Self::UnrecognizedType(type_url) => write!(f, "unrecognized authorization type {}", type_url),
            Self::Malformed(reason) => write!(f, "malformed payload: {}", reason),
        }
    }
}

/// Check one grant, returning the permission it carries
pub fn check_grant(grant: &Grant, now: DateTime<Utc>) -> Result<String, GrantSkip> {
    if !grant.is_active_at(now) {
        return Err(GrantSkip::Expired);
    }

    if grant.payload.is_empty() {
        return Err(GrantSkip::EmptyPayload);
    }

    if grant.type_url != GENERIC_AUTHORIZATION_TYPE_URL {
        return Err(GrantSkip::UnrecognizedType(grant.type_url.clone()));
    }

    match grant.authorization() {
        Ok(Authorization::Generic { msg }) => Ok(msg),
        Ok(Authorization::Unrecognized { type_url }) => Err(GrantSkip::UnrecognizedType(type_url)),
        Err(e) => Err(GrantSkip::Malformed(e.to_string())),
    }
}

/// Permissions each granter has actively and validly granted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationIndex {
    granted: BTreeMap<String, BTreeSet<String>>,
}

impl AuthorizationIndex {
    /// Build the index from one grant snapshot
    pub fn build(grants: &[Grant], now: DateTime<Utc>) -> Self {
        let mut index = Self::default();

        for grant in grants {
            match check_grant(grant, now) {
                Ok(permission) => index.record(&grant.granter, permission),
                Err(skip @ GrantSkip::Malformed(_)) => {
                    warn!(granter = %grant.granter, reason = %skip, "Skipping grant");
                }
                Err(skip) => {
                    debug!(granter = %grant.granter, reason = %skip, "Skipping grant");
                }
            }
        }

        index
    }

    pub fn record(&mut self, granter: &str, permission: String) {
        self.granted.entry(granter.to_string()).or_default().insert(permission);
    }

    pub fn permissions(&self, granter: &str) -> Option<&BTreeSet<String>> {
        self.granted.get(granter)
    }

    pub fn len(&self) -> usize {
        self.granted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }

    /// Granters whose permissions cover all of `required`
    pub fn eligible(&self, required: &[&str]) -> BTreeSet<String> {
        self.granted
            .iter()
            .filter(|(granter, permissions)| {
                let missing: Vec<&str> = required
                    .iter()
                    .copied()
                    .filter(|permission| !permissions.contains(*permission))
                    .collect();

                if !missing.is_empty() {
                    debug!(granter = %granter, missing = ?missing, "Granter lacks required permissions");
                }
                missing.is_empty()
            })
            .map(|(granter, _)| granter.clone())
            .collect()
    }
}

/// Granters holding every permission in `required` at `now`
pub fn compute_eligible_granters(grants: &[Grant], required: &[&str], now: DateTime<Utc>) -> BTreeSet<String> {
    AuthorizationIndex::build(grants, now).eligible(required)
}
