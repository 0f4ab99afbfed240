//! Token amounts in the chain's `<amount><denom>` notation

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::{FloodError, FloodResult};
use crate::proto::base::Coin as ProtoCoin;

/// An integer amount of one denomination
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: &str, amount: u128) -> Self {
        Self {
            denom: denom.to_string(),
            amount,
        }
    }

    pub fn to_proto(&self) -> ProtoCoin {
        ProtoCoin {
            denom: self.denom.clone(),
            amount: self.amount.to_string(),
        }
    }
}

impl FromStr for Coin {
    type Err = FloodError;

    /// Parse `"1000000uosmo"` or `"5ibc/27394F..."`
    fn from_str(s: &str) -> FloodResult<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| FloodError::invalid_parameter("coin", s, "<amount><denom>"))?;
        let (amount, denom) = s.split_at(split);

        if amount.is_empty() {
            return Err(FloodError::invalid_parameter("coin", s, "<amount><denom>"));
        }
        if !denom.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(FloodError::invalid_parameter("coin denom", denom, "denom starting with a letter"));
        }

        let amount = amount
            .parse::<u128>()
            .map_err(|_| FloodError::invalid_parameter("coin amount", amount, "unsigned integer"))?;

        Ok(Self::new(denom, amount))
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl Serialize for Coin {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Coin {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Coin::from_str(&s).map_err(serde::de::Error::custom)
    }
}
