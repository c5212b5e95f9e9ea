//! Signal domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, SignalError};

/// Direction of an inbound trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalDirection {
    Buy,
    Sell,
}

impl SignalDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDirection::Buy => "BUY",
            SignalDirection::Sell => "SELL",
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(SignalDirection::Buy),
            "SELL" => Ok(SignalDirection::Sell),
            other => Err(SignalError::UnknownDirection(other.to_string()).into()),
        }
    }
}

/// External buy/sell alert for one symbol.
///
/// The feed does not deduplicate; the same alert can arrive more than once.
/// Task creation is the dedup point, not this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    /// Free-text symbol from the alert; normalized before any comparison.
    pub symbol: String,
    pub direction: SignalDirection,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    pub message: Option<String>,
    /// When set, a full reconciliation report is dispatched per matched
    /// account in addition to the task.
    pub report_recipient: Option<String>,
}

impl Signal {
    /// Rejects malformed signals before any per-account work begins.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(SignalError::EmptySymbol.into());
        }
        if self.price <= Decimal::ZERO {
            return Err(SignalError::NonPositivePrice(self.price).into());
        }
        Ok(())
    }
}

/// Summary returned to the signal caller.
///
/// Always returned, even when zero accounts matched or some per-account
/// steps failed; partial success is the expected common case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalOutcome {
    pub accepted: bool,
    pub tasks_created: usize,
    /// Human-readable "account - direction - symbol" lines for each task.
    pub tasks: Vec<String>,
    pub reports_sent: usize,
    pub accounts: Vec<String>,
}

impl SignalOutcome {
    pub fn accepted() -> Self {
        SignalOutcome {
            accepted: true,
            ..Default::default()
        }
    }
}
