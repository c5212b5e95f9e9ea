//! Account domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DEFAULT_DRIFT_BAND_PCT, DEFAULT_TRADE_NOISE_AMOUNT};
use crate::errors::{Error, ValidationError};
use crate::holdings::RiskLevel;

/// Legal shape of an account. Individual, corporate, and joint accounts
/// carry identical position/target/risk data; nothing downstream branches
/// on the kind except display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    Individual,
    Corporate,
    Joint,
}

impl AccountKind {
    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Individual => "Individual",
            AccountKind::Corporate => "Corporate",
            AccountKind::Joint => "Joint",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AccountKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "individual" => Ok(AccountKind::Individual),
            "corporate" => Ok(AccountKind::Corporate),
            "joint" => Ok(AccountKind::Joint),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown account type '{}'",
                other
            )))),
        }
    }
}

/// Reference to an account regardless of its legal shape.
///
/// Positions and target allocations carry this instead of three mutually
/// exclusive foreign keys; stores resolve it to whichever table backs the
/// kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    pub id: String,
    pub kind: AccountKind,
}

/// Domain model representing a managed investment account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub kind: AccountKind,
    /// Household the account rolls up under, for task/report labels.
    pub household: Option<String>,
    pub owner_name: Option<String>,
    pub currency: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Additional metadata as JSON string
    pub meta: Option<String>,
}

impl Account {
    pub fn account_ref(&self) -> AccountRef {
        AccountRef {
            id: self.id.clone(),
            kind: self.kind,
        }
    }

    /// Human label used in task descriptions: household / owner / account.
    pub fn display_label(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3);
        if let Some(household) = self.household.as_deref() {
            parts.push(household);
        }
        if let Some(owner) = self.owner_name.as_deref() {
            parts.push(owner);
        }
        parts.push(&self.name);
        format!("{} ({})", parts.join(" / "), self.kind.label())
    }
}

/// Per-risk-category allocation ceilings for an account, in percent.
/// A category at zero means that risk tier is forbidden for the account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAllocation {
    pub low_pct: Decimal,
    pub low_medium_pct: Decimal,
    pub medium_pct: Decimal,
    pub medium_high_pct: Decimal,
    pub high_pct: Decimal,
}

impl RiskAllocation {
    pub fn limit_for(&self, level: RiskLevel) -> Decimal {
        match level {
            RiskLevel::Low => self.low_pct,
            RiskLevel::LowMedium => self.low_medium_pct,
            RiskLevel::Medium => self.medium_pct,
            RiskLevel::MediumHigh => self.medium_high_pct,
            RiskLevel::High => self.high_pct,
        }
    }
}

/// Rebalance tolerances, overridable per account through the meta JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tolerances {
    /// Width of the on-target variance band, in percentage points.
    pub drift_band_pct: Decimal,
    /// Buy/sell amounts at or below this are classified `hold`.
    pub trade_noise_amount: Decimal,
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            drift_band_pct: DEFAULT_DRIFT_BAND_PCT.parse().unwrap_or(dec!(2)),
            trade_noise_amount: DEFAULT_TRADE_NOISE_AMOUNT.parse().unwrap_or(dec!(50)),
        }
    }
}

/// Reads rebalance tolerances from an account's meta JSON.
///
/// Returns the defaults if:
/// - meta is None, empty, or invalid JSON
/// - the `rebalance` object is missing or malformed
pub fn get_tolerances(account: &Account) -> Tolerances {
    account
        .meta
        .as_ref()
        .and_then(|meta_str| {
            if meta_str.is_empty() {
                return None;
            }
            serde_json::from_str::<Value>(meta_str).ok()
        })
        .and_then(|json| json.get("rebalance").cloned())
        .and_then(|rebalance| serde_json::from_value::<Tolerances>(rebalance).ok())
        .unwrap_or_default()
}
