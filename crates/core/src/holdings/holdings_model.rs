//! Holdings registry domain models.

use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ordinal risk bucket assigned to every registry entry. Accounts carry a
/// configured ceiling per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    LowMedium,
    Medium,
    MediumHigh,
    High,
}

impl RiskLevel {
    /// All buckets in ascending risk order, for weight tables.
    pub fn all() -> [RiskLevel; 5] {
        [
            RiskLevel::Low,
            RiskLevel::LowMedium,
            RiskLevel::Medium,
            RiskLevel::MediumHigh,
            RiskLevel::High,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::LowMedium => "Low-Medium",
            RiskLevel::Medium => "Medium",
            RiskLevel::MediumHigh => "Medium-High",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Registry entry keyed by canonical ticker.
///
/// Invariant: at most one entry per canonical ticker; `create` on the
/// registry trait upserts by key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversalHolding {
    /// Canonical storage-form ticker (crypto dashes kept).
    pub ticker: String,
    pub name: Option<String>,
    pub risk_level: RiskLevel,
    pub price: Option<Decimal>,
    pub dividend_yield_pct: Option<Decimal>,
    pub pays_dividends: bool,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a registry entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub ticker: String,
    pub name: Option<String>,
    pub risk_level: RiskLevel,
    pub price: Option<Decimal>,
}
