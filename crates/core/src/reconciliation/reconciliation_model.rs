//! Reconciliation domain models.
//!
//! Rows are derived views: computed fresh on every call, never persisted or
//! cached.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Drift classification for one reconciliation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowStatus {
    /// Above target by more than the drift band.
    Over,
    /// Below target by more than the drift band.
    Under,
    /// Within the drift band (band edges inclusive).
    OnTarget,
    /// Held but no target row exists for the ticker.
    Unexpected,
    /// The ticker is on the books but its aggregated value is zero.
    ZeroBalance,
    /// Cash sitting above its target band, available to invest.
    CanDeploy,
}

/// Recommended trade direction for one row. Advisory only; nothing here
/// places orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

/// One line of the actual-vs-target comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationRow {
    pub ticker: String,
    pub name: Option<String>,
    pub actual_pct: Decimal,
    pub target_pct: Decimal,
    /// Actual minus target, in percentage points.
    pub variance: Decimal,
    pub actual_value: Decimal,
    pub target_value: Decimal,
    pub quantity: Decimal,
    pub status: RowStatus,
    pub action_type: TradeAction,
    /// Dollar amount to move toward target. Positive buys, negative sells.
    pub action_dollar_amount: Decimal,
    pub action_shares: Decimal,
    pub current_price: Decimal,
}

/// Full comparison for one account, ordered by |variance| descending.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub has_target_allocations: bool,
    pub comparison: Vec<ReconciliationRow>,
    pub total_actual_value: Decimal,
    pub total_target_percentage: Decimal,
}

impl ReconciliationReport {
    pub fn empty() -> Self {
        ReconciliationReport {
            has_target_allocations: false,
            comparison: Vec::new(),
            total_actual_value: Decimal::ZERO,
            total_target_percentage: Decimal::ZERO,
        }
    }
}
