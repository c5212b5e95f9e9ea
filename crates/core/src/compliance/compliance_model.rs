//! Compliance domain models.
//!
//! Violations are structured data for UI display, never Rust errors. A
//! `Result::Err` from the checker means a collaborator failed, not that the
//! account is out of policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::holdings::RiskLevel;

/// Outcome of a single-position compliance check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResult {
    pub compliant: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub details: ComplianceDetails,
}

impl ComplianceResult {
    pub fn violation(error: String, details: ComplianceDetails) -> Self {
        ComplianceResult {
            compliant: false,
            errors: vec![error],
            warnings: Vec::new(),
            details,
        }
    }
}

/// Numeric context behind a compliance decision, for UI display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceDetails {
    pub ticker_in_library: bool,
    pub ticker_risk_level: Option<RiskLevel>,
    pub category_allocation_limit: Option<Decimal>,
    /// Category weight before the candidate position, 1dp.
    pub current_category_weight: Option<Decimal>,
    /// Category weight if the candidate position were added, 1dp.
    pub projected_category_weight: Option<Decimal>,
}

/// One line of the five-category weight table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWeight {
    pub risk_level: RiskLevel,
    pub current_weight_pct: Decimal,
    pub limit_pct: Decimal,
}

/// Whole-account audit result. The weight table is returned regardless of
/// violations so the UI always renders the full picture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountComplianceReport {
    pub compliant: bool,
    pub issues: Vec<String>,
    pub category_weights: Vec<CategoryWeight>,
}
