//! Target allocation domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::AccountRef;

/// Desired weight of one ticker within one account's investable assets.
///
/// The store resolves the referenced registry entry and flattens its
/// ticker, name, and price onto the row. Weights across an account are not
/// required to sum to 100; the remainder is implicit cash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAllocation {
    pub id: String,
    pub account: AccountRef,
    /// Ticker of the referenced holding, as stored in the registry.
    pub ticker: String,
    pub name: Option<String>,
    /// Registry price of the holding, used for trade sizing when the
    /// account holds none of the ticker.
    pub holding_price: Option<Decimal>,
    /// Desired weight, 0 to 100.
    pub target_percentage: Decimal,
}
