//! Position domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::AccountRef;

/// A security position held within exactly one account.
///
/// `current_price` is maintained by the price-refresh job; `quantity` and
/// `entry_price` by user edits. `symbol` is user-entered free text and is
/// never assumed canonical.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub account: AccountRef,
    pub symbol: String,
    pub quantity: Decimal,
    pub entry_price: Decimal,
    pub current_price: Decimal,
}

impl Position {
    /// Market value of the position, or `None` when quantity or price is
    /// negative. Callers treat `None` as a data-quality skip, not an error.
    pub fn market_value(&self) -> Option<Decimal> {
        if self.quantity < Decimal::ZERO || self.current_price < Decimal::ZERO {
            return None;
        }
        Some(self.quantity * self.current_price)
    }
}
