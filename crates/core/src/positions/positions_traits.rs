//! Position store trait.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::positions_model::Position;
use crate::accounts::AccountRef;
use crate::errors::Result;

/// Trait defining the contract for position reads and price writes.
#[async_trait]
pub trait PositionStoreTrait: Send + Sync {
    /// Positions held by one account.
    fn by_account(&self, account: &AccountRef) -> Result<Vec<Position>>;

    /// Every position across all accounts, for signal fan-out and the
    /// price-refresh job.
    fn all_positions(&self) -> Result<Vec<Position>>;

    /// Writes a freshly fetched price onto one position.
    async fn update_current_price(&self, position_id: &str, price: Decimal) -> Result<()>;
}
