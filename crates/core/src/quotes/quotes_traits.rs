//! Quote provider trait.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;

/// Trait defining the contract for the market-quote provider.
///
/// Implementations own rate limiting, retries, and timeouts; a timeout
/// surfaces to the core as an `Err` and is handled per symbol.
#[async_trait]
pub trait QuoteProviderTrait: Send + Sync {
    /// Latest price for one canonical ticker.
    async fn latest_price(&self, canonical_ticker: &str) -> Result<Decimal>;
}
