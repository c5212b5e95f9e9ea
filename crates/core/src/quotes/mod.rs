//! Quotes module - provider trait and the price-refresh job body.

mod quotes_traits;
mod refresh_service;

// Re-export the public interface
pub use quotes_traits::QuoteProviderTrait;
pub use refresh_service::{PriceRefreshService, RefreshSummary};
