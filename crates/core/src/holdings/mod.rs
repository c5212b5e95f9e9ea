//! Holdings registry module - the firm-wide security library.

mod holdings_model;
mod holdings_service;
mod holdings_traits;

// Re-export the public interface
pub use holdings_model::{NewHolding, RiskLevel, UniversalHolding};
pub use holdings_service::HoldingsService;
pub use holdings_traits::HoldingRegistryTrait;
