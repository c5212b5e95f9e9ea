//! Registry resolution with lazy auto-add.
//!
//! Positions and target allocations can reference tickers the firm has never
//! classified. The first time such a ticker appears it is added to the
//! registry with a default classification so reconciliation can proceed;
//! compliance for NEW positions deliberately bypasses this and hard-stops on
//! unclassified tickers instead.

use std::sync::Arc;

use log::warn;

use super::holdings_model::{NewHolding, RiskLevel, UniversalHolding};
use super::holdings_traits::HoldingRegistryTrait;
use crate::errors::Result;
use crate::symbols::SymbolNormalizer;

pub struct HoldingsService {
    registry: Arc<dyn HoldingRegistryTrait>,
    normalizer: Arc<SymbolNormalizer>,
}

impl HoldingsService {
    pub fn new(registry: Arc<dyn HoldingRegistryTrait>, normalizer: Arc<SymbolNormalizer>) -> Self {
        HoldingsService {
            registry,
            normalizer,
        }
    }

    /// Looks up a raw symbol, creating a default-classified entry on miss.
    pub async fn resolve_or_create(&self, raw_symbol: &str) -> Result<UniversalHolding> {
        let ticker = self.normalizer.canonical(raw_symbol);
        if let Some(holding) = self.registry.by_ticker(&ticker)? {
            return Ok(holding);
        }

        warn!(
            "ticker {} missing from the holdings registry, auto-adding with default classification",
            ticker
        );
        self.registry
            .create(NewHolding {
                ticker,
                name: None,
                risk_level: RiskLevel::Medium,
                price: None,
            })
            .await
    }

    /// Risk classification for a raw symbol, `None` when unclassified.
    pub fn risk_level_of(&self, raw_symbol: &str) -> Result<Option<RiskLevel>> {
        let ticker = self.normalizer.canonical(raw_symbol);
        Ok(self.registry.by_ticker(&ticker)?.map(|h| h.risk_level))
    }
}
