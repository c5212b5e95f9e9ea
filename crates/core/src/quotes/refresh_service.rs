//! Price-refresh job body.
//!
//! The scheduler that fires this is a collaborator; the core only defines
//! what one run does. Each run builds its own quote cache keyed by
//! canonical ticker, so spelling variants of one security share a single
//! fetch and nothing leaks across runs.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::positions::PositionStoreTrait;
use crate::quotes::QuoteProviderTrait;
use crate::symbols::SymbolNormalizer;

/// Counts for one refresh run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub updated: usize,
    pub skipped: usize,
}

pub struct PriceRefreshService {
    position_store: Arc<dyn PositionStoreTrait>,
    provider: Arc<dyn QuoteProviderTrait>,
    normalizer: Arc<SymbolNormalizer>,
}

impl PriceRefreshService {
    pub fn new(
        position_store: Arc<dyn PositionStoreTrait>,
        provider: Arc<dyn QuoteProviderTrait>,
        normalizer: Arc<SymbolNormalizer>,
    ) -> Self {
        PriceRefreshService {
            position_store,
            provider,
            normalizer,
        }
    }

    /// Refreshes the stored price of every position from the provider.
    ///
    /// Per-symbol failures are skipped with a warning; the run always
    /// completes and reports what it managed to update.
    pub async fn refresh_positions(&self) -> Result<RefreshSummary> {
        let positions = self.position_store.all_positions()?;
        let mut cache: HashMap<String, Decimal> = HashMap::new();
        let mut summary = RefreshSummary::default();

        for position in &positions {
            let ticker = self.normalizer.canonical(&position.symbol);
            let price = match cache.get(&ticker) {
                Some(price) => *price,
                None => match self.provider.latest_price(&ticker).await {
                    Ok(price) => {
                        cache.insert(ticker.clone(), price);
                        price
                    }
                    Err(e) => {
                        warn!("quote fetch failed for {}: {}", ticker, e);
                        summary.skipped += 1;
                        continue;
                    }
                },
            };

            match self
                .position_store
                .update_current_price(&position.id, price)
                .await
            {
                Ok(()) => summary.updated += 1,
                Err(e) => {
                    warn!("price write failed for position {}: {}", position.id, e);
                    summary.skipped += 1;
                }
            }
        }

        debug!(
            "price refresh done: {} updated, {} skipped",
            summary.updated, summary.skipped
        );
        Ok(summary)
    }
}
