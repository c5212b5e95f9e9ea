//! Allocation reconciliation: the actual-vs-target comparison.
//!
//! `reconcile` is a pure calculator over in-memory inputs; the service
//! fetches an account's snapshot from the stores and delegates. Internal
//! math runs at full precision, rounding happens only when rows are built.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::accounts::{get_tolerances, AccountStoreTrait, Tolerances};
use crate::allocations::{TargetAllocation, TargetAllocationStoreTrait};
use crate::constants::{CASH_TICKER, DISPLAY_DECIMAL_PRECISION};
use crate::errors::Result;
use crate::positions::{Position, PositionStoreTrait};
use crate::symbols::SymbolNormalizer;

use super::reconciliation_model::{
    ReconciliationReport, ReconciliationRow, RowStatus, TradeAction,
};

/// Positions that normalize to one comparison key, rolled together.
/// Duplicate spellings of a ticker within one account land in one entry.
#[derive(Debug, Clone)]
struct ActualEntry {
    symbol: String,
    value: Decimal,
    quantity: Decimal,
    latest_price: Decimal,
}

/// Rolls valid positions up by loose comparison key. Positions with a
/// negative quantity or price are data-quality problems: skipped with a
/// warning, never an error.
fn aggregate_actuals(
    positions: &[Position],
    normalizer: &SymbolNormalizer,
) -> (HashMap<String, ActualEntry>, Decimal) {
    let mut entries: HashMap<String, ActualEntry> = HashMap::new();
    let mut total_actual_value = Decimal::ZERO;

    for position in positions {
        let Some(value) = position.market_value() else {
            warn!(
                "skipping position {} ({}): negative quantity or price",
                position.id, position.symbol
            );
            continue;
        };
        total_actual_value += value;

        let key = normalizer.loose(&position.symbol);
        let entry = entries.entry(key).or_insert_with(|| ActualEntry {
            symbol: position.symbol.trim().to_uppercase(),
            value: Decimal::ZERO,
            quantity: Decimal::ZERO,
            latest_price: Decimal::ZERO,
        });
        entry.value += value;
        entry.quantity += position.quantity;
        if position.current_price > Decimal::ZERO {
            entry.latest_price = position.current_price;
        }
    }

    (entries, total_actual_value)
}

/// Builds the reconciliation rows for one account's snapshot.
///
/// Output ordering is part of the contract: rows sort by |variance|
/// descending so the largest discrepancy is reviewed first.
pub fn reconcile(
    positions: &[Position],
    targets: &[TargetAllocation],
    tolerances: Tolerances,
    normalizer: &SymbolNormalizer,
) -> ReconciliationReport {
    let (mut actuals, total_actual_value) = aggregate_actuals(positions, normalizer);

    if targets.is_empty() {
        return ReconciliationReport {
            has_target_allocations: false,
            comparison: Vec::new(),
            total_actual_value: total_actual_value.round_dp(DISPLAY_DECIMAL_PRECISION),
            total_target_percentage: Decimal::ZERO,
        };
    }

    let band = tolerances.drift_band_pct;
    let noise = tolerances.trade_noise_amount;
    let hundred = dec!(100);

    let mut rows: Vec<ReconciliationRow> = Vec::with_capacity(targets.len() + actuals.len());
    let mut total_target_percentage = Decimal::ZERO;

    for target in targets {
        let key = normalizer.loose(&target.ticker);
        let is_cash = key == CASH_TICKER;
        let actual = actuals.remove(&key);
        let held = actual.is_some();

        let (actual_value, quantity, held_price) = match &actual {
            Some(entry) => (entry.value, entry.quantity, entry.latest_price),
            None => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        };

        let target_pct = target.target_percentage;
        total_target_percentage += target_pct;

        let actual_pct = if total_actual_value > Decimal::ZERO {
            actual_value / total_actual_value * hundred
        } else {
            Decimal::ZERO
        };
        let variance = actual_pct - target_pct;
        let target_value = if total_actual_value > Decimal::ZERO {
            target_pct / hundred * total_actual_value
        } else {
            Decimal::ZERO
        };
        let action_dollar_amount = target_value - actual_value;

        // price priority: held position, then registry, then unpriced
        let current_price = if held_price > Decimal::ZERO {
            held_price
        } else {
            target
                .holding_price
                .filter(|p| *p > Decimal::ZERO)
                .unwrap_or(Decimal::ZERO)
        };
        let action_shares = if current_price > Decimal::ZERO {
            action_dollar_amount.abs() / current_price
        } else {
            if !is_cash {
                warn!(
                    "no price available for {}, trade size not computed",
                    target.ticker
                );
            }
            Decimal::ZERO
        };

        // cash is liquidity, never a trade
        let action_type = if is_cash {
            TradeAction::Hold
        } else if action_dollar_amount > noise {
            TradeAction::Buy
        } else if action_dollar_amount < -noise {
            TradeAction::Sell
        } else {
            TradeAction::Hold
        };

        // band edges are inclusive: exactly +/-band is on-target
        let status = if is_cash && variance > band {
            RowStatus::CanDeploy
        } else if !is_cash && held && actual_value.is_zero() {
            RowStatus::ZeroBalance
        } else if variance > band {
            RowStatus::Over
        } else if variance < -band {
            RowStatus::Under
        } else {
            RowStatus::OnTarget
        };

        rows.push(ReconciliationRow {
            ticker: target.ticker.clone(),
            name: target.name.clone(),
            actual_pct: actual_pct.round_dp(DISPLAY_DECIMAL_PRECISION),
            target_pct: target_pct.round_dp(DISPLAY_DECIMAL_PRECISION),
            variance: variance.round_dp(DISPLAY_DECIMAL_PRECISION),
            actual_value: actual_value.round_dp(DISPLAY_DECIMAL_PRECISION),
            target_value: target_value.round_dp(DISPLAY_DECIMAL_PRECISION),
            quantity,
            status,
            action_type,
            action_dollar_amount: action_dollar_amount.round_dp(DISPLAY_DECIMAL_PRECISION),
            action_shares: action_shares.round_dp(DISPLAY_DECIMAL_PRECISION),
            current_price,
        });
    }

    // held tickers no target row claimed
    for (key, entry) in actuals {
        let is_cash = key == CASH_TICKER;
        let actual_pct = if total_actual_value > Decimal::ZERO {
            entry.value / total_actual_value * hundred
        } else {
            Decimal::ZERO
        };

        rows.push(ReconciliationRow {
            ticker: entry.symbol.clone(),
            name: None,
            actual_pct: actual_pct.round_dp(DISPLAY_DECIMAL_PRECISION),
            target_pct: Decimal::ZERO,
            variance: actual_pct.round_dp(DISPLAY_DECIMAL_PRECISION),
            actual_value: entry.value.round_dp(DISPLAY_DECIMAL_PRECISION),
            target_value: Decimal::ZERO,
            quantity: entry.quantity,
            status: RowStatus::Unexpected,
            action_type: if is_cash {
                TradeAction::Hold
            } else {
                TradeAction::Sell
            },
            action_dollar_amount: (-entry.value).round_dp(DISPLAY_DECIMAL_PRECISION),
            action_shares: (-entry.quantity).round_dp(DISPLAY_DECIMAL_PRECISION),
            current_price: entry.latest_price,
        });
    }

    rows.sort_by(|a, b| {
        b.variance
            .abs()
            .cmp(&a.variance.abs())
            .then_with(|| a.ticker.cmp(&b.ticker))
    });

    ReconciliationReport {
        has_target_allocations: true,
        comparison: rows,
        total_actual_value: total_actual_value.round_dp(DISPLAY_DECIMAL_PRECISION),
        total_target_percentage: total_target_percentage.round_dp(DISPLAY_DECIMAL_PRECISION),
    }
}

/// Service producing reconciliation reports from the current stored
/// snapshot of an account.
pub struct ReconciliationService {
    account_store: Arc<dyn AccountStoreTrait>,
    position_store: Arc<dyn PositionStoreTrait>,
    target_store: Arc<dyn TargetAllocationStoreTrait>,
    normalizer: Arc<SymbolNormalizer>,
}

impl ReconciliationService {
    pub fn new(
        account_store: Arc<dyn AccountStoreTrait>,
        position_store: Arc<dyn PositionStoreTrait>,
        target_store: Arc<dyn TargetAllocationStoreTrait>,
        normalizer: Arc<SymbolNormalizer>,
    ) -> Self {
        ReconciliationService {
            account_store,
            position_store,
            target_store,
            normalizer,
        }
    }

    /// Builds the actual-vs-target comparison for one account.
    ///
    /// Reads whatever prices are currently stored; never triggers a quote
    /// fetch of its own.
    pub fn get_reconciliation(&self, account_id: &str) -> Result<ReconciliationReport> {
        let account = self.account_store.get_by_id(account_id)?;
        let account_ref = account.account_ref();
        debug!("reconciling account {}", account_id);

        let positions = self.position_store.by_account(&account_ref)?;
        let targets = self.target_store.by_account(&account_ref)?;
        let tolerances = get_tolerances(&account);

        Ok(reconcile(&positions, &targets, tolerances, &self.normalizer))
    }
}
