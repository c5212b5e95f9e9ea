//! Risk-category compliance checks.
//!
//! A ticker's risk level comes from the holdings registry; the account
//! carries a configured ceiling per risk category. The single-position
//! check gates NEW money: an unclassified ticker is a hard stop there,
//! while the whole-account audit reports it as an issue and keeps going.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::accounts::AccountStoreTrait;
use crate::constants::COMPLIANCE_DECIMAL_PRECISION;
use crate::errors::Result;
use crate::holdings::{HoldingRegistryTrait, RiskLevel};
use crate::positions::{Position, PositionStoreTrait};
use crate::symbols::SymbolNormalizer;

use super::compliance_model::{
    AccountComplianceReport, CategoryWeight, ComplianceDetails, ComplianceResult,
};

pub struct ComplianceService {
    account_store: Arc<dyn AccountStoreTrait>,
    position_store: Arc<dyn PositionStoreTrait>,
    registry: Arc<dyn HoldingRegistryTrait>,
    normalizer: Arc<SymbolNormalizer>,
}

/// Category totals for one account's current book.
struct CategoryValues {
    by_level: HashMap<RiskLevel, Decimal>,
    total_value: Decimal,
    unclassified: Vec<String>,
}

impl ComplianceService {
    pub fn new(
        account_store: Arc<dyn AccountStoreTrait>,
        position_store: Arc<dyn PositionStoreTrait>,
        registry: Arc<dyn HoldingRegistryTrait>,
        normalizer: Arc<SymbolNormalizer>,
    ) -> Self {
        ComplianceService {
            account_store,
            position_store,
            registry,
            normalizer,
        }
    }

    /// Sums position value per risk category. Unclassified tickers stay out
    /// of the category sums but count toward the total; invalid positions
    /// are skipped entirely.
    fn category_values(&self, positions: &[Position]) -> Result<CategoryValues> {
        let mut by_level: HashMap<RiskLevel, Decimal> = HashMap::new();
        let mut total_value = Decimal::ZERO;
        let mut unclassified: Vec<String> = Vec::new();

        for position in positions {
            let Some(value) = position.market_value() else {
                warn!(
                    "skipping position {} ({}): negative quantity or price",
                    position.id, position.symbol
                );
                continue;
            };
            total_value += value;

            let ticker = self.normalizer.canonical(&position.symbol);
            match self.registry.by_ticker(&ticker)? {
                Some(holding) => {
                    *by_level.entry(holding.risk_level).or_insert(Decimal::ZERO) += value;
                }
                None => {
                    if !unclassified.contains(&ticker) {
                        unclassified.push(ticker);
                    }
                }
            }
        }

        Ok(CategoryValues {
            by_level,
            total_value,
            unclassified,
        })
    }

    /// Checks whether adding `position_value` of `ticker` keeps the account
    /// inside its risk-category ceilings.
    ///
    /// Never returns a Rust error for a policy violation; `Err` means a
    /// store or registry call failed.
    pub fn check_position_compliance(
        &self,
        account_id: &str,
        ticker: &str,
        position_value: Decimal,
    ) -> Result<ComplianceResult> {
        let canonical = self.normalizer.canonical(ticker);
        let mut details = ComplianceDetails::default();

        let Some(holding) = self.registry.by_ticker(&canonical)? else {
            return Ok(ComplianceResult::violation(
                format!(
                    "{} is not in the Holdings Library; it must be classified before the position can be added",
                    canonical
                ),
                details,
            ));
        };
        details.ticker_in_library = true;
        details.ticker_risk_level = Some(holding.risk_level);

        let allocation = self.account_store.risk_allocation(account_id)?;
        let limit = allocation.limit_for(holding.risk_level);
        details.category_allocation_limit = Some(limit);

        if limit.is_zero() {
            return Ok(ComplianceResult::violation(
                format!(
                    "{} positions are not permitted: the {} risk tier is set to 0% for this account",
                    canonical,
                    holding.risk_level.display_name()
                ),
                details,
            ));
        }

        let account = self.account_store.get_by_id(account_id)?;
        let positions = self.position_store.by_account(&account.account_ref())?;
        let values = self.category_values(&positions)?;
        for unclassified_ticker in &values.unclassified {
            warn!(
                "unclassified ticker {} excluded from category weights",
                unclassified_ticker
            );
        }

        let category_value = values
            .by_level
            .get(&holding.risk_level)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let hundred = dec!(100);

        let current_weight = if values.total_value > Decimal::ZERO {
            category_value / values.total_value * hundred
        } else {
            Decimal::ZERO
        };
        details.current_category_weight =
            Some(current_weight.round_dp(COMPLIANCE_DECIMAL_PRECISION));

        let denominator = values.total_value + position_value;
        let projected = if denominator > Decimal::ZERO {
            (category_value + position_value) / denominator * hundred
        } else {
            Decimal::ZERO
        };
        let projected_display = projected.round_dp(COMPLIANCE_DECIMAL_PRECISION);
        details.projected_category_weight = Some(projected_display);

        debug!(
            "compliance check {} on account {}: projected {}% vs limit {}%",
            canonical, account_id, projected_display, limit
        );

        // limit itself is allowed; only crossing it violates
        if projected > limit {
            let overage = (projected - limit).round_dp(COMPLIANCE_DECIMAL_PRECISION);
            return Ok(ComplianceResult::violation(
                format!(
                    "adding this position would put the {} category at {}%, {} points over its {}% limit",
                    holding.risk_level.display_name(),
                    projected_display,
                    overage,
                    limit
                ),
                details,
            ));
        }

        let mut warnings = Vec::new();
        if projected > limit * dec!(0.9) {
            warnings.push(format!(
                "the {} category would reach {}% of its {}% limit",
                holding.risk_level.display_name(),
                projected_display,
                limit
            ));
        }

        Ok(ComplianceResult {
            compliant: true,
            errors: Vec::new(),
            warnings,
            details,
        })
    }

    /// Audits an account's current book against its ceilings, independent
    /// of any pending addition.
    pub fn check_account_compliance(&self, account_id: &str) -> Result<AccountComplianceReport> {
        let account = self.account_store.get_by_id(account_id)?;
        let positions = self.position_store.by_account(&account.account_ref())?;
        let allocation = self.account_store.risk_allocation(account_id)?;
        let values = self.category_values(&positions)?;

        let mut issues: Vec<String> = values
            .unclassified
            .iter()
            .map(|ticker| format!("{} is not in the Holdings Library", ticker))
            .collect();

        let hundred = dec!(100);
        let mut category_weights = Vec::with_capacity(RiskLevel::all().len());
        for level in RiskLevel::all() {
            let value = values
                .by_level
                .get(&level)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let current = if values.total_value > Decimal::ZERO {
                (value / values.total_value * hundred).round_dp(COMPLIANCE_DECIMAL_PRECISION)
            } else {
                Decimal::ZERO
            };
            let limit = allocation.limit_for(level);

            if current > limit {
                issues.push(format!(
                    "the {} category is at {}%, over its {}% limit",
                    level.display_name(),
                    current,
                    limit
                ));
            }
            category_weights.push(CategoryWeight {
                risk_level: level,
                current_weight_pct: current,
                limit_pct: limit,
            });
        }

        Ok(AccountComplianceReport {
            compliant: issues.is_empty(),
            issues,
            category_weights,
        })
    }
}
