//! Signal-driven task generation.
//!
//! An inbound alert fans out across every account that holds or targets the
//! signaled symbol. Each account is evaluated with the reconciler's math,
//! and matched accounts get at most one open task per
//! (account, direction, symbol) tuple. Accounts are independent: one
//! account's collaborator failure never aborts the rest of the batch.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, error, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::accounts::{get_tolerances, Account, AccountStoreTrait};
use crate::allocations::TargetAllocationStoreTrait;
use crate::errors::Result;
use crate::positions::PositionStoreTrait;
use crate::reconciliation::reconcile;
use crate::symbols::SymbolNormalizer;
use crate::tasks::{NewTask, ReportSinkTrait, TaskSinkTrait};

use super::idempotency::compute_task_key;
use super::signals_model::{Signal, SignalDirection, SignalOutcome};

/// Per-account snapshot of the signaled symbol, built once per invocation
/// from the stores. Never cached across signals.
#[derive(Debug, Default, Clone)]
struct AccountExposure {
    total_value: Decimal,
    symbol_value: Decimal,
    /// Latest non-zero stored price among the account's matching positions.
    stored_price: Decimal,
    target_pct: Decimal,
    has_target: bool,
}

pub struct SignalService {
    account_store: Arc<dyn AccountStoreTrait>,
    position_store: Arc<dyn PositionStoreTrait>,
    target_store: Arc<dyn TargetAllocationStoreTrait>,
    task_sink: Arc<dyn TaskSinkTrait>,
    report_sink: Arc<dyn ReportSinkTrait>,
    normalizer: Arc<SymbolNormalizer>,
}

impl SignalService {
    pub fn new(
        account_store: Arc<dyn AccountStoreTrait>,
        position_store: Arc<dyn PositionStoreTrait>,
        target_store: Arc<dyn TargetAllocationStoreTrait>,
        task_sink: Arc<dyn TaskSinkTrait>,
        report_sink: Arc<dyn ReportSinkTrait>,
        normalizer: Arc<SymbolNormalizer>,
    ) -> Self {
        SignalService {
            account_store,
            position_store,
            target_store,
            task_sink,
            report_sink,
            normalizer,
        }
    }

    /// Turns one inbound signal into per-account tasks and optional reports.
    ///
    /// Always returns a summary when the signal itself is valid; per-account
    /// failures are logged and excluded from the counts, never propagated.
    pub async fn process_signal(&self, signal: &Signal) -> Result<SignalOutcome> {
        signal.validate()?;

        let key = self.normalizer.loose(&signal.symbol);
        let display_symbol = self.normalizer.canonical(&signal.symbol);
        debug!("processing {} signal for {}", signal.direction, display_symbol);

        let exposures = self.collect_exposures(&key)?;
        let mut outcome = SignalOutcome::accepted();

        // deterministic account order for stable task/report output
        let mut account_ids: Vec<&String> = exposures.keys().collect();
        account_ids.sort();

        for account_id in account_ids {
            let exposure = &exposures[account_id];
            if let Err(e) = self
                .process_account(account_id, exposure, signal, &key, &display_symbol, &mut outcome)
                .await
            {
                error!(
                    "signal processing failed for account {}: {}, continuing with remaining accounts",
                    account_id, e
                );
            }
        }

        Ok(outcome)
    }

    /// Builds the per-account exposure snapshot for one comparison key.
    fn collect_exposures(&self, key: &str) -> Result<HashMap<String, AccountExposure>> {
        let mut exposures: HashMap<String, AccountExposure> = HashMap::new();

        for position in self.position_store.all_positions()? {
            let Some(value) = position.market_value() else {
                warn!(
                    "skipping position {} ({}): negative quantity or price",
                    position.id, position.symbol
                );
                continue;
            };
            let exposure = exposures.entry(position.account.id.clone()).or_default();
            exposure.total_value += value;
            if self.normalizer.loose(&position.symbol) == key {
                exposure.symbol_value += value;
                if position.current_price > Decimal::ZERO {
                    exposure.stored_price = position.current_price;
                }
            }
        }

        for target in self.target_store.all_targets()? {
            if self.normalizer.loose(&target.ticker) != key {
                continue;
            }
            let exposure = exposures.entry(target.account.id.clone()).or_default();
            exposure.target_pct = target.target_percentage;
            exposure.has_target = true;
        }

        Ok(exposures)
    }

    async fn process_account(
        &self,
        account_id: &str,
        exposure: &AccountExposure,
        signal: &Signal,
        key: &str,
        display_symbol: &str,
        outcome: &mut SignalOutcome,
    ) -> Result<()> {
        // an empty or unvalued account has nothing to rebalance against
        if exposure.total_value <= Decimal::ZERO {
            debug!("account {} has no portfolio value, skipping", account_id);
            return Ok(());
        }

        let hundred = dec!(100);
        let holds = exposure.symbol_value > Decimal::ZERO;
        let actual_pct = exposure.symbol_value / exposure.total_value * hundred;

        let matched = match signal.direction {
            // a buy only helps an account sitting under its target; a
            // targeted-but-unheld account is underweight by definition
            SignalDirection::Buy => {
                if holds {
                    actual_pct < exposure.target_pct
                } else {
                    exposure.has_target
                }
            }
            // you cannot be overweight a symbol you do not hold
            SignalDirection::Sell => holds && actual_pct > exposure.target_pct,
        };
        if !matched {
            return Ok(());
        }

        let task_key = compute_task_key(account_id, signal.direction, key);
        if self.task_sink.find_open_by_key(&task_key)?.is_some() {
            debug!(
                "open task already covers {} {} for account {}",
                signal.direction, display_symbol, account_id
            );
            return Ok(());
        }

        let account = self.account_store.get_by_id(account_id)?;

        // size from the signal price, not the possibly stale stored price
        let target_value = exposure.target_pct / hundred * exposure.total_value;
        let action_dollar_amount = target_value - exposure.symbol_value;
        let action_shares = (action_dollar_amount.abs() / signal.price).round_dp(2);
        let variance = (actual_pct - exposure.target_pct).round_dp(2);

        let task = NewTask {
            account_id: account_id.to_string(),
            title: format!(
                "{} {} - rebalance {}",
                signal.direction, display_symbol, account.name
            ),
            description: build_description(
                &account,
                signal,
                display_symbol,
                exposure,
                actual_pct.round_dp(2),
                variance,
                action_dollar_amount,
                action_shares,
            ),
            idempotency_key: task_key,
        };
        self.task_sink.create(task).await?;
        outcome.tasks_created += 1;
        outcome
            .tasks
            .push(format!("{} - {} - {}", account.name, signal.direction, display_symbol));
        outcome.accounts.push(account.name.clone());

        // report dispatch is best-effort and never rolls back the task
        if let Some(recipient) = signal.report_recipient.as_deref() {
            match self.send_report(&account, recipient).await {
                Ok(()) => outcome.reports_sent += 1,
                Err(e) => error!(
                    "report dispatch failed for account {}: {}, task kept",
                    account_id, e
                ),
            }
        }

        Ok(())
    }

    /// Full reconciliation over the account's complete book, not just the
    /// signaled symbol, dispatched as an attachment.
    async fn send_report(&self, account: &Account, recipient: &str) -> Result<()> {
        let account_ref = account.account_ref();
        let positions = self.position_store.by_account(&account_ref)?;
        let targets = self.target_store.by_account(&account_ref)?;
        let report = reconcile(
            &positions,
            &targets,
            get_tolerances(account),
            &self.normalizer,
        );
        self.report_sink
            .send_reconciliation_report(account, &report.comparison, recipient)
            .await
    }
}

#[allow(clippy::too_many_arguments)]
fn build_description(
    account: &Account,
    signal: &Signal,
    display_symbol: &str,
    exposure: &AccountExposure,
    actual_pct: Decimal,
    variance: Decimal,
    action_dollar_amount: Decimal,
    action_shares: Decimal,
) -> String {
    let stored_price = if exposure.stored_price > Decimal::ZERO {
        format!("{}", exposure.stored_price)
    } else {
        "n/a".to_string()
    };
    let recommendation = if action_dollar_amount >= Decimal::ZERO {
        format!(
            "buy {} shares (~${})",
            action_shares,
            action_dollar_amount.round_dp(2)
        )
    } else {
        format!(
            "sell {} shares (~${})",
            action_shares,
            action_dollar_amount.abs().round_dp(2)
        )
    };

    let mut description = format!(
        "{} signal for {} at {} (stored price {}).\nAccount: {}\nCurrent {}% vs target {}% (variance {}%).\nRecommended: {}.",
        signal.direction,
        display_symbol,
        signal.price,
        stored_price,
        account.display_label(),
        actual_pct,
        exposure.target_pct,
        variance,
        recommendation,
    );
    if let Some(message) = signal.message.as_deref() {
        description.push_str("\nAlert note: ");
        description.push_str(message);
    }
    description
}
