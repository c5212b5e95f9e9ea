//! Tests for the signal-driven task generator.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, RwLock};

    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDateTime, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::accounts::{Account, AccountKind, AccountRef, AccountStoreTrait, RiskAllocation};
    use crate::allocations::{TargetAllocation, TargetAllocationStoreTrait};
    use crate::errors::{Error, Result};
    use crate::positions::{Position, PositionStoreTrait};
    use crate::reconciliation::ReconciliationRow;
    use crate::signals::{Signal, SignalDirection, SignalService};
    use crate::symbols::SymbolNormalizer;
    use crate::tasks::{NewTask, ReportSinkTrait, Task, TaskSinkTrait, TaskStatus};

    // ============== Mock Stores ==============

    struct MockAccountStore {
        accounts: Vec<Account>,
    }

    impl AccountStoreTrait for MockAccountStore {
        fn get_by_id(&self, account_id: &str) -> Result<Account> {
            self.accounts
                .iter()
                .find(|a| a.id == account_id)
                .cloned()
                .ok_or_else(|| Error::Account(format!("account {} not found", account_id)))
        }

        fn list_active(&self) -> Result<Vec<Account>> {
            Ok(self.accounts.clone())
        }

        fn risk_allocation(&self, _: &str) -> Result<RiskAllocation> {
            unimplemented!()
        }
    }

    struct MockPositionStore {
        positions: Vec<Position>,
    }

    #[async_trait]
    impl PositionStoreTrait for MockPositionStore {
        fn by_account(&self, account: &AccountRef) -> Result<Vec<Position>> {
            Ok(self
                .positions
                .iter()
                .filter(|p| p.account.id == account.id)
                .cloned()
                .collect())
        }

        fn all_positions(&self) -> Result<Vec<Position>> {
            Ok(self.positions.clone())
        }

        async fn update_current_price(&self, _: &str, _: Decimal) -> Result<()> {
            unimplemented!()
        }
    }

    struct MockTargetStore {
        targets: Vec<TargetAllocation>,
    }

    impl TargetAllocationStoreTrait for MockTargetStore {
        fn by_account(&self, account: &AccountRef) -> Result<Vec<TargetAllocation>> {
            Ok(self
                .targets
                .iter()
                .filter(|t| t.account.id == account.id)
                .cloned()
                .collect())
        }

        fn all_targets(&self) -> Result<Vec<TargetAllocation>> {
            Ok(self.targets.clone())
        }
    }

    struct MockTaskSink {
        tasks: RwLock<Vec<Task>>,
        fail_for_account: Option<String>,
    }

    impl MockTaskSink {
        fn new() -> Self {
            MockTaskSink {
                tasks: RwLock::new(Vec::new()),
                fail_for_account: None,
            }
        }

        fn failing_for(account_id: &str) -> Self {
            MockTaskSink {
                tasks: RwLock::new(Vec::new()),
                fail_for_account: Some(account_id.to_string()),
            }
        }

        fn created(&self) -> Vec<Task> {
            self.tasks.read().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskSinkTrait for MockTaskSink {
        fn find_open_by_key(&self, idempotency_key: &str) -> Result<Option<Task>> {
            Ok(self
                .tasks
                .read()
                .unwrap()
                .iter()
                .find(|t| t.idempotency_key == idempotency_key && t.status == TaskStatus::Open)
                .cloned())
        }

        async fn create(&self, new_task: NewTask) -> Result<Task> {
            if self.fail_for_account.as_deref() == Some(new_task.account_id.as_str()) {
                return Err(Error::TaskSink("sink unavailable".to_string()));
            }
            let task = Task {
                id: uuid::Uuid::new_v4().to_string(),
                account_id: new_task.account_id,
                title: new_task.title,
                description: new_task.description,
                status: TaskStatus::Open,
                idempotency_key: new_task.idempotency_key,
                created_at: DateTime::<Utc>::default(),
            };
            self.tasks.write().unwrap().push(task.clone());
            Ok(task)
        }
    }

    struct MockReportSink {
        sent: RwLock<Vec<(String, String)>>,
        fail: bool,
    }

    impl MockReportSink {
        fn new() -> Self {
            MockReportSink {
                sent: RwLock::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            MockReportSink {
                sent: RwLock::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl ReportSinkTrait for MockReportSink {
        async fn send_reconciliation_report(
            &self,
            account: &Account,
            _rows: &[ReconciliationRow],
            recipient: &str,
        ) -> Result<()> {
            if self.fail {
                return Err(Error::ReportDispatch("smtp down".to_string()));
            }
            self.sent
                .write()
                .unwrap()
                .push((account.id.clone(), recipient.to_string()));
            Ok(())
        }
    }

    // ============== Helper Functions ==============

    fn account(id: &str, name: &str) -> Account {
        Account {
            id: id.to_string(),
            name: name.to_string(),
            kind: AccountKind::Individual,
            household: None,
            owner_name: None,
            currency: "USD".to_string(),
            is_active: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
            meta: None,
        }
    }

    fn account_ref(id: &str) -> AccountRef {
        AccountRef {
            id: id.to_string(),
            kind: AccountKind::Individual,
        }
    }

    fn position(account_id: &str, symbol: &str, quantity: Decimal, price: Decimal) -> Position {
        Position {
            id: format!("pos-{}-{}", account_id, symbol),
            account: account_ref(account_id),
            symbol: symbol.to_string(),
            quantity,
            entry_price: price,
            current_price: price,
        }
    }

    fn target(account_id: &str, ticker: &str, pct: Decimal) -> TargetAllocation {
        TargetAllocation {
            id: format!("tgt-{}-{}", account_id, ticker),
            account: account_ref(account_id),
            ticker: ticker.to_string(),
            name: None,
            holding_price: None,
            target_percentage: pct,
        }
    }

    fn signal(symbol: &str, direction: SignalDirection) -> Signal {
        Signal {
            symbol: symbol.to_string(),
            direction,
            price: dec!(50),
            timestamp: DateTime::<Utc>::default(),
            message: None,
            report_recipient: None,
        }
    }

    fn make_service(
        accounts: Vec<Account>,
        positions: Vec<Position>,
        targets: Vec<TargetAllocation>,
        task_sink: Arc<MockTaskSink>,
        report_sink: Arc<MockReportSink>,
    ) -> SignalService {
        SignalService::new(
            Arc::new(MockAccountStore { accounts }),
            Arc::new(MockPositionStore { positions }),
            Arc::new(MockTargetStore { targets }),
            task_sink,
            report_sink,
            Arc::new(SymbolNormalizer::default()),
        )
    }

    /// Account X underweight MSFT (10% vs 20%), account Y overweight
    /// (30% vs 20%). Both hold 1000 total.
    fn two_account_fixture() -> (Vec<Account>, Vec<Position>, Vec<TargetAllocation>) {
        let accounts = vec![account("acc-x", "Account X"), account("acc-y", "Account Y")];
        let positions = vec![
            position("acc-x", "MSFT", dec!(1), dec!(100)),
            position("acc-x", "VTI", dec!(9), dec!(100)),
            position("acc-y", "MSFT", dec!(3), dec!(100)),
            position("acc-y", "VTI", dec!(7), dec!(100)),
        ];
        let targets = vec![
            target("acc-x", "MSFT", dec!(20)),
            target("acc-y", "MSFT", dec!(20)),
        ];
        (accounts, positions, targets)
    }

    // ============== Matching rules ==============

    #[tokio::test]
    async fn test_buy_signal_matches_only_underweight_accounts() {
        let (accounts, positions, targets) = two_account_fixture();
        let task_sink = Arc::new(MockTaskSink::new());
        let service = make_service(
            accounts,
            positions,
            targets,
            task_sink.clone(),
            Arc::new(MockReportSink::new()),
        );

        let outcome = service
            .process_signal(&signal("MSFT", SignalDirection::Buy))
            .await
            .unwrap();

        assert!(outcome.accepted);
        assert_eq!(outcome.tasks_created, 1);
        assert_eq!(outcome.tasks, vec!["Account X - BUY - MSFT".to_string()]);
        assert_eq!(outcome.accounts, vec!["Account X".to_string()]);

        let created = task_sink.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].account_id, "acc-x");
        assert!(created[0].title.contains("BUY MSFT"));
    }

    #[tokio::test]
    async fn test_sell_signal_matches_only_overweight_accounts() {
        let (accounts, positions, targets) = two_account_fixture();
        let task_sink = Arc::new(MockTaskSink::new());
        let service = make_service(
            accounts,
            positions,
            targets,
            task_sink.clone(),
            Arc::new(MockReportSink::new()),
        );

        let outcome = service
            .process_signal(&signal("MSFT", SignalDirection::Sell))
            .await
            .unwrap();

        assert_eq!(outcome.tasks_created, 1);
        assert_eq!(outcome.tasks, vec!["Account Y - SELL - MSFT".to_string()]);
        assert_eq!(task_sink.created()[0].account_id, "acc-y");
    }

    #[tokio::test]
    async fn test_buy_matches_targeted_but_unheld_accounts() {
        // the account targets MSFT, holds none of it, but has a funded book
        let accounts = vec![account("acc-x", "Account X")];
        let positions = vec![position("acc-x", "VTI", dec!(10), dec!(100))];
        let targets = vec![target("acc-x", "MSFT", dec!(25))];
        let task_sink = Arc::new(MockTaskSink::new());
        let service = make_service(
            accounts.clone(),
            positions.clone(),
            targets.clone(),
            task_sink.clone(),
            Arc::new(MockReportSink::new()),
        );

        let buy = service
            .process_signal(&signal("MSFT", SignalDirection::Buy))
            .await
            .unwrap();
        assert_eq!(buy.tasks_created, 1);
        // target 25% of 1000 at signal price 50: buy 5 shares
        assert!(task_sink.created()[0].description.contains("buy 5 shares"));

        // a sell signal cannot apply to an unheld symbol
        let sink2 = Arc::new(MockTaskSink::new());
        let service2 = make_service(
            accounts,
            positions,
            targets,
            sink2.clone(),
            Arc::new(MockReportSink::new()),
        );
        let sell = service2
            .process_signal(&signal("MSFT", SignalDirection::Sell))
            .await
            .unwrap();
        assert_eq!(sell.tasks_created, 0);
        assert!(sink2.created().is_empty());
    }

    #[tokio::test]
    async fn test_unfunded_account_is_skipped() {
        // targeted but the account holds nothing at all
        let accounts = vec![account("acc-x", "Account X")];
        let targets = vec![target("acc-x", "MSFT", dec!(25))];
        let task_sink = Arc::new(MockTaskSink::new());
        let service = make_service(
            accounts,
            vec![],
            targets,
            task_sink.clone(),
            Arc::new(MockReportSink::new()),
        );

        let outcome = service
            .process_signal(&signal("MSFT", SignalDirection::Buy))
            .await
            .unwrap();

        assert!(outcome.accepted);
        assert_eq!(outcome.tasks_created, 0);
    }

    #[tokio::test]
    async fn test_symbol_spellings_normalize_before_matching() {
        // held as BTC-USD, signaled as btcusd
        let accounts = vec![account("acc-x", "Account X")];
        let positions = vec![
            position("acc-x", "BTC-USD", dec!(0.01), dec!(40000)),
            position("acc-x", "CASH", dec!(600), dec!(1)),
        ];
        let targets = vec![target("acc-x", "BTC-USD", dec!(50))];
        let task_sink = Arc::new(MockTaskSink::new());
        let service = make_service(
            accounts,
            positions,
            targets,
            task_sink.clone(),
            Arc::new(MockReportSink::new()),
        );

        let outcome = service
            .process_signal(&signal("btcusd", SignalDirection::Buy))
            .await
            .unwrap();

        // 400 of 1000 total is 40%, under the 50% target
        assert_eq!(outcome.tasks_created, 1);
        assert_eq!(outcome.tasks, vec!["Account X - BUY - BTC-USD".to_string()]);
    }

    // ============== Idempotency ==============

    #[tokio::test]
    async fn test_reprocessing_the_same_signal_creates_nothing() {
        let (accounts, positions, targets) = two_account_fixture();
        let task_sink = Arc::new(MockTaskSink::new());
        let service = make_service(
            accounts,
            positions,
            targets,
            task_sink.clone(),
            Arc::new(MockReportSink::new()),
        );

        let first = service
            .process_signal(&signal("MSFT", SignalDirection::Buy))
            .await
            .unwrap();
        let second = service
            .process_signal(&signal("MSFT", SignalDirection::Buy))
            .await
            .unwrap();

        assert_eq!(first.tasks_created, 1);
        assert_eq!(second.tasks_created, 0);
        assert!(second.accepted);
        assert_eq!(task_sink.created().len(), 1);
    }

    #[tokio::test]
    async fn test_opposite_direction_is_a_distinct_task() {
        // underweight on BUY, and a spelling variant still dedups
        let (accounts, positions, targets) = two_account_fixture();
        let task_sink = Arc::new(MockTaskSink::new());
        let service = make_service(
            accounts,
            positions,
            targets,
            task_sink.clone(),
            Arc::new(MockReportSink::new()),
        );

        service
            .process_signal(&signal("MSFT", SignalDirection::Buy))
            .await
            .unwrap();
        let variant = service
            .process_signal(&signal("msft", SignalDirection::Buy))
            .await
            .unwrap();
        let sell = service
            .process_signal(&signal("MSFT", SignalDirection::Sell))
            .await
            .unwrap();

        assert_eq!(variant.tasks_created, 0);
        // the sell matches account Y, a different (account, direction) tuple
        assert_eq!(sell.tasks_created, 1);
        assert_eq!(task_sink.created().len(), 2);
    }

    // ============== Reports ==============

    #[tokio::test]
    async fn test_report_sent_per_matched_account() {
        let (accounts, positions, targets) = two_account_fixture();
        let report_sink = Arc::new(MockReportSink::new());
        let service = make_service(
            accounts,
            positions,
            targets,
            Arc::new(MockTaskSink::new()),
            report_sink.clone(),
        );

        let mut sig = signal("MSFT", SignalDirection::Buy);
        sig.report_recipient = Some("advisor@example.com".to_string());
        let outcome = service.process_signal(&sig).await.unwrap();

        assert_eq!(outcome.tasks_created, 1);
        assert_eq!(outcome.reports_sent, 1);
        let sent = report_sink.sent.read().unwrap().clone();
        assert_eq!(sent, vec![("acc-x".to_string(), "advisor@example.com".to_string())]);
    }

    #[tokio::test]
    async fn test_report_failure_keeps_the_task() {
        let (accounts, positions, targets) = two_account_fixture();
        let task_sink = Arc::new(MockTaskSink::new());
        let service = make_service(
            accounts,
            positions,
            targets,
            task_sink.clone(),
            Arc::new(MockReportSink::failing()),
        );

        let mut sig = signal("MSFT", SignalDirection::Buy);
        sig.report_recipient = Some("advisor@example.com".to_string());
        let outcome = service.process_signal(&sig).await.unwrap();

        assert_eq!(outcome.tasks_created, 1);
        assert_eq!(outcome.reports_sent, 0);
        assert_eq!(task_sink.created().len(), 1);
    }

    // ============== Failure isolation ==============

    #[tokio::test]
    async fn test_one_failing_account_does_not_abort_the_batch() {
        // both accounts underweight; the sink rejects acc-a's task
        let accounts = vec![account("acc-a", "Account A"), account("acc-b", "Account B")];
        let positions = vec![
            position("acc-a", "MSFT", dec!(1), dec!(100)),
            position("acc-a", "VTI", dec!(9), dec!(100)),
            position("acc-b", "MSFT", dec!(1), dec!(100)),
            position("acc-b", "VTI", dec!(9), dec!(100)),
        ];
        let targets = vec![
            target("acc-a", "MSFT", dec!(20)),
            target("acc-b", "MSFT", dec!(20)),
        ];
        let task_sink = Arc::new(MockTaskSink::failing_for("acc-a"));
        let service = make_service(
            accounts,
            positions,
            targets,
            task_sink.clone(),
            Arc::new(MockReportSink::new()),
        );

        let outcome = service
            .process_signal(&signal("MSFT", SignalDirection::Buy))
            .await
            .unwrap();

        assert!(outcome.accepted);
        assert_eq!(outcome.tasks_created, 1);
        assert_eq!(outcome.accounts, vec!["Account B".to_string()]);
        assert_eq!(task_sink.created().len(), 1);
    }

    // ============== Input validation ==============

    #[tokio::test]
    async fn test_malformed_signals_are_rejected_upfront() {
        let task_sink = Arc::new(MockTaskSink::new());
        let service = make_service(
            vec![],
            vec![],
            vec![],
            task_sink.clone(),
            Arc::new(MockReportSink::new()),
        );

        let mut empty_symbol = signal("  ", SignalDirection::Buy);
        assert!(service.process_signal(&empty_symbol).await.is_err());

        empty_symbol = signal("MSFT", SignalDirection::Buy);
        empty_symbol.price = dec!(0);
        assert!(service.process_signal(&empty_symbol).await.is_err());

        assert!(task_sink.created().is_empty());
    }

    // ============== Task content ==============

    #[tokio::test]
    async fn test_task_sizing_uses_the_signal_price() {
        // stored price 100, signal price 50: 100 dollars short buys 2 shares
        let (accounts, positions, targets) = two_account_fixture();
        let task_sink = Arc::new(MockTaskSink::new());
        let service = make_service(
            accounts,
            positions,
            targets,
            task_sink.clone(),
            Arc::new(MockReportSink::new()),
        );

        service
            .process_signal(&signal("MSFT", SignalDirection::Buy))
            .await
            .unwrap();

        let description = &task_sink.created()[0].description;
        assert!(description.contains("at 50"), "{}", description);
        assert!(description.contains("stored price 100"), "{}", description);
        assert!(description.contains("buy 2 shares"), "{}", description);
        assert!(description.contains("Current 10% vs target 20%"), "{}", description);
        assert!(description.contains("variance -10%"), "{}", description);
    }
}
