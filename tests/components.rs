//! Screens driven end to end against the in-memory repositories.

use monkeybusiness::components::{
    BankAccountOpeningComponent, BankAccountOpeningComponentImpl, BankAccountOpeningDependencies,
    FinancesComponent, FinancesComponentImpl, FinancesDependencies, TransactionAddComponent,
    TransactionAddComponentImpl, TransactionAddDependencies, TransactionAddRouter,
};
use monkeybusiness::feature::FeatureFactory;
use monkeybusiness::finance::{
    BankAccountsRepository, Currency, InMemoryBankAccountsRepository,
    InMemoryTransactionsRepository, MoneyAmount, RepositoryError, Transaction, TransactionType,
    TransactionsRepository,
};
use monkeybusiness::validation::{AmountError, NameError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

const WAIT: Duration = Duration::from_secs(60);

async fn settle<S: Clone>(
    state: &mut watch::Receiver<S>,
    predicate: impl FnMut(&S) -> bool,
) -> S {
    let settled = tokio::time::timeout(WAIT, state.wait_for(predicate))
        .await
        .expect("timed out waiting for state")
        .expect("feature stopped");
    (*settled).clone()
}

/// A close callback that reports every invocation on a channel.
fn close_recorder() -> (impl Fn() + Send + Sync + 'static, mpsc::UnboundedReceiver<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        move || {
            let _ = tx.send(());
        },
        rx,
    )
}

async fn closed(rx: &mut mpsc::UnboundedReceiver<()>) {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("screen was not closed")
        .expect("callback dropped");
}

struct RecordingRouter {
    opened: mpsc::UnboundedSender<TransactionType>,
}

impl TransactionAddRouter for RecordingRouter {
    fn open_transaction_add(&self, transaction_type: TransactionType) {
        let _ = self.opened.send(transaction_type);
    }
}

mod transaction_add {
    use super::*;

    fn screen(
        repository: &Arc<InMemoryTransactionsRepository>,
    ) -> (TransactionAddComponentImpl, mpsc::UnboundedReceiver<()>) {
        let (close, rx) = close_recorder();
        let component = TransactionAddComponentImpl::new(
            TransactionAddDependencies {
                transactions_repository: repository.clone(),
            },
            &FeatureFactory::new(),
            close,
        )
        .unwrap();
        (component, rx)
    }

    #[tokio::test]
    async fn valid_form_stores_transaction_and_closes() {
        let repository = Arc::new(InMemoryTransactionsRepository::new());
        let (component, mut close) = screen(&repository);

        component.on_name_text_changed("  Groceries ");
        component.on_amount_text_changed("12.5");
        component.on_transaction_type_selected(TransactionType::Credit);
        component.on_currency_selected(Currency::EUR);
        component.on_add_clicked();

        closed(&mut close).await;
        let stored = repository.transactions().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Groceries");
        assert_eq!(
            stored[0].money_amount,
            MoneyAmount {
                amount: -12.5,
                currency: Currency::EUR
            }
        );

        let state = component.state().borrow().clone();
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn empty_form_reports_every_field() {
        let repository = Arc::new(InMemoryTransactionsRepository::new());
        let (component, mut close) = screen(&repository);

        component.on_add_clicked();

        let state = settle(&mut component.state(), |s| s.name_error.is_some()).await;
        assert_eq!(state.name_error, Some(NameError::Empty));
        assert_eq!(state.amount_error, Some(AmountError::Empty));
        assert!(!state.is_loading);
        assert!(repository.transactions().await.unwrap().is_empty());
        assert!(close.try_recv().is_err());
    }

    #[tokio::test]
    async fn malformed_amount_is_incorrect() {
        let repository = Arc::new(InMemoryTransactionsRepository::new());
        let (component, _close) = screen(&repository);

        component.on_name_text_changed("Rent");
        component.on_amount_text_changed("12,50");
        component.on_add_clicked();

        let state = settle(&mut component.state(), |s| s.amount_error.is_some()).await;
        assert_eq!(state.amount_error, Some(AmountError::Incorrect));
        assert_eq!(state.name_error, None);
    }

    #[tokio::test]
    async fn repository_failure_keeps_screen_open_and_retry_succeeds() {
        let repository = Arc::new(InMemoryTransactionsRepository::new());
        repository.set_failure(Some(RepositoryError::Unavailable("offline".to_string())));
        let (component, mut close) = screen(&repository);

        component.on_name_text_changed("Coffee");
        component.on_amount_text_changed("3");
        component.on_add_clicked();

        let state = settle(&mut component.state(), |s| s.error.is_some()).await;
        assert_eq!(state.error.as_deref(), Some("Service unavailable: offline"));
        assert!(!state.is_loading);
        assert!(close.try_recv().is_err());

        repository.set_failure(None);
        component.on_add_clicked();
        closed(&mut close).await;
        assert_eq!(repository.transactions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn back_closes_immediately() {
        let repository = Arc::new(InMemoryTransactionsRepository::new());
        let (component, mut close) = screen(&repository);

        component.on_back_clicked();

        assert!(close.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_screen_cancels_pending_submission() {
        let repository =
            Arc::new(InMemoryTransactionsRepository::new().with_latency(Duration::from_secs(5)));
        let (component, mut close) = screen(&repository);

        component.on_name_text_changed("Taxi");
        component.on_amount_text_changed("20");
        component.on_add_clicked();
        settle(&mut component.state(), |s| s.is_loading).await;

        drop(component);
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(close.try_recv().is_err());
        let stored = tokio::time::timeout(WAIT, repository.transactions())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_add_while_saving_stores_once() {
        let repository =
            Arc::new(InMemoryTransactionsRepository::new().with_latency(Duration::from_secs(1)));
        let (component, mut close) = screen(&repository);

        component.on_name_text_changed("Lunch");
        component.on_amount_text_changed("9.90");
        component.on_add_clicked();
        component.on_add_clicked();
        component.on_add_clicked();

        closed(&mut close).await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(close.try_recv().is_err());
        let stored = tokio::time::timeout(WAIT, repository.transactions())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn snapshot_restores_form() {
        let repository = Arc::new(InMemoryTransactionsRepository::new());
        let (component, _close) = screen(&repository);

        component.on_name_text_changed("Books");
        component.on_currency_selected(Currency::GBP);
        settle(&mut component.state(), |s| s.selected_currency == Currency::GBP).await;

        let bytes = component.snapshot().to_bytes().unwrap();
        drop(component);

        let (close, _rx) = close_recorder();
        let restored = TransactionAddComponentImpl::restore(
            TransactionAddDependencies {
                transactions_repository: repository.clone(),
            },
            &FeatureFactory::new(),
            close,
            monkeybusiness::StateSnapshot::from_bytes(&bytes).unwrap(),
        )
        .unwrap();

        let state = restored.state().borrow().clone();
        assert_eq!(state.name_text, "Books");
        assert_eq!(state.selected_currency, Currency::GBP);
    }
}

mod bank_account_opening {
    use super::*;

    fn screen(
        repository: &Arc<InMemoryBankAccountsRepository>,
    ) -> (BankAccountOpeningComponentImpl, mpsc::UnboundedReceiver<()>) {
        let (close, rx) = close_recorder();
        let component = BankAccountOpeningComponentImpl::new(
            BankAccountOpeningDependencies {
                bank_accounts_repository: repository.clone(),
            },
            &FeatureFactory::new(),
            close,
        )
        .unwrap();
        (component, rx)
    }

    #[tokio::test]
    async fn proceed_opens_account_in_selected_currency() {
        let repository = Arc::new(InMemoryBankAccountsRepository::new());
        let (component, mut close) = screen(&repository);

        component.on_currency_selected(0);
        settle(&mut component.state(), |s| s.selected_currency.is_some()).await;
        component.on_proceed_clicked();

        closed(&mut close).await;
        let accounts = repository.accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].currency, Currency::CHF);
    }

    #[tokio::test]
    async fn rejected_opening_is_shown() {
        let repository = Arc::new(InMemoryBankAccountsRepository::new());
        repository.open_account(Currency::CHF).await.unwrap();
        let (component, mut close) = screen(&repository);

        component.on_currency_selected(0);
        component.on_proceed_clicked();

        let state = settle(&mut component.state(), |s| s.error.is_some()).await;
        assert_eq!(
            state.error.as_deref(),
            Some("Request rejected: An account in CHF is already open")
        );
        assert!(!state.is_loading);
        assert!(close.try_recv().is_err());
    }

    #[tokio::test]
    async fn search_filters_selectable_currencies() {
        let repository = Arc::new(InMemoryBankAccountsRepository::new());
        let (component, _close) = screen(&repository);

        component.on_search_clicked();
        component.on_query_changed("rub");
        component.on_currency_selected(0);

        let state = settle(&mut component.state(), |s| s.selected_currency.is_some()).await;
        assert!(state.is_search_opened);
        assert_eq!(state.visible_currencies(), vec![Currency::RUB]);
        assert_eq!(state.selected_currency, Some(Currency::RUB));
    }

    #[tokio::test]
    async fn query_typed_while_search_is_closed_is_ignored() {
        let repository = Arc::new(InMemoryBankAccountsRepository::new());
        let (component, _close) = screen(&repository);

        component.on_query_changed("eur");
        component.on_currency_selected(0);

        let state = settle(&mut component.state(), |s| s.selected_currency.is_some()).await;
        assert!(!state.is_search_opened);
        assert!(state.query.is_empty());
        assert_eq!(state.selected_currency, Some(Currency::CHF));
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_proceed_while_opening_opens_once() {
        let repository =
            Arc::new(InMemoryBankAccountsRepository::new().with_latency(Duration::from_secs(1)));
        let (component, mut close) = screen(&repository);

        component.on_currency_selected(0);
        component.on_proceed_clicked();
        component.on_proceed_clicked();
        component.on_proceed_clicked();

        closed(&mut close).await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(close.try_recv().is_err());
        assert_eq!(component.state().borrow().error, None);
        let accounts = tokio::time::timeout(WAIT, repository.accounts())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(accounts.len(), 1);
    }

    #[tokio::test]
    async fn back_closes_through_event() {
        let repository = Arc::new(InMemoryBankAccountsRepository::new());
        let (component, mut close) = screen(&repository);

        component.on_back_clicked();

        closed(&mut close).await;
        assert!(repository.accounts().await.unwrap().is_empty());
    }
}

mod finances {
    use super::*;
    use async_trait::async_trait;

    /// Slow store that counts how often transactions were loaded.
    #[derive(Default)]
    struct CountingRepository {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl TransactionsRepository for CountingRepository {
        async fn add_transaction(&self, _transaction: Transaction) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn transactions(&self) -> Result<Vec<Transaction>, RepositoryError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(Vec::new())
        }
    }

    fn screen(
        repository: &Arc<InMemoryTransactionsRepository>,
    ) -> (FinancesComponentImpl, mpsc::UnboundedReceiver<TransactionType>) {
        let (opened, rx) = mpsc::unbounded_channel();
        let component = FinancesComponentImpl::new(
            FinancesDependencies {
                transactions_repository: repository.clone(),
                transaction_add_router: Arc::new(RecordingRouter { opened }),
            },
            &FeatureFactory::new(),
        )
        .unwrap();
        (component, rx)
    }

    async fn store(repository: &InMemoryTransactionsRepository, amount: f64, currency: Currency) {
        repository
            .add_transaction(Transaction::new("t", MoneyAmount { amount, currency }))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn loads_transactions_on_creation() {
        let repository = Arc::new(InMemoryTransactionsRepository::new());
        store(&repository, 40.0, Currency::USD).await;
        store(&repository, -15.0, Currency::USD).await;
        store(&repository, 7.0, Currency::JPY).await;

        let (component, _routes) = screen(&repository);

        let state = settle(&mut component.state(), |s| s.transactions_list.len() == 3).await;
        assert_eq!(
            state.money_amount,
            MoneyAmount {
                amount: 25.0,
                currency: Currency::USD
            }
        );
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn deposit_and_withdraw_open_transaction_add() {
        let repository = Arc::new(InMemoryTransactionsRepository::new());
        let (component, mut routes) = screen(&repository);

        component.on_deposit_clicked();
        component.on_withdraw_clicked();

        let first = tokio::time::timeout(WAIT, routes.recv()).await.unwrap();
        let second = tokio::time::timeout(WAIT, routes.recv()).await.unwrap();
        assert_eq!(first, Some(TransactionType::Debit));
        assert_eq!(second, Some(TransactionType::Credit));
    }

    #[tokio::test]
    async fn refresh_recovers_from_failure() {
        let repository = Arc::new(InMemoryTransactionsRepository::new());
        repository.set_failure(Some(RepositoryError::Unavailable("maintenance".to_string())));
        let (component, _routes) = screen(&repository);

        let state = settle(&mut component.state(), |s| s.error.is_some()).await;
        assert!(state.transactions_list.is_empty());

        repository.set_failure(None);
        store(&repository, 5.0, Currency::USD).await;
        component.on_refresh();

        let state = settle(&mut component.state(), |s| s.transactions_list.len() == 1).await;
        assert_eq!(state.error, None);
        assert_eq!(state.money_amount.amount, 5.0);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_while_loading_is_ignored() {
        let repository = Arc::new(CountingRepository::default());
        let (opened, _routes) = mpsc::unbounded_channel();
        let component = FinancesComponentImpl::new(
            FinancesDependencies {
                transactions_repository: repository.clone(),
                transaction_add_router: Arc::new(RecordingRouter { opened }),
            },
            &FeatureFactory::new(),
        )
        .unwrap();

        settle(&mut component.state(), |s| s.is_loading).await;
        component.on_refresh();
        component.on_refresh();
        settle(&mut component.state(), |s| !s.is_loading).await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(repository.loads.load(Ordering::SeqCst), 1);
    }
}
