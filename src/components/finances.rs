//! Overview screen: balance and recent transactions.

use crate::components::ComponentScope;
use crate::effects::{self, EffectStream};
use crate::feature::{Feature, FeatureError, FeatureFactory};
use crate::finance::{
    Currency, MoneyAmount, RepositoryError, Transaction, TransactionType, TransactionsRepository,
};
use std::sync::Arc;
use tokio::sync::watch;

pub const FEATURE_NAME: &str = "FinancesFeature";

/// Currency the overview balance is reported in.
pub const BALANCE_CURRENCY: Currency = Currency::USD;

pub trait FinancesComponent {
    fn state(&self) -> watch::Receiver<State>;

    fn on_deposit_clicked(&self);
    fn on_withdraw_clicked(&self);
    fn on_refresh(&self);
}

/// Navigation out of the overview, implemented by the host.
pub trait TransactionAddRouter: Send + Sync {
    fn open_transaction_add(&self, transaction_type: TransactionType);
}

#[derive(Clone, Debug, PartialEq)]
pub struct State {
    /// Sum of all transactions in [`BALANCE_CURRENCY`]
    pub money_amount: MoneyAmount,
    /// Newest first
    pub transactions_list: Vec<Transaction>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            money_amount: MoneyAmount::zero(BALANCE_CURRENCY),
            transactions_list: Vec::new(),
            is_loading: false,
            error: None,
        }
    }
}

pub struct FinancesDependencies {
    pub transactions_repository: Arc<dyn TransactionsRepository>,
    pub transaction_add_router: Arc<dyn TransactionAddRouter>,
}

#[derive(Clone, Copy, Debug)]
enum Intent {
    DepositClicked,
    WithdrawClicked,
    Refresh,
}

#[derive(Clone, Copy, Debug)]
enum Action {
    OpenTransactionAdd(TransactionType),
    LoadTransactions,
}

#[derive(Clone, Debug)]
enum Effect {
    TransactionAddRequested(TransactionType),
    LoadingStarted,
    TransactionsLoaded(Result<Vec<Transaction>, RepositoryError>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Event {
    OpenTransactionAdd(TransactionType),
}

fn intent_to_action(intent: Intent) -> Action {
    match intent {
        Intent::DepositClicked => Action::OpenTransactionAdd(TransactionType::Debit),
        Intent::WithdrawClicked => Action::OpenTransactionAdd(TransactionType::Credit),
        Intent::Refresh => Action::LoadTransactions,
    }
}

fn balance(transactions: &[Transaction]) -> MoneyAmount {
    let amount = transactions
        .iter()
        .filter(|t| t.money_amount.currency == BALANCE_CURRENCY)
        .map(|t| t.money_amount.amount)
        .sum();
    MoneyAmount {
        amount,
        currency: BALANCE_CURRENCY,
    }
}

fn reduce(state: &State, effect: &Effect) -> State {
    match effect {
        Effect::TransactionAddRequested(_) => state.clone(),
        Effect::LoadingStarted => State {
            is_loading: true,
            error: None,
            ..state.clone()
        },
        Effect::TransactionsLoaded(Ok(transactions)) => State {
            money_amount: balance(transactions),
            transactions_list: transactions.clone(),
            is_loading: false,
            error: None,
        },
        Effect::TransactionsLoaded(Err(error)) => State {
            is_loading: false,
            error: Some(error.to_string()),
            ..state.clone()
        },
    }
}

fn act(
    repository: Arc<dyn TransactionsRepository>,
    action: Action,
    state: State,
) -> EffectStream<Effect> {
    match action {
        Action::OpenTransactionAdd(transaction_type) => {
            effects::just(Effect::TransactionAddRequested(transaction_type))
        }
        Action::LoadTransactions if state.is_loading => effects::none(),
        Action::LoadTransactions => effects::flow(move |emitter| async move {
            emitter.emit(Effect::LoadingStarted);
            let result = repository.transactions().await;
            emitter.emit(Effect::TransactionsLoaded(result));
        }),
    }
}

fn publish(_action: &Action, effect: &Effect, _state: &State) -> Option<Event> {
    match effect {
        Effect::TransactionAddRequested(transaction_type) => {
            Some(Event::OpenTransactionAdd(*transaction_type))
        }
        _ => None,
    }
}

pub struct FinancesComponentImpl {
    feature: Feature<Intent, Action, Effect, State, Event>,
    _scope: ComponentScope,
}

impl FinancesComponentImpl {
    /// Create the overview and start loading transactions.
    pub fn new(
        dependencies: FinancesDependencies,
        feature_factory: &FeatureFactory,
    ) -> Result<Self, FeatureError> {
        let repository = dependencies.transactions_repository;
        let mut feature = feature_factory
            .builder::<Intent, Action, Effect, State, Event>(FEATURE_NAME)
            .initial_state(State::default())
            .intent_to_action(intent_to_action)
            .reducer(reduce)
            .actor(move |action, state| act(Arc::clone(&repository), action, state))
            .events_publisher(publish)
            .build()?;

        let mut scope = ComponentScope::new(FEATURE_NAME)?;
        if let Some(mut events) = feature.take_events() {
            let router = dependencies.transaction_add_router;
            scope.launch(async move {
                while let Some(event) = events.recv().await {
                    match event {
                        Event::OpenTransactionAdd(transaction_type) => {
                            router.open_transaction_add(transaction_type)
                        }
                    }
                }
            });
        }

        feature.accept(Intent::Refresh);
        Ok(Self {
            feature,
            _scope: scope,
        })
    }
}

impl FinancesComponent for FinancesComponentImpl {
    fn state(&self) -> watch::Receiver<State> {
        self.feature.state()
    }

    fn on_deposit_clicked(&self) {
        self.feature.accept(Intent::DepositClicked);
    }

    fn on_withdraw_clicked(&self) {
        self.feature.accept(Intent::WithdrawClicked);
    }

    fn on_refresh(&self) {
        self.feature.accept(Intent::Refresh);
    }
}
