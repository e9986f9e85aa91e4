//! Screen for recording a new transaction.

use crate::components::{Callback, ComponentScope};
use crate::effects::{self, EffectStream};
use crate::feature::{Feature, FeatureError, FeatureFactory};
use crate::finance::{
    Currency, MoneyAmount, RepositoryError, Transaction, TransactionType, TransactionsRepository,
};
use crate::snapshot::StateSnapshot;
use crate::validation::{check_transaction_input, AmountError, NameError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

pub const FEATURE_NAME: &str = "TransactionAddFeature";

pub trait TransactionAddComponent {
    fn state(&self) -> watch::Receiver<State>;

    fn on_name_text_changed(&self, text: &str);
    fn on_transaction_type_selected(&self, transaction_type: TransactionType);
    fn on_amount_text_changed(&self, text: &str);
    fn on_currency_selected(&self, currency: Currency);
    fn on_back_clicked(&self);
    fn on_add_clicked(&self);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub name_text: String,
    pub name_error: Option<NameError>,
    pub selected_transaction_type: TransactionType,
    pub amount_text: String,
    pub amount_error: Option<AmountError>,
    pub selected_currency: Currency,
    pub is_loading: bool,
    /// Message of the last failed submission
    pub error: Option<String>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            name_text: String::new(),
            name_error: None,
            selected_transaction_type: TransactionType::default(),
            amount_text: String::new(),
            amount_error: None,
            selected_currency: Currency::USD,
            is_loading: false,
            error: None,
        }
    }
}

pub struct TransactionAddDependencies {
    pub transactions_repository: Arc<dyn TransactionsRepository>,
}

#[derive(Clone, Debug)]
enum Intent {
    ChangeNameText(String),
    SelectTransactionType(TransactionType),
    ChangeMoneyAmountText(String),
    SelectCurrency(Currency),
    AddTransaction,
}

#[derive(Clone, Debug)]
enum Effect {
    NameTextChanged(String),
    TransactionTypeSelected(TransactionType),
    MoneyAmountTextChanged(String),
    CurrencySelected(Currency),
    ReceivedInputError {
        name_error: Option<NameError>,
        amount_error: Option<AmountError>,
    },
    AddingStarted,
    AddingFinished(Result<(), RepositoryError>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Event {
    AddingFinishedSuccessfully,
}

fn reduce(state: &State, effect: &Effect) -> State {
    match effect {
        Effect::CurrencySelected(currency) => State {
            selected_currency: *currency,
            error: None,
            ..state.clone()
        },
        Effect::MoneyAmountTextChanged(text) => State {
            amount_text: text.clone(),
            amount_error: None,
            error: None,
            ..state.clone()
        },
        Effect::NameTextChanged(text) => State {
            name_text: text.clone(),
            name_error: None,
            error: None,
            ..state.clone()
        },
        Effect::TransactionTypeSelected(transaction_type) => State {
            selected_transaction_type: *transaction_type,
            error: None,
            ..state.clone()
        },
        Effect::AddingStarted => State {
            is_loading: true,
            error: None,
            ..state.clone()
        },
        Effect::AddingFinished(result) => State {
            is_loading: false,
            error: result.as_ref().err().map(ToString::to_string),
            ..state.clone()
        },
        Effect::ReceivedInputError {
            name_error,
            amount_error,
        } => State {
            name_error: *name_error,
            amount_error: *amount_error,
            ..state.clone()
        },
    }
}

fn act(
    repository: Arc<dyn TransactionsRepository>,
    action: Intent,
    state: State,
) -> EffectStream<Effect> {
    match action {
        Intent::ChangeMoneyAmountText(text) => effects::just(Effect::MoneyAmountTextChanged(text)),
        Intent::ChangeNameText(text) => effects::just(Effect::NameTextChanged(text)),
        Intent::SelectCurrency(currency) => effects::just(Effect::CurrencySelected(currency)),
        Intent::SelectTransactionType(transaction_type) => {
            effects::just(Effect::TransactionTypeSelected(transaction_type))
        }
        Intent::AddTransaction if state.is_loading => effects::none(),
        Intent::AddTransaction => effects::flow(move |emitter| async move {
            let input = match check_transaction_input(&state.name_text, &state.amount_text) {
                Ok(input) => input,
                Err(errors) => {
                    emitter.emit(Effect::ReceivedInputError {
                        name_error: errors.name,
                        amount_error: errors.amount,
                    });
                    return;
                }
            };

            emitter.emit(Effect::AddingStarted);
            let transaction = Transaction::new(
                input.name,
                MoneyAmount {
                    amount: state.selected_transaction_type.signed(input.amount),
                    currency: state.selected_currency,
                },
            );
            let result = repository.add_transaction(transaction).await;
            if let Err(error) = &result {
                tracing::warn!(%error, "Failed to add transaction");
            }
            emitter.emit(Effect::AddingFinished(result));
        }),
    }
}

fn publish(_action: &Intent, effect: &Effect, _state: &State) -> Option<Event> {
    match effect {
        Effect::AddingFinished(Ok(())) => Some(Event::AddingFinishedSuccessfully),
        _ => None,
    }
}

pub struct TransactionAddComponentImpl {
    feature: Feature<Intent, Intent, Effect, State, Event>,
    close_transaction_add: Callback,
    // Declared last so the feature is gone before its collector is aborted.
    _scope: ComponentScope,
}

impl TransactionAddComponentImpl {
    pub fn new<F>(
        dependencies: TransactionAddDependencies,
        feature_factory: &FeatureFactory,
        close_transaction_add: F,
    ) -> Result<Self, FeatureError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::build(dependencies, feature_factory, Arc::new(close_transaction_add), None)
    }

    /// Rebuild the screen from state saved with [`Self::snapshot`].
    pub fn restore<F>(
        dependencies: TransactionAddDependencies,
        feature_factory: &FeatureFactory,
        close_transaction_add: F,
        snapshot: StateSnapshot<State>,
    ) -> Result<Self, FeatureError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let snapshot = StateSnapshot {
            state: State {
                is_loading: false,
                ..snapshot.state
            },
            ..snapshot
        };
        Self::build(
            dependencies,
            feature_factory,
            Arc::new(close_transaction_add),
            Some(snapshot),
        )
    }

    fn build(
        dependencies: TransactionAddDependencies,
        feature_factory: &FeatureFactory,
        close_transaction_add: Callback,
        snapshot: Option<StateSnapshot<State>>,
    ) -> Result<Self, FeatureError> {
        let repository = dependencies.transactions_repository;
        let mut builder = feature_factory
            .builder::<Intent, Intent, Effect, State, Event>(FEATURE_NAME)
            .initial_state(State::default())
            .identity_actions()
            .reducer(reduce)
            .actor(move |action, state| act(Arc::clone(&repository), action, state))
            .events_publisher(publish);
        if let Some(snapshot) = snapshot {
            builder = builder.restore(snapshot);
        }
        let mut feature = builder.build()?;

        let mut scope = ComponentScope::new(FEATURE_NAME)?;
        if let Some(mut events) = feature.take_events() {
            let close = Arc::clone(&close_transaction_add);
            scope.launch(async move {
                while let Some(event) = events.recv().await {
                    match event {
                        Event::AddingFinishedSuccessfully => close(),
                    }
                }
            });
        }

        Ok(Self {
            feature,
            close_transaction_add,
            _scope: scope,
        })
    }

    /// Save the form so it survives the screen being recreated.
    pub fn snapshot(&self) -> StateSnapshot<State> {
        self.feature.snapshot()
    }
}

impl TransactionAddComponent for TransactionAddComponentImpl {
    fn state(&self) -> watch::Receiver<State> {
        self.feature.state()
    }

    fn on_name_text_changed(&self, text: &str) {
        self.feature.accept(Intent::ChangeNameText(text.to_string()));
    }

    fn on_transaction_type_selected(&self, transaction_type: TransactionType) {
        self.feature.accept(Intent::SelectTransactionType(transaction_type));
    }

    fn on_amount_text_changed(&self, text: &str) {
        self.feature.accept(Intent::ChangeMoneyAmountText(text.to_string()));
    }

    fn on_currency_selected(&self, currency: Currency) {
        self.feature.accept(Intent::SelectCurrency(currency));
    }

    fn on_back_clicked(&self) {
        (self.close_transaction_add)();
    }

    fn on_add_clicked(&self) {
        self.feature.accept(Intent::AddTransaction);
    }
}
