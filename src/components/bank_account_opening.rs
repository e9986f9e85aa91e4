//! Screen for opening a bank account in a chosen currency.

use crate::components::{Callback, ComponentScope};
use crate::effects::{self, EffectStream};
use crate::feature::{Feature, FeatureError, FeatureFactory};
use crate::finance::{BankAccount, BankAccountsRepository, Currency, RepositoryError};
use crate::snapshot::StateSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

pub const FEATURE_NAME: &str = "Bank Account Opening";

pub trait BankAccountOpeningComponent {
    fn state(&self) -> watch::Receiver<State>;

    /// Select the currency at `index` in [`State::visible_currencies`].
    /// Selecting the selected currency again clears the selection.
    fn on_currency_selected(&self, index: usize);
    fn on_back_clicked(&self);
    fn on_proceed_clicked(&self);
    fn on_search_clicked(&self);
    fn on_query_changed(&self, query: &str);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub currency_list: Vec<Currency>,
    pub selected_currency: Option<Currency>,
    pub query: String,
    pub is_loading: bool,
    pub is_search_opened: bool,
    pub error: Option<String>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            currency_list: Currency::sorted_by_code(),
            selected_currency: None,
            query: String::new(),
            is_loading: false,
            is_search_opened: false,
            error: None,
        }
    }
}

impl State {
    /// Currencies whose code contains the query, ignoring case.
    pub fn visible_currencies(&self) -> Vec<Currency> {
        let query = self.query.trim().to_uppercase();
        self.currency_list
            .iter()
            .copied()
            .filter(|currency| currency.code().contains(&query))
            .collect()
    }
}

pub struct BankAccountOpeningDependencies {
    pub bank_accounts_repository: Arc<dyn BankAccountsRepository>,
}

#[derive(Clone, Debug)]
enum Intent {
    SelectCurrency(usize),
    Proceed,
    GoBack,
    ToggleSearch,
    ChangeQuery(String),
}

#[derive(Clone, Debug)]
enum Effect {
    CurrencySelected(usize),
    ScreenClosed,
    SearchToggled,
    QueryChanged(String),
    OpeningStarted,
    OpeningFinished(Result<BankAccount, RepositoryError>),
}

#[derive(Clone, Debug, PartialEq)]
enum Event {
    CloseScreen,
    AccountOpened(BankAccount),
}

fn reduce(state: &State, effect: &Effect) -> State {
    match effect {
        Effect::CurrencySelected(index) => match state.visible_currencies().get(*index) {
            Some(&to_select) => State {
                selected_currency: (state.selected_currency != Some(to_select))
                    .then_some(to_select),
                ..state.clone()
            },
            None => state.clone(),
        },
        Effect::ScreenClosed => state.clone(),
        Effect::SearchToggled => {
            let is_search_opened = !state.is_search_opened;
            State {
                is_search_opened,
                query: if is_search_opened {
                    state.query.clone()
                } else {
                    String::new()
                },
                ..state.clone()
            }
        }
        Effect::QueryChanged(query) => {
            let next = State {
                query: query.clone(),
                ..state.clone()
            };
            // A selection hidden by the query must not be proceeded with.
            let selected_currency = next
                .selected_currency
                .filter(|currency| next.visible_currencies().contains(currency));
            State {
                selected_currency,
                ..next
            }
        }
        Effect::OpeningStarted => State {
            is_loading: true,
            error: None,
            ..state.clone()
        },
        Effect::OpeningFinished(result) => State {
            is_loading: false,
            error: result.as_ref().err().map(ToString::to_string),
            ..state.clone()
        },
    }
}

fn act(
    repository: Arc<dyn BankAccountsRepository>,
    action: Intent,
    state: State,
) -> EffectStream<Effect> {
    match action {
        Intent::SelectCurrency(index) => {
            if index >= state.visible_currencies().len() {
                tracing::warn!(index, "Ignoring selection outside the currency list");
                return effects::none();
            }
            effects::just(Effect::CurrencySelected(index))
        }
        Intent::GoBack => effects::just(Effect::ScreenClosed),
        Intent::ToggleSearch => effects::just(Effect::SearchToggled),
        Intent::ChangeQuery(_) if !state.is_search_opened => effects::none(),
        Intent::ChangeQuery(query) => effects::just(Effect::QueryChanged(query)),
        Intent::Proceed => match state.selected_currency {
            Some(currency) if !state.is_loading => effects::flow(move |emitter| async move {
                emitter.emit(Effect::OpeningStarted);
                let result = repository.open_account(currency).await;
                if let Err(error) = &result {
                    tracing::warn!(%error, %currency, "Failed to open bank account");
                }
                emitter.emit(Effect::OpeningFinished(result));
            }),
            _ => effects::none(),
        },
    }
}

fn publish(_action: &Intent, effect: &Effect, _state: &State) -> Option<Event> {
    match effect {
        Effect::ScreenClosed => Some(Event::CloseScreen),
        Effect::OpeningFinished(Ok(account)) => Some(Event::AccountOpened(account.clone())),
        _ => None,
    }
}

pub struct BankAccountOpeningComponentImpl {
    feature: Feature<Intent, Intent, Effect, State, Event>,
    _scope: ComponentScope,
}

impl BankAccountOpeningComponentImpl {
    pub fn new<F>(
        dependencies: BankAccountOpeningDependencies,
        feature_factory: &FeatureFactory,
        close_component: F,
    ) -> Result<Self, FeatureError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::build(dependencies, feature_factory, Arc::new(close_component), None)
    }

    /// Rebuild the screen from state saved with [`Self::snapshot`].
    pub fn restore<F>(
        dependencies: BankAccountOpeningDependencies,
        feature_factory: &FeatureFactory,
        close_component: F,
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
            Arc::new(close_component),
            Some(snapshot),
        )
    }

    fn build(
        dependencies: BankAccountOpeningDependencies,
        feature_factory: &FeatureFactory,
        close_component: Callback,
        snapshot: Option<StateSnapshot<State>>,
    ) -> Result<Self, FeatureError> {
        let repository = dependencies.bank_accounts_repository;
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
            scope.launch(async move {
                while let Some(event) = events.recv().await {
                    match event {
                        Event::CloseScreen => close_component(),
                        Event::AccountOpened(account) => {
                            tracing::info!(id = %account.id, currency = %account.currency, "Bank account opened");
                            close_component();
                        }
                    }
                }
            });
        }

        Ok(Self {
            feature,
            _scope: scope,
        })
    }

    pub fn snapshot(&self) -> StateSnapshot<State> {
        self.feature.snapshot()
    }
}

impl BankAccountOpeningComponent for BankAccountOpeningComponentImpl {
    fn state(&self) -> watch::Receiver<State> {
        self.feature.state()
    }

    fn on_currency_selected(&self, index: usize) {
        self.feature.accept(Intent::SelectCurrency(index));
    }

    fn on_back_clicked(&self) {
        self.feature.accept(Intent::GoBack);
    }

    fn on_proceed_clicked(&self) {
        self.feature.accept(Intent::Proceed);
    }

    fn on_search_clicked(&self) {
        self.feature.accept(Intent::ToggleSearch);
    }

    fn on_query_changed(&self, query: &str) {
        self.feature.accept(Intent::ChangeQuery(query.to_string()));
    }
}
