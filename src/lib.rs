//! MonkeyBusiness: the MVI feature runtime behind a personal-finance app
//!
//! Every screen of the app is driven by a [`Feature`](feature::Feature), a
//! small unidirectional state machine:
//!
//! - **Intent**: what the user asked for
//! - **Action**: the intent normalized for the actor
//! - **Effect**: what the actor observed while carrying the action out
//! - **State**: the single source of UI truth, a pure fold over effects
//! - **Event**: one-shot signals such as "close this screen"
//!
//! The reducer is pure; all asynchronous work lives in actors, whose
//! failures come back as effects carrying a `Result`. Screens wrap one
//! feature each in a component (see [`components`]).
//!
//! # Example
//!
//! ```rust
//! use monkeybusiness::components::{
//!     TransactionAddComponent, TransactionAddComponentImpl, TransactionAddDependencies,
//! };
//! use monkeybusiness::feature::FeatureFactory;
//! use monkeybusiness::finance::InMemoryTransactionsRepository;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let component = TransactionAddComponentImpl::new(
//!     TransactionAddDependencies {
//!         transactions_repository: Arc::new(InMemoryTransactionsRepository::new()),
//!     },
//!     &FeatureFactory::new(),
//!     || println!("closing"),
//! )
//! .unwrap();
//!
//! component.on_name_text_changed("Coffee");
//! let mut state = component.state();
//! let name = state.wait_for(|s| !s.name_text.is_empty()).await.unwrap().name_text.clone();
//! assert_eq!(name, "Coffee");
//! # });
//! ```

pub mod builder;
pub mod components;
pub mod core;
pub mod effects;
pub mod feature;
pub mod finance;
pub mod snapshot;
pub mod validation;

// Re-export commonly used types
pub use feature::{Feature, FeatureConfig, FeatureError, FeatureFactory};
pub use snapshot::StateSnapshot;
