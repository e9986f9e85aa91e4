//! Screen components.
//!
//! Every screen is a trait describing what the UI can observe and trigger,
//! plus an implementation that wraps one [`Feature`](crate::feature::Feature).
//! Implementations translate `on_*` calls into intents and forward the
//! feature's events to navigation callbacks supplied by their owner.

pub mod bank_account_opening;
pub mod finances;
mod scope;
pub mod transaction_add;

use std::sync::Arc;

pub use bank_account_opening::{
    BankAccountOpeningComponent, BankAccountOpeningComponentImpl, BankAccountOpeningDependencies,
};
pub use finances::{
    FinancesComponent, FinancesComponentImpl, FinancesDependencies, TransactionAddRouter,
};
pub use scope::ComponentScope;
pub use transaction_add::{
    TransactionAddComponent, TransactionAddComponentImpl, TransactionAddDependencies,
};

/// Navigation callback, e.g. closing the current screen.
pub type Callback = Arc<dyn Fn() + Send + Sync>;
