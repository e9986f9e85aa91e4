//! Storage seams for transactions and bank accounts.

use crate::finance::models::{BankAccount, Currency, Transaction};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum RepositoryError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait TransactionsRepository: Send + Sync {
    async fn add_transaction(&self, transaction: Transaction) -> Result<(), RepositoryError>;

    /// All stored transactions, newest first.
    async fn transactions(&self) -> Result<Vec<Transaction>, RepositoryError>;
}

#[async_trait]
pub trait BankAccountsRepository: Send + Sync {
    async fn open_account(&self, currency: Currency) -> Result<BankAccount, RepositoryError>;

    async fn accounts(&self) -> Result<Vec<BankAccount>, RepositoryError>;
}

/// Failure injection and simulated latency shared by the in-memory stores.
#[derive(Debug, Default)]
struct Conditions {
    failure: Mutex<Option<RepositoryError>>,
    latency: Option<Duration>,
}

impl Conditions {
    async fn check(&self) -> Result<(), RepositoryError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let failure = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn set_failure(&self, failure: Option<RepositoryError>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = failure;
    }
}

/// Process-local transaction store.
#[derive(Debug, Default)]
pub struct InMemoryTransactionsRepository {
    transactions: RwLock<Vec<Transaction>>,
    conditions: Conditions,
}

impl InMemoryTransactionsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency`, like a slow network would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.conditions.latency = Some(latency);
        self
    }

    /// Make every following call fail with `error` until cleared with `None`.
    pub fn set_failure(&self, error: Option<RepositoryError>) {
        self.conditions.set_failure(error);
    }
}

#[async_trait]
impl TransactionsRepository for InMemoryTransactionsRepository {
    async fn add_transaction(&self, transaction: Transaction) -> Result<(), RepositoryError> {
        self.conditions.check().await?;
        let mut transactions = self.transactions.write().await;
        if transactions.iter().any(|t| t.id == transaction.id) {
            return Err(RepositoryError::Rejected(format!(
                "Transaction {} already exists",
                transaction.id
            )));
        }
        tracing::debug!(id = %transaction.id, "Stored transaction");
        transactions.push(transaction);
        Ok(())
    }

    async fn transactions(&self) -> Result<Vec<Transaction>, RepositoryError> {
        self.conditions.check().await?;
        let mut transactions = self.transactions.read().await.clone();
        transactions.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        Ok(transactions)
    }
}

/// Process-local account store. Holds at most one account per currency.
#[derive(Debug, Default)]
pub struct InMemoryBankAccountsRepository {
    accounts: RwLock<Vec<BankAccount>>,
    conditions: Conditions,
}

impl InMemoryBankAccountsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.conditions.latency = Some(latency);
        self
    }

    pub fn set_failure(&self, error: Option<RepositoryError>) {
        self.conditions.set_failure(error);
    }
}

#[async_trait]
impl BankAccountsRepository for InMemoryBankAccountsRepository {
    async fn open_account(&self, currency: Currency) -> Result<BankAccount, RepositoryError> {
        self.conditions.check().await?;
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.currency == currency) {
            return Err(RepositoryError::Rejected(format!(
                "An account in {currency} is already open"
            )));
        }
        let account = BankAccount::open(currency);
        tracing::debug!(id = %account.id, %currency, "Opened bank account");
        accounts.push(account.clone());
        Ok(account)
    }

    async fn accounts(&self) -> Result<Vec<BankAccount>, RepositoryError> {
        self.conditions.check().await?;
        Ok(self.accounts.read().await.clone())
    }
}
