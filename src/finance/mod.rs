//! Personal-finance domain: money, transactions, accounts and their
//! repositories.

mod models;
mod repository;

pub use models::{BankAccount, Currency, MoneyAmount, Transaction, TransactionType};
pub use repository::{
    BankAccountsRepository, InMemoryBankAccountsRepository, InMemoryTransactionsRepository,
    RepositoryError, TransactionsRepository,
};
