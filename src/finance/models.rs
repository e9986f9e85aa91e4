//! Finance domain values.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Currencies an account or transaction can be denominated in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CHF,
    JPY,
    CNY,
    RUB,
    KZT,
}

impl Currency {
    pub const ALL: [Currency; 8] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::CHF,
        Currency::JPY,
        Currency::CNY,
        Currency::RUB,
        Currency::KZT,
    ];

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CHF => "CHF",
            Self::JPY => "JPY",
            Self::CNY => "CNY",
            Self::RUB => "RUB",
            Self::KZT => "KZT",
        }
    }

    /// Every currency, ordered by code.
    pub fn sorted_by_code() -> Vec<Currency> {
        let mut currencies = Self::ALL.to_vec();
        currencies.sort_by_key(|c| c.code());
        currencies
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoneyAmount {
    pub amount: f64,
    pub currency: Currency,
}

impl MoneyAmount {
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: 0.0,
            currency,
        }
    }
}

impl fmt::Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

/// Direction of a transaction. Credits are stored as negative amounts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    #[default]
    Debit,
    Credit,
}

impl TransactionType {
    /// Apply the sign this transaction type carries to a positive amount.
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            Self::Debit => amount,
            Self::Credit => -amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub name: String,
    pub money_amount: MoneyAmount,
    /// Milliseconds since the Unix epoch, UTC
    pub timestamp_ms: i64,
}

impl Transaction {
    /// A transaction with a fresh id, stamped with the current time.
    pub fn new(name: impl Into<String>, money_amount: MoneyAmount) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            money_amount,
            timestamp_ms: Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: String,
    pub currency: Currency,
    pub balance: MoneyAmount,
    pub opened_at_ms: i64,
}

impl BankAccount {
    /// A new, empty account in `currency`.
    pub fn open(currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            currency,
            balance: MoneyAmount::zero(currency),
            opened_at_ms: Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currencies_sort_by_code() {
        let codes: Vec<&str> = Currency::sorted_by_code().iter().map(|c| c.code()).collect();
        assert_eq!(
            codes,
            vec!["CHF", "CNY", "EUR", "GBP", "JPY", "KZT", "RUB", "USD"]
        );
    }

    #[test]
    fn default_currency_is_usd() {
        assert_eq!(Currency::default(), Currency::USD);
    }

    #[test]
    fn credit_negates_amount() {
        assert_eq!(TransactionType::Credit.signed(12.5), -12.5);
        assert_eq!(TransactionType::Debit.signed(12.5), 12.5);
        assert_eq!(TransactionType::default(), TransactionType::Debit);
    }

    #[test]
    fn new_transactions_get_unique_ids() {
        let amount = MoneyAmount {
            amount: 1.0,
            currency: Currency::EUR,
        };
        let first = Transaction::new("Bread", amount);
        let second = Transaction::new("Bread", amount);

        assert_ne!(first.id, second.id);
        assert!(Uuid::parse_str(&first.id).is_ok());
        assert!(first.timestamp_ms > 0);
    }

    #[test]
    fn money_amount_displays_with_code() {
        let amount = MoneyAmount {
            amount: -3.5,
            currency: Currency::GBP,
        };
        assert_eq!(amount.to_string(), "-3.50 GBP");
    }

    #[test]
    fn opened_account_is_empty() {
        let account = BankAccount::open(Currency::KZT);
        assert_eq!(account.balance, MoneyAmount::zero(Currency::KZT));
    }
}
