//! Rules for the transaction form.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameError {
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountError {
    Empty,
    Incorrect,
}

/// A single failed check, tagged with the field it belongs to.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid name: {0:?}")]
    Name(NameError),

    #[error("Invalid amount: {0:?}")]
    Amount(AmountError),
}

/// Every field's first error, as shown under the form fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<NameError>,
    pub amount: Option<AmountError>,
}

impl FieldErrors {
    fn collect<'a>(errors: impl IntoIterator<Item = &'a InputError>) -> Self {
        errors
            .into_iter()
            .fold(Self::default(), |mut fields, error| {
                match *error {
                    InputError::Name(e) => {
                        fields.name.get_or_insert(e);
                    }
                    InputError::Amount(e) => {
                        fields.amount.get_or_insert(e);
                    }
                }
                fields
            })
    }
}

/// Validated form contents, ready to become a transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionInput {
    /// Name with surrounding whitespace removed
    pub name: String,
    /// Amount as typed, sign included. The transaction type applies its
    /// own sign on top, so a negative credit is stored as positive.
    pub amount: f64,
}

// The pattern is a literal, so failing to compile it is a programming error;
// `amount_pattern_compiles` covers it.
fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(-?)(0|([1-9]\d*))(\.\d+)?$").unwrap_or_else(|e| {
            panic!("Invalid amount pattern: {}", e);
        })
    })
}

/// Whether `text` is a plain decimal number such as `0`, `-12` or `3.25`.
/// No whitespace, exponent, leading zeros or thousands separators.
pub fn is_amount(text: &str) -> bool {
    amount_pattern().is_match(text)
}

pub fn validate_name(text: &str) -> Validation<(), NonEmptyVec<InputError>> {
    if text.trim().is_empty() {
        Validation::fail(InputError::Name(NameError::Empty))
    } else {
        Validation::success(())
    }
}

pub fn validate_amount(text: &str) -> Validation<(), NonEmptyVec<InputError>> {
    if text.trim().is_empty() {
        Validation::fail(InputError::Amount(AmountError::Empty))
    } else if !is_amount(text) {
        Validation::fail(InputError::Amount(AmountError::Incorrect))
    } else {
        Validation::success(())
    }
}

/// Run every field check, accumulating ALL failures.
pub fn validate_transaction_input(
    name_text: &str,
    amount_text: &str,
) -> Validation<TransactionInput, NonEmptyVec<InputError>> {
    let checks = vec![validate_name(name_text), validate_amount(amount_text)];
    match Validation::all_vec(checks) {
        Validation::Success(_) => match amount_text.parse::<f64>() {
            Ok(amount) => Validation::success(TransactionInput {
                name: name_text.trim().to_string(),
                amount,
            }),
            Err(_) => Validation::fail(InputError::Amount(AmountError::Incorrect)),
        },
        Validation::Failure(errors) => Validation::Failure(errors),
    }
}

/// [`validate_transaction_input`] folded into per-field errors.
pub fn check_transaction_input(
    name_text: &str,
    amount_text: &str,
) -> Result<TransactionInput, FieldErrors> {
    match validate_transaction_input(name_text, amount_text) {
        Validation::Success(input) => Ok(input),
        Validation::Failure(errors) => Err(FieldErrors::collect(errors.iter())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_pattern_compiles() {
        assert!(amount_pattern().is_match("-3.5"));
    }

    #[test]
    fn negative_amount_keeps_its_sign() {
        let input = check_transaction_input("Refund", "-3").unwrap();
        assert_eq!(input.amount, -3.0);
    }

    #[test]
    fn validation_accumulates_all_errors() {
        let result = validate_transaction_input("", "");

        match result {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, InputError::Name(NameError::Empty))));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, InputError::Amount(AmountError::Empty))));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn validation_succeeds_when_all_checks_pass() {
        let result = validate_transaction_input("  Groceries ", "42.10");
        assert!(result.is_success());

        let input = check_transaction_input("  Groceries ", "42.10").unwrap();
        assert_eq!(input.name, "Groceries");
        assert_eq!(input.amount, 42.10);
    }

    #[test]
    fn whitespace_only_name_is_empty() {
        assert!(validate_name(" \t ").is_failure());
        assert!(validate_name(" a ").is_success());
    }

    #[test]
    fn whitespace_only_amount_is_empty() {
        let errors = check_transaction_input("Rent", "   ").unwrap_err();
        assert_eq!(
            errors,
            FieldErrors {
                name: None,
                amount: Some(AmountError::Empty)
            }
        );
    }

    #[test]
    fn amount_with_surrounding_spaces_is_incorrect() {
        let errors = check_transaction_input("Rent", " 10 ").unwrap_err();
        assert_eq!(errors.amount, Some(AmountError::Incorrect));
        assert_eq!(errors.name, None);
    }

    #[test]
    fn amount_format() {
        for valid in ["0", "7", "-3", "10.5", "0.25", "-0.5", "123456"] {
            assert!(is_amount(valid), "{valid} should be accepted");
        }
        for invalid in ["", "00", "01", "1.", ".5", "1e3", "1,5", "+1", "abc", "1.2.3"] {
            assert!(!is_amount(invalid), "{invalid} should be rejected");
        }
    }
}
