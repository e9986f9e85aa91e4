//! Form input validation that reports every problem at once.
//!
//! Validating with `Result` stops at the first error, so a user with two
//! bad fields would have to submit twice to learn about the second one.
//! Checks here return Stillwater's `Validation`, which accumulates ALL
//! failures; forms then show an error under every offending field.
//!
//! # Example
//!
//! ```rust
//! use monkeybusiness::validation::{check_transaction_input, AmountError, NameError};
//!
//! let errors = check_transaction_input("  ", "12,5").unwrap_err();
//! assert_eq!(errors.name, Some(NameError::Empty));
//! assert_eq!(errors.amount, Some(AmountError::Incorrect));
//! ```

mod transaction;

pub use transaction::{
    check_transaction_input, is_amount, validate_amount, validate_name, validate_transaction_input,
    AmountError, FieldErrors, InputError, NameError, TransactionInput,
};
