//! # Checkout Error Types
//!
//! Typed error handling for the checkout simulator.
//! Every fallible operation returns `Result<T, PaymentError>`; none of these
//! are fatal except `InputClosed` and `Io`, which end the interactive session.

use thiserror::Error;

/// Core error type for all card, cart and registry operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// A registration field was empty or malformed
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Non-numeric text where a number was expected
    #[error("Not a number: '{input}'")]
    Parse { input: String },

    /// Balance too low for the requested charge (recorded in history)
    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: String, requested: String },

    /// Selection attempted on an empty registry
    #[error("No cards registered")]
    NoCards,

    /// 1-based choice outside the listed range
    #[error("Choice {choice} is out of range (1-{count})")]
    SelectionOutOfRange { choice: usize, count: usize },

    /// Checkout without a card attached to the cart
    #[error("No payment card attached")]
    NoPaymentAttached,

    /// Attached card fails the format check
    #[error("Card details are invalid (need 16-digit number and 3-digit CVV)")]
    InvalidCard,

    /// Card handle does not resolve to a registered card
    #[error("Card not found: #{id}")]
    CardNotFound { id: usize },

    /// User aborted an interactive entry
    #[error("Entry cancelled")]
    Cancelled,

    /// Standard input reached end of stream
    #[error("Input stream closed")]
    InputClosed,

    /// Terminal or stream failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (bad config file or environment value)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Families of failure shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    InsufficientBalance,
    Selection,
    Parse,
    Session,
}

impl PaymentError {
    /// Shorthand for a validation failure on a named field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        PaymentError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Groups the error into the family reported to the user
    pub fn kind(&self) -> ErrorKind {
        match self {
            PaymentError::Validation { .. }
            | PaymentError::NoPaymentAttached
            | PaymentError::InvalidCard
            | PaymentError::Cancelled => ErrorKind::Validation,
            PaymentError::InsufficientFunds { .. } => ErrorKind::InsufficientBalance,
            PaymentError::NoCards
            | PaymentError::SelectionOutOfRange { .. }
            | PaymentError::CardNotFound { .. } => ErrorKind::Selection,
            PaymentError::Parse { .. } => ErrorKind::Parse,
            PaymentError::InputClosed
            | PaymentError::Io(_)
            | PaymentError::Configuration(_) => ErrorKind::Session,
        }
    }

    /// Returns true if the interactive session cannot continue after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, PaymentError::InputClosed | PaymentError::Io(_))
    }
}

/// Result type alias for checkout operations
pub type PaymentResult<T> = Result<T, PaymentError>;
