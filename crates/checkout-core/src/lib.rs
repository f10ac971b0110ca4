//! # checkout-core
//!
//! Core types for the checkout simulator.
//!
//! This crate provides:
//! - `PaymentRecord` and `PaymentAttempt` for card balances and charge history
//! - `ShoppingCart` for the running total and checkout
//! - `CardRegistry`, `CardId` and `CardForm` for registering and selecting cards
//! - `ExpiryInput` for keystroke-level `MM/yy` entry
//! - `Money` and `Currency` for exact amounts
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust
//! use checkout_core::{CardForm, CardRegistry, Currency, Money, ShoppingCart};
//!
//! let mut registry = CardRegistry::new();
//! let form = CardForm {
//!     card_number: "1234567890123456".into(),
//!     cvv: "123".into(),
//!     expiry: "12/29".into(),
//!     balance: "100.00".into(),
//! };
//! let card = registry.register(form.into_record(Currency::USD)?);
//!
//! let mut cart = ShoppingCart::new(Currency::USD);
//! cart.add_item(Money::parse("30.00", Currency::USD)?);
//! cart.attach(card);
//! cart.checkout(&mut registry)?;
//!
//! assert_eq!(registry.get(card).unwrap().balance().display(), "$70.00");
//! # Ok::<(), checkout_core::PaymentError>(())
//! ```

pub mod cart;
pub mod error;
pub mod expiry;
pub mod money;
pub mod payment;
pub mod registry;

// Re-exports for convenience
pub use cart::ShoppingCart;
pub use error::{ErrorKind, PaymentError, PaymentResult};
pub use expiry::{expiry_from_keystrokes, ExpiryInput, ExpiryKey, ExpiryStep};
pub use money::{Currency, Money};
pub use payment::{
    mask_card_number, CardExpiry, ChargeOutcome, PaymentAttempt, PaymentRecord,
};
pub use registry::{require_field, CardForm, CardId, CardRegistry};
