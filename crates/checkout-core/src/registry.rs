//! # Card Registry
//!
//! In-memory list of registered cards, kept in insertion order.
//! Cards are never removed and never de-duplicated: registering the same
//! number twice yields two independent records.

use crate::error::{PaymentError, PaymentResult};
use crate::money::{Currency, Money};
use crate::payment::{CardExpiry, PaymentRecord};
use std::fmt;
use tracing::info;

/// Handle to a card in a [`CardRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardId(usize);

impl CardId {
    /// 1-based position shown in listings
    pub fn number(&self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.number())
    }
}

/// Raw text of the registration fields, as typed
#[derive(Debug, Clone, Default)]
pub struct CardForm {
    pub card_number: String,
    pub cvv: String,
    pub expiry: String,
    pub balance: String,
}

impl CardForm {
    /// Validate every field and build the record.
    ///
    /// Nothing is created unless all four fields pass.
    pub fn into_record(self, currency: Currency) -> PaymentResult<PaymentRecord> {
        let card_number = require_field("card number", &self.card_number)?;
        let cvv = require_field("cvv", &self.cvv)?;
        let expiry: CardExpiry = require_field("expiry", &self.expiry)?.parse()?;

        let balance = Money::parse(&self.balance, currency)?;

        PaymentRecord::new(card_number, cvv, expiry, balance)
    }
}

/// Trimmed field text, or a validation error if nothing was typed
pub fn require_field<'a>(field: &'static str, value: &'a str) -> PaymentResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PaymentError::validation(field, "must not be empty"));
    }
    Ok(trimmed)
}

#[derive(Debug, Clone, Default)]
pub struct CardRegistry {
    cards: Vec<PaymentRecord>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Append a card and return its handle
    pub fn register(&mut self, record: PaymentRecord) -> CardId {
        let id = CardId(self.cards.len());
        info!(
            card = %id,
            number = %record.masked_number(4),
            balance = %record.balance(),
            "Card registered"
        );
        self.cards.push(record);
        id
    }

    pub fn get(&self, id: CardId) -> Option<&PaymentRecord> {
        self.cards.get(id.0)
    }

    pub fn get_mut(&mut self, id: CardId) -> Option<&mut PaymentRecord> {
        self.cards.get_mut(id.0)
    }

    /// Cards in listing order
    pub fn iter(&self) -> impl Iterator<Item = (CardId, &PaymentRecord)> {
        self.cards.iter().enumerate().map(|(i, r)| (CardId(i), r))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Resolve a typed 1-based choice into a handle
    pub fn select(&self, choice: &str) -> PaymentResult<CardId> {
        if self.is_empty() {
            return Err(PaymentError::NoCards);
        }
        let trimmed = choice.trim();
        let choice: usize = trimmed.parse().map_err(|_| PaymentError::Parse {
            input: trimmed.to_string(),
        })?;
        if choice == 0 || choice > self.len() {
            return Err(PaymentError::SelectionOutOfRange {
                choice,
                count: self.len(),
            });
        }
        Ok(CardId(choice - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(number: &str, cvv: &str, expiry: &str, balance: &str) -> CardForm {
        CardForm {
            card_number: number.into(),
            cvv: cvv.into(),
            expiry: expiry.into(),
            balance: balance.into(),
        }
    }

    fn valid_form() -> CardForm {
        form("1234567890123456", "123", "12/29", "100.00")
    }

    #[test]
    fn test_form_into_record() {
        let record = valid_form().into_record(Currency::USD).unwrap();
        assert_eq!(record.card_number(), "1234567890123456");
        assert_eq!(record.cvv(), "123");
        assert_eq!(record.expiry(), CardExpiry { month: 12, year: 2029 });
        assert_eq!(record.balance(), Money::from_cents(10000, Currency::USD));
        assert!(record.history().is_empty());
    }

    #[test]
    fn test_form_rejects_empty_fields() {
        let cases = [
            (form("", "123", "12/29", "1"), "card number"),
            (form("   ", "123", "12/29", "1"), "card number"),
            (form("1234567890123456", "", "12/29", "1"), "cvv"),
            (form("1234567890123456", "123", "", "1"), "expiry"),
        ];
        for (form, expected) in cases {
            match form.into_record(Currency::USD) {
                Err(PaymentError::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_form_rejects_bad_expiry_and_balance() {
        assert!(matches!(
            form("1234567890123456", "123", "1229", "1").into_record(Currency::USD),
            Err(PaymentError::Validation { field: "expiry", .. })
        ));
        assert!(matches!(
            form("1234567890123456", "123", "12/29", "lots").into_record(Currency::USD),
            Err(PaymentError::Parse { .. })
        ));
        assert!(matches!(
            form("1234567890123456", "123", "12/29", "-5").into_record(Currency::USD),
            Err(PaymentError::Validation { field: "balance", .. })
        ));
    }

    #[test]
    fn test_short_card_still_registers() {
        let record = form("1234", "12", "01/30", "5")
            .into_record(Currency::USD)
            .unwrap();
        assert!(!record.is_valid());
    }

    #[test]
    fn test_register_and_select() {
        let mut registry = CardRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(registry.select("1"), Err(PaymentError::NoCards)));

        let first = registry.register(valid_form().into_record(Currency::USD).unwrap());
        let second = registry.register(valid_form().into_record(Currency::USD).unwrap());

        assert_eq!(registry.len(), 2);
        assert_ne!(first, second);
        assert_eq!(registry.select("1").unwrap(), first);
        assert_eq!(registry.select(" 2 ").unwrap(), second);
        assert_eq!(second.number(), 2);
        assert_eq!(second.to_string(), "#2");
    }

    #[test]
    fn test_select_errors() {
        let mut registry = CardRegistry::new();
        registry.register(valid_form().into_record(Currency::USD).unwrap());

        assert!(matches!(
            registry.select("0"),
            Err(PaymentError::SelectionOutOfRange { choice: 0, count: 1 })
        ));
        assert!(matches!(
            registry.select("2"),
            Err(PaymentError::SelectionOutOfRange { choice: 2, count: 1 })
        ));
        assert!(matches!(registry.select("one"), Err(PaymentError::Parse { .. })));
        assert!(matches!(registry.select("-1"), Err(PaymentError::Parse { .. })));
    }

    #[test]
    fn test_duplicates_are_independent() {
        let mut registry = CardRegistry::new();
        let a = registry.register(valid_form().into_record(Currency::USD).unwrap());
        let b = registry.register(valid_form().into_record(Currency::USD).unwrap());

        registry
            .get_mut(a)
            .unwrap()
            .charge(Money::from_cents(4000, Currency::USD));

        assert_eq!(
            registry.get(a).unwrap().balance(),
            Money::from_cents(6000, Currency::USD)
        );
        assert_eq!(
            registry.get(b).unwrap().balance(),
            Money::from_cents(10000, Currency::USD)
        );
        let listed: Vec<usize> = registry.iter().map(|(id, _)| id.number()).collect();
        assert_eq!(listed, vec![1, 2]);
    }
}
