//! # Shopping Cart
//!
//! Running total plus an optional handle to the card that pays for it.
//! The cart never owns the card; checkout resolves the handle through the
//! registry passed in by the caller.

use crate::error::{PaymentError, PaymentResult};
use crate::money::{Currency, Money};
use crate::payment::ChargeOutcome;
use crate::registry::{CardId, CardRegistry};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
pub struct ShoppingCart {
    total: Money,
    /// Card used at checkout, if any
    payment: Option<CardId>,
    item_count: u32,
}

impl ShoppingCart {
    pub fn new(currency: Currency) -> Self {
        Self {
            total: Money::zero(currency),
            payment: None,
            item_count: 0,
        }
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn payment(&self) -> Option<CardId> {
        self.payment
    }

    /// Items added since the last successful checkout
    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    pub fn is_empty(&self) -> bool {
        self.total.is_zero()
    }

    /// Add a price to the total. Negative prices reduce it; the total is
    /// still floored at zero.
    pub fn add_item(&mut self, price: Money) {
        let sum = self.total + price;
        self.total = if sum.is_negative() {
            Money::zero(sum.currency)
        } else {
            sum
        };
        self.item_count = self.item_count.saturating_add(1);
        debug!(price = %price, total = %self.total, "Item added");
    }

    /// Remove a price from the total, floored at zero.
    pub fn remove_item(&mut self, price: Money) {
        self.total = self.total.saturating_sub_floor(price);
        self.item_count = self.item_count.saturating_sub(1);
        debug!(price = %price, total = %self.total, "Item removed");
    }

    pub fn attach(&mut self, card: CardId) {
        self.payment = Some(card);
    }

    pub fn detach(&mut self) -> Option<CardId> {
        self.payment.take()
    }

    /// Charge the total to the attached card.
    ///
    /// On success the total resets to zero and the charged amount is
    /// returned. Any failure leaves the total untouched.
    #[instrument(skip(self, registry), fields(total = %self.total))]
    pub fn checkout(&mut self, registry: &mut CardRegistry) -> PaymentResult<Money> {
        let id = self.payment.ok_or(PaymentError::NoPaymentAttached)?;
        let record = registry
            .get_mut(id)
            .ok_or(PaymentError::CardNotFound { id: id.number() })?;

        if !record.is_valid() {
            return Err(PaymentError::InvalidCard);
        }

        let amount = self.total;
        match record.charge(amount) {
            ChargeOutcome::Approved { .. } => {
                self.total = Money::zero(amount.currency);
                self.item_count = 0;
                info!(card = %id, amount = %amount, "Checkout complete");
                Ok(amount)
            }
            ChargeOutcome::Declined { .. } => Err(PaymentError::InsufficientFunds {
                balance: record.balance().display(),
                requested: amount.display(),
            }),
        }
    }
}
