//! # Payment Records
//!
//! A registered card: its balance, identifying fields and the history of
//! every charge attempted against it.

use crate::error::{PaymentError, PaymentResult};
use crate::money::Money;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};
use uuid::Uuid;

/// Required card-number length for a card to be usable at checkout
pub const CARD_NUMBER_LEN: usize = 16;

/// Required CVV length for a card to be usable at checkout
pub const CVV_LEN: usize = 3;

/// Card expiry month and four-digit year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardExpiry {
    pub month: u8,
    pub year: u16,
}

impl FromStr for CardExpiry {
    type Err = PaymentError;

    /// Parse `MM/yy`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PaymentError::validation("expiry", format!("'{}' is not in MM/yy form", s));

        let (mm, yy) = s.split_once('/').ok_or_else(malformed)?;
        if mm.len() != 2 || yy.len() != 2 {
            return Err(malformed());
        }
        if !mm.chars().chain(yy.chars()).all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }
        let month: u8 = mm.parse().map_err(|_| malformed())?;
        let year: u16 = yy.parse().map_err(|_| malformed())?;
        if !(1..=12).contains(&month) {
            return Err(PaymentError::validation(
                "expiry",
                format!("month {:02} is not between 01 and 12", month),
            ));
        }
        Ok(Self {
            month,
            year: 2000 + year,
        })
    }
}

impl fmt::Display for CardExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year % 100)
    }
}

/// One recorded charge attempt. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentAttempt {
    /// Attempt reference (generated)
    pub reference: Uuid,
    pub amount: Money,
    pub timestamp: DateTime<Utc>,
    pub succeeded: bool,
}

/// Result of a single charge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeOutcome {
    /// Balance covered the amount
    Approved { remaining: Money },
    /// Balance too low; nothing deducted
    Declined { shortfall: Money },
}

impl ChargeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ChargeOutcome::Approved { .. })
    }
}

/// A registered card with its balance and charge history
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    balance: Money,
    card_number: String,
    cvv: String,
    expiry: CardExpiry,
    created_at: DateTime<Utc>,
    history: Vec<PaymentAttempt>,
}

impl PaymentRecord {
    /// Create a record with an opening balance.
    ///
    /// Negative balances are refused so the balance can never drop below zero.
    pub fn new(
        card_number: impl Into<String>,
        cvv: impl Into<String>,
        expiry: CardExpiry,
        balance: Money,
    ) -> PaymentResult<Self> {
        if balance.is_negative() {
            return Err(PaymentError::validation(
                "balance",
                "must not be negative",
            ));
        }
        Ok(Self {
            balance,
            card_number: card_number.into(),
            cvv: cvv.into(),
            expiry,
            created_at: Utc::now(),
            history: Vec::new(),
        })
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    pub fn cvv(&self) -> &str {
        &self.cvv
    }

    pub fn expiry(&self) -> CardExpiry {
        self.expiry
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Every attempt in the order it was made
    pub fn history(&self) -> &[PaymentAttempt] {
        &self.history
    }

    pub fn last_attempt(&self) -> Option<&PaymentAttempt> {
        self.history.last()
    }

    /// Sum of all approved charges
    pub fn successful_total(&self) -> Money {
        self.history
            .iter()
            .filter(|a| a.succeeded)
            .fold(Money::zero(self.balance.currency), |acc, a| acc + a.amount)
    }

    /// Format check only: 16-character number and 3-character CVV.
    pub fn is_valid(&self) -> bool {
        self.card_number.chars().count() == CARD_NUMBER_LEN
            && self.cvv.chars().count() == CVV_LEN
    }

    /// Trailing digits behind a mask, e.g. `**** **** **** 3456`
    pub fn masked_number(&self, visible: usize) -> String {
        mask_card_number(&self.card_number, visible)
    }

    /// Attempt to deduct `amount`. Both outcomes are appended to the history.
    pub fn charge(&mut self, amount: Money) -> ChargeOutcome {
        let succeeded = self.balance >= amount;
        let outcome = if succeeded {
            self.balance = self.balance - amount;
            ChargeOutcome::Approved {
                remaining: self.balance,
            }
        } else {
            ChargeOutcome::Declined {
                shortfall: amount - self.balance,
            }
        };

        self.history.push(PaymentAttempt {
            reference: Uuid::new_v4(),
            amount,
            timestamp: Utc::now(),
            succeeded,
        });

        let card = self.masked_number(4);
        match outcome {
            ChargeOutcome::Approved { remaining } => {
                info!(card = %card, amount = %amount, remaining = %remaining, "Charge approved")
            }
            ChargeOutcome::Declined { shortfall } => {
                warn!(card = %card, amount = %amount, shortfall = %shortfall, "Charge declined")
            }
        }
        outcome
    }
}

/// Mask all but the last `visible` characters, grouped in fours.
pub fn mask_card_number(number: &str, visible: usize) -> String {
    let chars: Vec<char> = number.chars().collect();
    if chars.len() <= visible {
        return number.to_string();
    }
    let tail: String = chars[chars.len() - visible..].iter().collect();
    let hidden = chars.len() - visible;
    let mut groups: Vec<String> = (0..hidden / 4).map(|_| "****".to_string()).collect();
    if hidden % 4 != 0 {
        groups.insert(0, "*".repeat(hidden % 4));
    }
    groups.push(tail);
    groups.join(" ")
}
