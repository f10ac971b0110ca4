//! # Money Types
//!
//! Currency and amount types for the checkout simulator.
//! Amounts are held in the smallest currency unit so balance arithmetic is exact.

use crate::error::{PaymentError, PaymentResult};
use serde::Deserialize;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
}

impl Currency {
    /// Upper-case ISO code, e.g. `USD`
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
        }
    }

    /// Digits after the decimal point (JPY has none)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
        }
    }

    /// Scale a decimal value to whole minor units.
    ///
    /// `None` if the value is not finite or does not fit in an `i64`.
    pub fn to_minor_units(&self, value: f64) -> Option<i64> {
        let scaled = (value * 10_f64.powi(self.decimal_places() as i32)).round();
        // i64::MAX is not representable as f64; the cast rounds up to 2^63.
        if !scaled.is_finite() || scaled >= i64::MAX as f64 || scaled < i64::MIN as f64 {
            return None;
        }
        Some(scaled as i64)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usd" => Ok(Currency::USD),
            "eur" => Ok(Currency::EUR),
            "gbp" => Ok(Currency::GBP),
            "jpy" => Ok(Currency::JPY),
            "cad" => Ok(Currency::CAD),
            other => Err(PaymentError::Configuration(format!(
                "unsupported currency '{}'",
                other
            ))),
        }
    }
}

/// Monetary amount in the smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    /// Amount in smallest currency unit (cents for USD); may be negative
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Money {
    /// Create an amount from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::from_cents(0, currency)
    }

    /// Parse user text such as `100`, `30.5` or `-12.00`.
    ///
    /// Extra precision is rounded to the currency's decimal places. Values
    /// too large to hold in minor units are rejected, not capped.
    pub fn parse(input: &str, currency: Currency) -> PaymentResult<Self> {
        let trimmed = input.trim();
        let not_a_number = || PaymentError::Parse {
            input: trimmed.to_string(),
        };
        let value: f64 = trimmed.parse().map_err(|_| not_a_number())?;
        let amount = currency.to_minor_units(value).ok_or_else(not_a_number)?;
        Ok(Self::from_cents(amount, currency))
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    /// Subtract, flooring the result at zero
    pub fn saturating_sub_floor(self, rhs: Money) -> Money {
        let diff = self - rhs;
        if diff.is_negative() {
            Money::zero(self.currency)
        } else {
            diff
        }
    }

    /// Format for display (e.g., "$10.00")
    pub fn display(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let symbol = self.currency.symbol();
        let places = self.currency.decimal_places() as u32;
        if places == 0 {
            format!("{}{}{}", sign, symbol, self.amount.unsigned_abs())
        } else {
            let divisor = 10_u64.pow(places);
            let abs = self.amount.unsigned_abs();
            format!(
                "{}{}{}.{:0width$}",
                sign,
                symbol,
                abs / divisor,
                abs % divisor,
                width = places as usize
            )
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

// Arithmetic saturates at the i64 bounds instead of wrapping. Mixed-currency
// arithmetic keeps the left-hand currency; the simulator runs a single
// configured currency end to end.
impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money::from_cents(self.amount.saturating_add(rhs.amount), self.currency)
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money::from_cents(self.amount.saturating_sub(rhs.amount), self.currency)
    }
}
