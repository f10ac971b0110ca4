//! # Card Prompts
//!
//! Interactive card registration, selection and history display.
//! Each flow stops at the first bad field; nothing is registered unless
//! every answer passes.

use crate::console::Console;
use checkout_core::{
    require_field, CardForm, CardId, CardRegistry, Currency, PaymentError, PaymentRecord,
    PaymentResult,
};
use tracing::debug;

/// Collect card details and add the card to the registry
pub fn register_card<C: Console>(
    console: &mut C,
    registry: &mut CardRegistry,
    currency: Currency,
) -> PaymentResult<CardId> {
    let card_number = console.prompt("Card number (16 digits): ")?;
    require_field("card number", &card_number)?;

    let cvv = console.prompt("CVV (3 digits): ")?;
    require_field("cvv", &cvv)?;

    let expiry = console.read_expiry("Expiry date (MM/yy): ")?;

    let balance = console.prompt(&format!("Initial balance ({}): ", currency))?;

    let record = CardForm {
        card_number,
        cvv,
        expiry: expiry.to_string(),
        balance,
    }
    .into_record(currency)?;

    Ok(registry.register(record))
}

/// One listing line, e.g. `  1. **** **** **** 3456  exp 12/29  balance $100.00`
pub fn card_line(id: CardId, record: &PaymentRecord, mask_digits: usize) -> String {
    format!(
        "  {}. {}  exp {}  balance {}",
        id.number(),
        record.masked_number(mask_digits),
        record.expiry(),
        record.balance()
    )
}

/// List the registered cards and read a 1-based choice
pub fn select_card<C: Console>(
    console: &mut C,
    registry: &CardRegistry,
    mask_digits: usize,
) -> PaymentResult<CardId> {
    if registry.is_empty() {
        return Err(PaymentError::NoCards);
    }

    console.writeln("Registered cards:")?;
    for (id, record) in registry.iter() {
        console.writeln(&card_line(id, record, mask_digits))?;
    }
    let choice = console.prompt(&format!("Select a card (1-{}): ", registry.len()))?;
    let id = registry.select(&choice)?;
    debug!(card = %id, "Card selected");
    Ok(id)
}

/// Print every charge attempt made against a card
pub fn show_history<C: Console>(
    console: &mut C,
    record: &PaymentRecord,
    mask_digits: usize,
) -> PaymentResult<()> {
    console.writeln(&format!(
        "History for {} (registered {})",
        record.masked_number(mask_digits),
        record.created_at().format("%Y-%m-%d %H:%M:%S")
    ))?;

    if record.history().is_empty() {
        return console.writeln("  No payment attempts yet.");
    }

    for (i, attempt) in record.history().iter().enumerate() {
        console.writeln(&format!(
            "  {}. {}  {}  {}  ref {}",
            i + 1,
            attempt.timestamp.format("%Y-%m-%d %H:%M:%S"),
            attempt.amount,
            if attempt.succeeded { "SUCCESS" } else { "FAILED" },
            attempt.reference
        ))?;
    }
    console.writeln(&format!(
        "  Total paid: {}  Balance: {}",
        record.successful_total(),
        record.balance()
    ))
}
