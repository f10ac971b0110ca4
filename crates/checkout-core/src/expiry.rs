//! # Expiry Entry
//!
//! Keystroke-driven entry of a card expiry date in `MM/yy` form.
//! The state machine knows nothing about terminals: front ends translate
//! whatever key events they receive into [`ExpiryKey`] values.

use crate::error::{PaymentError, PaymentResult};
use crate::payment::CardExpiry;

/// Separator inserted automatically after the month digits
pub const EXPIRY_SEPARATOR: char = '/';

/// Length of a finished `MM/yy` entry
pub const EXPIRY_LEN: usize = 5;

/// A single keystroke fed to [`ExpiryInput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryKey {
    Digit(char),
    Backspace,
    Confirm,
    Cancel,
    /// Anything else; ignored
    Other,
}

impl ExpiryKey {
    /// Classify a typed character
    pub fn from_char(c: char) -> Self {
        match c {
            '0'..='9' => ExpiryKey::Digit(c),
            '\u{8}' | '\u{7f}' => ExpiryKey::Backspace,
            '\n' | '\r' => ExpiryKey::Confirm,
            '\u{1b}' => ExpiryKey::Cancel,
            _ => ExpiryKey::Other,
        }
    }
}

/// What the entry looks like after a keystroke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryStep {
    /// Still typing; holds the text to echo
    Editing(String),
    /// Confirmed with a well-formed date
    Done(CardExpiry),
    /// Entry aborted
    Cancelled,
}

/// Accumulates keystrokes into an `MM/yy` string
#[derive(Debug, Clone, Default)]
pub struct ExpiryInput {
    buffer: String,
}

impl ExpiryInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text, including any auto-inserted separator
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_complete(&self) -> bool {
        self.buffer.len() == EXPIRY_LEN
    }

    /// Apply one keystroke.
    ///
    /// Confirming anything other than a complete, valid date is a
    /// validation error; the buffer is kept so the caller may report it.
    pub fn push(&mut self, key: ExpiryKey) -> PaymentResult<ExpiryStep> {
        match key {
            ExpiryKey::Digit(d) => {
                if self.buffer.len() < EXPIRY_LEN {
                    self.buffer.push(d);
                    if self.buffer.len() == 2 {
                        self.buffer.push(EXPIRY_SEPARATOR);
                    }
                }
            }
            ExpiryKey::Backspace => {
                // The separator was never typed, so deleting it also removes
                // the month digit in front of it.
                if self.buffer.ends_with(EXPIRY_SEPARATOR) {
                    self.buffer.pop();
                }
                self.buffer.pop();
            }
            ExpiryKey::Confirm => return self.finish().map(ExpiryStep::Done),
            ExpiryKey::Cancel => return Ok(ExpiryStep::Cancelled),
            ExpiryKey::Other => {}
        }
        Ok(ExpiryStep::Editing(self.buffer.clone()))
    }

    fn finish(&self) -> PaymentResult<CardExpiry> {
        if self.buffer.is_empty() {
            return Err(PaymentError::validation("expiry", "must not be empty"));
        }
        if !self.is_complete() {
            return Err(PaymentError::validation(
                "expiry",
                format!("'{}' is not in MM/yy form", self.buffer),
            ));
        }
        self.buffer.parse()
    }
}

/// Replay a typed line through the state machine, as if each character were
/// a keystroke followed by a final confirm.
///
/// Unlike live key entry, a whole line is checked strictly: anything other
/// than digits is rejected, except a `/` typed right after the month where
/// the separator is inserted anyway.
pub fn expiry_from_keystrokes(line: &str) -> PaymentResult<CardExpiry> {
    let mut input = ExpiryInput::new();
    let mut prev: Option<char> = None;
    for c in line.chars() {
        let key = ExpiryKey::from_char(c);
        if key == ExpiryKey::Other {
            let after_month =
                input.as_str().len() == 3 && prev.is_some_and(|p| p.is_ascii_digit());
            if c == EXPIRY_SEPARATOR && after_month {
                prev = Some(c);
                continue;
            }
            return Err(PaymentError::validation(
                "expiry",
                format!("'{}' is not in MM/yy form", line),
            ));
        }
        prev = Some(c);
        match input.push(key)? {
            ExpiryStep::Editing(_) => {}
            ExpiryStep::Done(expiry) => return Ok(expiry),
            ExpiryStep::Cancelled => return Err(PaymentError::Cancelled),
        }
    }
    match input.push(ExpiryKey::Confirm)? {
        ExpiryStep::Done(expiry) => Ok(expiry),
        _ => Err(PaymentError::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_digits(input: &mut ExpiryInput, digits: &str) {
        for c in digits.chars() {
            input.push(ExpiryKey::from_char(c)).unwrap();
        }
    }

    #[test]
    fn test_separator_inserted_after_month() {
        let mut input = ExpiryInput::new();
        type_digits(&mut input, "1");
        assert_eq!(input.as_str(), "1");
        type_digits(&mut input, "2");
        assert_eq!(input.as_str(), "12/");
        type_digits(&mut input, "29");
        assert_eq!(input.as_str(), "12/29");
        assert!(input.is_complete());
    }

    #[test]
    fn test_non_digits_ignored_and_length_capped() {
        let mut input = ExpiryInput::new();
        type_digits(&mut input, "a1-2/x2934");
        assert_eq!(input.as_str(), "12/29");
    }

    #[test]
    fn test_backspace_across_separator() {
        let mut input = ExpiryInput::new();
        type_digits(&mut input, "12");
        assert_eq!(input.as_str(), "12/");

        let step = input.push(ExpiryKey::Backspace).unwrap();
        assert_eq!(step, ExpiryStep::Editing("1".to_string()));

        type_digits(&mut input, "1");
        assert_eq!(input.as_str(), "11/");
        type_digits(&mut input, "25");
        input.push(ExpiryKey::Backspace).unwrap();
        assert_eq!(input.as_str(), "11/2");
    }

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut input = ExpiryInput::new();
        let step = input.push(ExpiryKey::Backspace).unwrap();
        assert_eq!(step, ExpiryStep::Editing(String::new()));
    }

    #[test]
    fn test_confirm_requires_five_chars() {
        let mut input = ExpiryInput::new();
        type_digits(&mut input, "123");
        assert!(matches!(
            input.push(ExpiryKey::Confirm),
            Err(PaymentError::Validation { field: "expiry", .. })
        ));

        let mut empty = ExpiryInput::new();
        assert!(matches!(
            empty.push(ExpiryKey::Confirm),
            Err(PaymentError::Validation { .. })
        ));
    }

    #[test]
    fn test_confirm_complete_entry() {
        let mut input = ExpiryInput::new();
        type_digits(&mut input, "0731");
        let step = input.push(ExpiryKey::Confirm).unwrap();
        assert_eq!(step, ExpiryStep::Done(CardExpiry { month: 7, year: 2031 }));
    }

    #[test]
    fn test_cancel() {
        let mut input = ExpiryInput::new();
        type_digits(&mut input, "12");
        assert_eq!(input.push(ExpiryKey::Cancel).unwrap(), ExpiryStep::Cancelled);
    }

    #[test]
    fn test_expiry_from_keystrokes() {
        assert_eq!(
            expiry_from_keystrokes("1229").unwrap(),
            CardExpiry { month: 12, year: 2029 }
        );
        assert_eq!(
            expiry_from_keystrokes("12/29").unwrap(),
            CardExpiry { month: 12, year: 2029 }
        );
        assert!(expiry_from_keystrokes("").is_err());
        assert!(expiry_from_keystrokes("12").is_err());
        assert!(expiry_from_keystrokes("1329").is_err());
    }

    #[test]
    fn test_typed_line_rejects_stray_characters() {
        for line in ["1/229", "12a29", "12//29", "/1229", "12 29", "12/2x9"] {
            assert!(
                matches!(
                    expiry_from_keystrokes(line),
                    Err(PaymentError::Validation { field: "expiry", .. })
                ),
                "{} should be rejected",
                line
            );
        }
    }
}
