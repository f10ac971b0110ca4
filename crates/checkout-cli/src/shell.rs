//! # Interactive Shell
//!
//! Top-level menu loop. Each iteration reads one choice, runs it to
//! completion and returns to the menu. Only `Exit` (or a closed input
//! stream) leaves the loop.

use crate::config::ShellConfig;
use crate::console::Console;
use crate::prompts;
use checkout_core::{CardId, CardRegistry, Money, PaymentError, PaymentResult, ShoppingCart};
use std::str::FromStr;
use tracing::{info, warn};

const MAIN_MENU: &str = "\
==== Main Menu ====
1. Register card
2. Add item to cart
3. Card options
4. Exit";

const CARD_MENU: &str = "\
---- Card Options ----
1. Pay
2. View history
3. Back";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    RegisterCard,
    AddItem,
    CardOptions,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::RegisterCard),
            "2" => Ok(MenuChoice::AddItem),
            "3" => Ok(MenuChoice::CardOptions),
            "4" => Ok(MenuChoice::Exit),
            other => Err(invalid_choice(other, 4)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Pay,
    ViewHistory,
    Back,
}

impl FromStr for CardAction {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(CardAction::Pay),
            "2" => Ok(CardAction::ViewHistory),
            "3" => Ok(CardAction::Back),
            other => Err(invalid_choice(other, 3)),
        }
    }
}

fn invalid_choice(input: &str, count: usize) -> PaymentError {
    match input.parse::<usize>() {
        Ok(choice) => PaymentError::SelectionOutOfRange { choice, count },
        Err(_) => PaymentError::Parse {
            input: input.to_string(),
        },
    }
}

/// Menu loop owning the registry and the cart for the whole session
pub struct InteractiveShell<C: Console> {
    console: C,
    config: ShellConfig,
    registry: CardRegistry,
    cart: ShoppingCart,
}

impl<C: Console> InteractiveShell<C> {
    pub fn new(console: C, config: ShellConfig) -> Self {
        let cart = ShoppingCart::new(config.currency);
        Self {
            console,
            config,
            registry: CardRegistry::new(),
            cart,
        }
    }

    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    pub fn cart(&self) -> &ShoppingCart {
        &self.cart
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Run until the user exits.
    ///
    /// Recoverable errors are printed and the menu is shown again; only
    /// fatal input errors are returned.
    pub fn run(&mut self) -> PaymentResult<()> {
        loop {
            self.console.writeln("")?;
            self.console.writeln(MAIN_MENU)?;
            self.console.writeln(&format!("Cart total: {}", self.cart.total()))?;
            let line = self.console.prompt("Choose an option: ")?;

            let result = match line.parse::<MenuChoice>() {
                Ok(MenuChoice::RegisterCard) => self.register_card(),
                Ok(MenuChoice::AddItem) => self.add_item(),
                Ok(MenuChoice::CardOptions) => self.card_options(),
                Ok(MenuChoice::Exit) => {
                    self.console.writeln("Goodbye!")?;
                    info!("Session ended by user");
                    return Ok(());
                }
                Err(e) => Err(e),
            };

            if let Err(e) = result {
                self.report(e)?;
            }
        }
    }

    fn report(&mut self, error: PaymentError) -> PaymentResult<()> {
        if error.is_fatal() {
            return Err(error);
        }
        warn!(kind = ?error.kind(), "{}", error);
        self.console.writeln(&format!("Error: {}", error))
    }

    fn register_card(&mut self) -> PaymentResult<()> {
        let id = prompts::register_card(&mut self.console, &mut self.registry, self.config.currency)?;
        self.console.writeln(&format!("Card {} registered.", id))
    }

    fn add_item(&mut self) -> PaymentResult<()> {
        let line = self.console.prompt("Item price: ")?;
        let price = Money::parse(&line, self.config.currency)?;
        self.cart.add_item(price);
        self.console
            .writeln(&format!("Item added. Cart total: {}", self.cart.total()))
    }

    fn card_options(&mut self) -> PaymentResult<()> {
        let id = prompts::select_card(&mut self.console, &self.registry, self.config.mask_visible_digits)?;

        self.console.writeln(CARD_MENU)?;
        let line = self.console.prompt("Choose an option: ")?;
        match line.parse::<CardAction>()? {
            CardAction::Pay => self.pay_with(id),
            CardAction::ViewHistory => {
                let record = self
                    .registry
                    .get(id)
                    .ok_or(PaymentError::CardNotFound { id: id.number() })?;
                prompts::show_history(&mut self.console, record, self.config.mask_visible_digits)
            }
            CardAction::Back => Ok(()),
        }
    }

    fn pay_with(&mut self, id: CardId) -> PaymentResult<()> {
        self.cart.attach(id);
        let charged = self.cart.checkout(&mut self.registry)?;
        let remaining = self
            .registry
            .get(id)
            .map(|r| r.balance())
            .ok_or(PaymentError::CardNotFound { id: id.number() })?;
        self.console.writeln(&format!(
            "Payment of {} successful. Remaining balance: {}",
            charged, remaining
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use checkout_core::Currency;

    fn run_session(lines: &[&str]) -> (PaymentResult<()>, InteractiveShell<ScriptedConsole>) {
        let mut shell = InteractiveShell::new(ScriptedConsole::new(lines), ShellConfig::default());
        let result = shell.run();
        (result, shell)
    }

    fn usd(cents: i64) -> Money {
        Money::from_cents(cents, Currency::USD)
    }

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!("1".parse::<MenuChoice>().unwrap(), MenuChoice::RegisterCard);
        assert_eq!(" 4 ".parse::<MenuChoice>().unwrap(), MenuChoice::Exit);
        assert!(matches!(
            "5".parse::<MenuChoice>(),
            Err(PaymentError::SelectionOutOfRange { choice: 5, count: 4 })
        ));
        assert!(matches!(
            "pay".parse::<MenuChoice>(),
            Err(PaymentError::Parse { .. })
        ));
        assert_eq!("2".parse::<CardAction>().unwrap(), CardAction::ViewHistory);
    }

    #[test]
    fn test_successful_checkout_session() {
        let (result, shell) = run_session(&[
            "1", "1234567890123456", "123", "1229", "100.00",
            "2", "30.00",
            "2", "20.00",
            "3", "1", "1",
            "4",
        ]);
        assert!(result.is_ok());

        let record = shell.registry().get(shell.registry().select("1").unwrap()).unwrap();
        assert_eq!(record.balance(), usd(5000));
        assert_eq!(record.history().len(), 1);
        assert!(record.history()[0].succeeded);
        assert_eq!(record.history()[0].amount, usd(5000));
        assert_eq!(shell.cart().total(), usd(0));

        let output = &shell.console().output;
        assert!(output.contains("Card #1 registered."));
        assert!(output.contains("Item added. Cart total: $50.00"));
        assert!(output.contains("Payment of $50.00 successful. Remaining balance: $50.00"));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_declined_checkout_session() {
        let (result, shell) = run_session(&[
            "1", "1234567890123456", "123", "1229", "10.00",
            "2", "50.00",
            "3", "1", "1",
            "3", "1", "2",
            "4",
        ]);
        assert!(result.is_ok());

        let record = shell.registry().get(shell.registry().select("1").unwrap()).unwrap();
        assert_eq!(record.balance(), usd(1000));
        assert_eq!(record.history().len(), 1);
        assert!(!record.history()[0].succeeded);
        assert_eq!(record.history()[0].amount, usd(5000));
        assert_eq!(shell.cart().total(), usd(5000));

        let output = &shell.console().output;
        assert!(output.contains("Error: Insufficient funds: balance $10.00, requested $50.00"));
        assert!(output.contains("$50.00  FAILED"));
    }

    #[test]
    fn test_invalid_card_blocks_checkout() {
        let (result, shell) = run_session(&[
            "1", "1234", "123", "1229", "100",
            "2", "5",
            "3", "1", "1",
            "4",
        ]);
        assert!(result.is_ok());
        assert_eq!(shell.cart().total(), usd(500));
        let record = shell.registry().get(shell.registry().select("1").unwrap()).unwrap();
        assert!(record.history().is_empty());
        assert!(shell.console().output.contains("Error: Card details are invalid"));
    }

    #[test]
    fn test_errors_return_to_menu() {
        let (result, shell) = run_session(&[
            "9",
            "abc",
            "3",
            "2", "ten",
            "1", "",
            "4",
        ]);
        assert!(result.is_ok());
        assert!(shell.registry().is_empty());
        assert_eq!(shell.cart().total(), usd(0));

        let output = &shell.console().output;
        assert!(output.contains("Error: Choice 9 is out of range (1-4)"));
        assert!(output.contains("Error: Not a number: 'abc'"));
        assert!(output.contains("Error: No cards registered"));
        assert!(output.contains("Error: Not a number: 'ten'"));
        assert!(output.contains("Error: Invalid card number: must not be empty"));
        assert_eq!(output.matches("==== Main Menu ====").count(), 6);
    }

    #[test]
    fn test_oversized_price_rejected() {
        let (result, shell) = run_session(&[
            "2", "1e30",
            "2", "1e16",
            "2", "1e16",
            "4",
        ]);
        assert!(result.is_ok());
        assert!(shell.console().output.contains("Error: Not a number: '1e30'"));
        assert_eq!(shell.cart().total(), usd(2_000_000_000_000_000_000));
    }

    #[test]
    fn test_closed_input_is_fatal() {
        let (result, _) = run_session(&["2", "10"]);
        assert!(matches!(result, Err(PaymentError::InputClosed)));
    }

    #[test]
    fn test_back_from_card_options() {
        let (result, shell) = run_session(&[
            "1", "1234567890123456", "123", "0130", "20",
            "2", "5",
            "3", "1", "3",
            "4",
        ]);
        assert!(result.is_ok());
        assert_eq!(shell.cart().total(), usd(500));
        let record = shell.registry().get(shell.registry().select("1").unwrap()).unwrap();
        assert!(record.history().is_empty());
    }
}
