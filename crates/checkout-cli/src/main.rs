//! # Checkout Simulator
//!
//! Register payment cards, fill a cart and check out against a card balance.
//! All state lives in memory and is discarded on exit.
//!
//! ## Usage
//!
//! ```bash
//! # Optional overrides
//! export CHECKOUT_CURRENCY=eur
//! export RUST_LOG=checkout_core=info
//!
//! checkout-sim
//! ```

use checkout_cli::{InteractiveShell, ShellConfig, StdConsole};
use checkout_core::PaymentError;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the menu on stdout
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let config = ShellConfig::load()?;
    info!(currency = %config.currency, "Configuration loaded");

    if config.show_banner {
        print_banner();
    }

    let mut shell = InteractiveShell::new(StdConsole::new(), config);
    match shell.run() {
        Ok(()) => Ok(()),
        Err(PaymentError::InputClosed) => {
            println!();
            println!("Input closed, exiting.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_banner() {
    println!(
        r#"
  Checkout Simulator
  ━━━━━━━━━━━━━━━━━━
  Cards, cart, checkout
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
