//! # checkout-cli
//!
//! Interactive console front end for the checkout simulator.
//!
//! This crate provides:
//! - `InteractiveShell`, the numbered menu loop
//! - `Console`, the line/keystroke I/O seam with a stdin/stdout implementation
//! - Card registration, selection and history prompts
//! - `ShellConfig`, loaded from `config/checkout.toml` and `CHECKOUT_*` env vars

pub mod config;
pub mod console;
pub mod prompts;
pub mod shell;

pub use config::ShellConfig;
pub use console::{Console, StdConsole};
pub use shell::{CardAction, InteractiveShell, MenuChoice};
