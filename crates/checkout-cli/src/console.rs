//! # Console
//!
//! Line and keystroke I/O for the interactive shell.
//! The shell only talks to the [`Console`] trait, so sessions can be
//! replayed from canned input in tests.

use checkout_core::{
    expiry_from_keystrokes, CardExpiry, ExpiryInput, ExpiryKey, ExpiryStep, PaymentError,
    PaymentResult,
};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, disable_raw_mode, enable_raw_mode, ClearType},
};
use std::io::{self, BufRead, IsTerminal, Write};

/// Interactive input/output used by the shell
pub trait Console {
    /// Read one line without its trailing newline.
    ///
    /// Returns `PaymentError::InputClosed` at end of input.
    fn read_line(&mut self) -> PaymentResult<String>;

    /// Write text without a newline and flush it
    fn write(&mut self, text: &str) -> PaymentResult<()>;

    fn writeln(&mut self, text: &str) -> PaymentResult<()> {
        self.write(text)?;
        self.write("\n")
    }

    /// Show `prompt` and read the answer
    fn prompt(&mut self, prompt: &str) -> PaymentResult<String> {
        self.write(prompt)?;
        self.read_line()
    }

    /// Read an expiry date keystroke by keystroke.
    ///
    /// The default reads one line and replays its characters as keys.
    fn read_expiry(&mut self, prompt: &str) -> PaymentResult<CardExpiry> {
        let line = self.prompt(prompt)?;
        expiry_from_keystrokes(&line)
    }
}

/// Console over the process's stdin and stdout
pub struct StdConsole {
    stdin: io::StdinLock<'static>,
    stdout: io::Stdout,
    raw_keys: bool,
}

impl StdConsole {
    pub fn new() -> Self {
        let stdin = io::stdin();
        let raw_keys = stdin.is_terminal() && io::stdout().is_terminal();
        Self {
            stdin: stdin.lock(),
            stdout: io::stdout(),
            raw_keys,
        }
    }

    fn echo_expiry(&mut self, prompt: &str, text: &str) -> io::Result<()> {
        execute!(
            self.stdout,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print(prompt),
            Print(text)
        )
    }

    fn read_expiry_raw(&mut self, prompt: &str) -> PaymentResult<CardExpiry> {
        let mut input = ExpiryInput::new();
        self.write(prompt)?;
        let _guard = RawModeGuard::enable()?;

        loop {
            let key = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key),
                _ => continue,
            };
            match input.push(key) {
                Ok(ExpiryStep::Editing(text)) => self.echo_expiry(prompt, &text)?,
                Ok(ExpiryStep::Done(expiry)) => {
                    execute!(self.stdout, Print("\r\n"))?;
                    return Ok(expiry);
                }
                Ok(ExpiryStep::Cancelled) => {
                    execute!(self.stdout, Print("\r\n"))?;
                    return Err(PaymentError::Cancelled);
                }
                Err(e) => {
                    execute!(self.stdout, Print("\r\n"))?;
                    return Err(e);
                }
            }
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn read_line(&mut self) -> PaymentResult<String> {
        let mut line = String::new();
        if self.stdin.read_line(&mut line)? == 0 {
            return Err(PaymentError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn write(&mut self, text: &str) -> PaymentResult<()> {
        self.stdout.write_all(text.as_bytes())?;
        self.stdout.flush()?;
        Ok(())
    }

    fn read_expiry(&mut self, prompt: &str) -> PaymentResult<CardExpiry> {
        if self.raw_keys {
            self.read_expiry_raw(prompt)
        } else {
            let line = self.prompt(prompt)?;
            expiry_from_keystrokes(&line)
        }
    }
}

/// Translate a terminal key event into an expiry keystroke
fn map_key(key: KeyEvent) -> ExpiryKey {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return ExpiryKey::Cancel;
    }
    match key.code {
        KeyCode::Char(c) => ExpiryKey::from_char(c),
        KeyCode::Backspace | KeyCode::Delete => ExpiryKey::Backspace,
        KeyCode::Enter => ExpiryKey::Confirm,
        KeyCode::Esc => ExpiryKey::Cancel,
        _ => ExpiryKey::Other,
    }
}

/// Keeps the terminal in raw mode until dropped
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Console replaying canned lines and capturing everything written
#[cfg(test)]
pub struct ScriptedConsole {
    input: std::collections::VecDeque<String>,
    pub output: String,
}

#[cfg(test)]
impl ScriptedConsole {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            input: lines.iter().map(|l| l.to_string()).collect(),
            output: String::new(),
        }
    }
}

#[cfg(test)]
impl Console for ScriptedConsole {
    fn read_line(&mut self) -> PaymentResult<String> {
        self.input.pop_front().ok_or(PaymentError::InputClosed)
    }

    fn write(&mut self, text: &str) -> PaymentResult<()> {
        self.output.push_str(text);
        Ok(())
    }
}
