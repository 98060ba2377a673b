//! Password prompt reading from the controlling terminal with echo disabled.

use super::PasswordPrompt;
use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Stylize;
use crossterm::terminal;
use std::io::{self, Write};
use tracing::warn;

const DEFAULT_PROMPT: &str = "Please enter your password: ";

/// Reads a password from the terminal in raw mode.
///
/// Enter submits, Esc or Ctrl-C declines.
pub struct TerminalPasswordPrompt {
    prompt: String,
}

impl TerminalPasswordPrompt {
    pub fn new() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl Default for TerminalPasswordPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordPrompt for TerminalPasswordPrompt {
    async fn request_password(&self) -> Option<String> {
        let prompt = self.prompt.clone();
        match tokio::task::spawn_blocking(move || read_hidden_line(&prompt)).await {
            Ok(Ok(password)) => password,
            Ok(Err(e)) => {
                warn!("Failed to read password from terminal: {}", e);
                None
            }
            Err(e) => {
                warn!("Password prompt task failed: {}", e);
                None
            }
        }
    }

    fn report_error(&self, message: &str) {
        eprintln!(" {} {}", "✗".red().bold(), message.red());
    }
}

fn read_hidden_line(prompt: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", prompt)?;
    stdout.flush()?;

    terminal::enable_raw_mode()?;
    let result = read_keys();
    // Restore the terminal even if reading failed
    let restored = terminal::disable_raw_mode();
    writeln!(stdout)?;
    restored?;
    result
}

fn read_keys() -> io::Result<Option<String>> {
    let mut buffer = String::new();
    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match apply_key(&mut buffer, code, modifiers) {
            KeyOutcome::Continue => {}
            KeyOutcome::Submit => return Ok(Some(buffer)),
            KeyOutcome::Decline => return Ok(None),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Submit,
    Decline,
}

fn apply_key(buffer: &mut String, code: KeyCode, modifiers: KeyModifiers) -> KeyOutcome {
    match code {
        KeyCode::Enter => KeyOutcome::Submit,
        KeyCode::Esc => KeyOutcome::Decline,
        KeyCode::Char('c') | KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            KeyOutcome::Decline
        }
        KeyCode::Backspace => {
            buffer.pop();
            KeyOutcome::Continue
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            KeyOutcome::Continue
        }
        _ => KeyOutcome::Continue,
    }
}
