//! Console collaborators for the panel and output helpers.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use async_trait::async_trait;
use dialoguer::{Confirm as Prompt, theme::ColorfulTheme};

use lnpos_core::{Confirm, Error, Notifier};

/// Notifier that logs failures and keeps the most recent one so the
/// command can report it on exit.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    last: Mutex<Option<String>>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the most recent failure message, if any.
    pub fn take_last(&self) -> Option<String> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, error: &Error) {
        tracing::debug!(status = ?error.status(), "operation failed: {}", error);
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(error.to_string());
    }
}

/// Yes/no prompt on the terminal. Declines when stdin is not a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

#[async_trait]
impl Confirm for TerminalConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
            tracing::warn!("not a terminal, declining: {}", prompt);
            return false;
        }
        let prompt = prompt.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            Prompt::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact()
        })
        .await;
        match answer {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                tracing::warn!("confirmation prompt failed: {}", e);
                false
            }
            Err(e) => {
                tracing::warn!("confirmation prompt aborted: {}", e);
                false
            }
        }
    }
}

/// Write output to a file or stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            tracing::info!("Output written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
