//! Scoped terminal setup for the TUI
//!
//! The terminal is put into raw mode and the alternate screen on the first
//! draw, and restored when the context is dropped.

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use tracing::warn;

type TuiTerminal = Terminal<CrosstermBackend<Stderr>>;

#[derive(Default)]
pub struct TerminalContext {
    terminal: Option<TuiTerminal>,
}

impl TerminalContext {
    pub fn new() -> Self {
        Self { terminal: None }
    }

    /// Whether the terminal is currently taken over
    pub fn is_active(&self) -> bool {
        self.terminal.is_some()
    }

    /// Draw a frame, setting the terminal up first if needed
    pub fn draw<F>(&mut self, render: F) -> Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        if self.terminal.is_none() {
            self.terminal = Some(Self::setup()?);
        }

        if let Some(terminal) = self.terminal.as_mut() {
            terminal.draw(render).context("Failed to draw frame")?;
        }
        Ok(())
    }

    /// Give the terminal back to the shell; no-op when never set up
    pub fn restore(&mut self) -> Result<()> {
        let Some(mut terminal) = self.terminal.take() else {
            return Ok(());
        };

        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }

    fn setup() -> Result<TuiTerminal> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        if let Err(err) = execute!(stderr, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err).context("Failed to enter alternate screen");
        }

        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;
        Ok(terminal)
    }
}

impl Drop for TerminalContext {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!(error = %err, "failed to restore terminal");
        }
    }
}
