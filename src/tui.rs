//! Terminal setup and teardown.

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Duration;

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    alt_screen: bool,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            alt_screen: false,
        })
    }

    /// Enter raw mode and the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        self.alt_screen = true;
        self.terminal.clear()?;
        Ok(())
    }

    /// Restore the terminal; safe to call after [`Self::leave_alt_screen`].
    pub fn exit(&mut self) -> Result<()> {
        disable_raw_mode()?;
        if self.alt_screen {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alt_screen = false;
        }
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Drop out of the alternate screen while keeping the app running, so
    /// subprocess error output stays visible underneath.
    pub fn leave_alt_screen(&mut self) -> Result<()> {
        if self.alt_screen {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alt_screen = false;
        }
        Ok(())
    }

    pub fn in_alt_screen(&self) -> bool {
        self.alt_screen
    }

    /// Print a line on the normal screen; raw mode is still active, so the
    /// carriage return is explicit.
    pub fn print_line(&mut self, line: &str) -> Result<()> {
        execute!(io::stdout(), Print(format!("{line}\r\n")))?;
        Ok(())
    }

    /// Wait up to `timeout` for the next terminal event.
    pub fn poll_event(&self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}
