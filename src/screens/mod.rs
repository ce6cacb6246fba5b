//! Screen state machine.
//!
//! Exactly one screen is active at a time, modeled as the [`ScreenState`]
//! enum. Events are delivered one at a time to the active screen's
//! `handle_event`, which runs to completion and returns a [`ScreenAction`]
//! telling the app what to do next; the next screen is passed back
//! directly instead of being looked up in a registry.

pub mod add;
pub mod list;

pub use add::AddScreen;
pub use list::ListScreen;

use crate::archive::ArchiveResult;
use crate::store::RecordStore;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use std::path::Path;

/// Terminal dimensions, passed explicitly into transition handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutContext {
    pub width: u16,
    pub height: u16,
}

/// Events delivered to the active screen, in arrival order.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// The background zip job finished.
    ArchiveFinished(ArchiveResult),
}

/// Shared resources available to transition handlers.
pub struct ScreenContext<'a> {
    pub store: &'a RecordStore,
    pub config_dir: &'a Path,
}

/// What the app should do after a transition handler returns.
pub enum ScreenAction {
    None,
    /// Activate the given screen.
    Switch(ScreenState),
    /// Launch the archive builder over the current store contents.
    StartArchive,
    /// Drop out of full-screen rendering so the error stays visible.
    LeaveAltScreen,
    Quit,
}

/// The active screen; a fresh value is constructed on every activation.
pub enum ScreenState {
    List(ListScreen),
    Add(AddScreen),
}

impl ScreenState {
    pub fn handle_event(
        &mut self,
        event: AppEvent,
        layout: LayoutContext,
        ctx: &ScreenContext,
    ) -> Result<ScreenAction> {
        match self {
            Self::List(screen) => screen.handle_event(event, layout, ctx),
            Self::Add(screen) => screen.handle_event(event, layout, ctx),
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        match self {
            Self::List(screen) => screen.render(frame),
            Self::Add(screen) => screen.render(frame),
        }
    }

    /// The failure carried by the active screen, if the last archive job
    /// ended badly.
    pub fn archive_error(&self) -> Option<&str> {
        match self {
            Self::List(screen) => screen.archive_error(),
            Self::Add(screen) => screen.archive_error(),
        }
    }
}
