//! Application runtime: event loop and screen dispatch.

use crate::archive::{self, ArchiveResult};
use crate::screens::{
    AppEvent, LayoutContext, ListScreen, ScreenAction, ScreenContext, ScreenState,
};
use crate::store::RecordStore;
use crate::tui::Tui;
use anyhow::{Context, Result};
use crossterm::event::{Event, KeyEventKind};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::info;

pub struct App {
    tui: Tui,
    store: RecordStore,
    config_dir: PathBuf,
    runtime: Runtime,
    layout: LayoutContext,
    screen: ScreenState,
    archive_tx: Sender<ArchiveResult>,
    archive_rx: Receiver<ArchiveResult>,
    /// True while a zip job is running; outlives any one screen.
    archive_pending: bool,
    should_quit: bool,
}

impl App {
    pub fn new(store: RecordStore, config_dir: PathBuf) -> Result<Self> {
        let tui = Tui::new()?;
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        let (archive_tx, archive_rx) = mpsc::channel();
        let screen = ScreenState::List(ListScreen::new(&ScreenContext {
            store: &store,
            config_dir: &config_dir,
        })?);
        Ok(Self {
            tui,
            store,
            config_dir,
            runtime,
            layout: LayoutContext::default(),
            screen,
            archive_tx,
            archive_rx,
            archive_pending: false,
            should_quit: false,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        info!(store = %self.store.path().display(), "starting");
        self.tui.enter()?;
        let result = self.event_loop();
        self.tui.exit()?;
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        loop {
            self.draw()?;

            if self.should_quit {
                return Ok(());
            }

            // Finished archive jobs re-enter the same single-consumer
            // stream as ordinary events, so no two transition handlers
            // ever run concurrently.
            if let Ok(result) = self.archive_rx.try_recv() {
                self.archive_pending = false;
                self.dispatch(AppEvent::ArchiveFinished(result))?;
                continue;
            }

            if let Some(event) = self.tui.poll_event(Duration::from_millis(250))? {
                match event {
                    Event::Resize(width, height) => {
                        self.layout = LayoutContext { width, height };
                        self.dispatch(AppEvent::Resize(width, height))?;
                    }
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.dispatch(AppEvent::Key(key))?;
                    }
                    _ => {}
                }
            }
        }
    }

    fn dispatch(&mut self, event: AppEvent) -> Result<()> {
        let ctx = ScreenContext {
            store: &self.store,
            config_dir: &self.config_dir,
        };
        let action = self.screen.handle_event(event, self.layout, &ctx)?;
        match action {
            ScreenAction::None => {}
            ScreenAction::Switch(mut next) => {
                // The job outlives the screen that started it; the fresh
                // list screen must keep refusing `z` until it finishes.
                if let ScreenState::List(list) = &mut next {
                    list.set_archive_pending(self.archive_pending);
                }
                self.screen = next;
            }
            ScreenAction::StartArchive => self.start_archive()?,
            ScreenAction::LeaveAltScreen => {
                self.tui.leave_alt_screen()?;
                // Replay the failure on the normal screen, where it is not
                // wiped by the next frame.
                if let Some(err) = self.screen.archive_error() {
                    self.tui.print_line(&format!("dotkeep: archive failed: {err}"))?;
                }
            }
            ScreenAction::Quit => self.should_quit = true,
        }
        Ok(())
    }

    fn start_archive(&mut self) -> Result<()> {
        let records = self.store.load()?;
        match archive::spawn(self.runtime.handle(), &records, self.archive_tx.clone()) {
            Ok(()) => self.archive_pending = true,
            // Staging failures are synchronous; deliver them the same way
            // a finished job would be.
            Err(err) => self.dispatch(AppEvent::ArchiveFinished(Err(err)))?,
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        // Outside the alternate screen the frame is left as-is so the
        // subprocess error output underneath stays readable.
        if !self.tui.in_alt_screen() {
            return Ok(());
        }
        let screen = &mut self.screen;
        self.tui.terminal_mut().draw(|frame| screen.render(frame))?;
        Ok(())
    }
}
