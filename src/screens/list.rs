//! List screen: browse tracked dotfiles, trigger add/remove/archive.

use super::{AddScreen, AppEvent, LayoutContext, ScreenAction, ScreenContext, ScreenState};
use crate::store::DotfileRecord;
use crate::styles::{
    error_style, muted_style, selected_style, status_style, title_style, LIST_HIGHLIGHT_SYMBOL,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use tracing::{info, warn};

const HELP_LINE: &str = "a add · x remove · z archive · ↑/↓ move · q quit";

pub struct ListScreen {
    records: Vec<DotfileRecord>,
    cursor: ListState,
    /// Transient one-line message shown below the list.
    status: Option<String>,
    archive_pending: bool,
    archive_error: Option<String>,
}

impl ListScreen {
    pub fn new(ctx: &ScreenContext) -> Result<Self> {
        Self::with_status(ctx, None)
    }

    /// Construct freshly loaded from the store, with an initial status line.
    pub fn with_status(ctx: &ScreenContext, status: Option<String>) -> Result<Self> {
        let records = ctx.store.load()?;
        let mut cursor = ListState::default();
        if !records.is_empty() {
            cursor.select(Some(0));
        }
        Ok(Self {
            records,
            cursor,
            status,
            archive_pending: false,
            archive_error: None,
        })
    }

    pub fn records(&self) -> &[DotfileRecord] {
        &self.records
    }

    pub fn selected(&self) -> Option<&DotfileRecord> {
        self.cursor.selected().and_then(|i| self.records.get(i))
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn archive_error(&self) -> Option<&str> {
        self.archive_error.as_deref()
    }

    /// Seed the in-flight job indicator; a job started by an earlier list
    /// screen is still running when this one is activated.
    pub fn set_archive_pending(&mut self, pending: bool) {
        self.archive_pending = pending;
    }

    fn reload(&mut self, ctx: &ScreenContext) -> Result<()> {
        self.records = ctx.store.load()?;
        let selected = self.cursor.selected().unwrap_or(0);
        self.cursor.select(if self.records.is_empty() {
            None
        } else {
            Some(selected.min(self.records.len() - 1))
        });
        Ok(())
    }

    pub fn handle_event(
        &mut self,
        event: AppEvent,
        layout: LayoutContext,
        ctx: &ScreenContext,
    ) -> Result<ScreenAction> {
        match event {
            AppEvent::Resize(..) => {
                self.reload(ctx)?;
                Ok(ScreenAction::None)
            }
            AppEvent::ArchiveFinished(result) => {
                self.archive_pending = false;
                match result {
                    Ok(path) => {
                        info!(path = %path.display(), "archive complete");
                        self.status = Some(format!("Archive written to {}", path.display()));
                        Ok(ScreenAction::None)
                    }
                    Err(err) => {
                        self.archive_error = Some(err.to_string());
                        Ok(ScreenAction::LeaveAltScreen)
                    }
                }
            }
            AppEvent::Key(key) => self.handle_key(key, layout, ctx),
        }
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        _layout: LayoutContext,
        ctx: &ScreenContext,
    ) -> Result<ScreenAction> {
        self.status = None;
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), _) => {
                Ok(ScreenAction::Quit)
            }
            (KeyCode::Char('a'), _) => {
                // A fresh Add screen every time: no draft survives re-entry.
                let add = AddScreen::new(ctx)?;
                Ok(ScreenAction::Switch(ScreenState::Add(add)))
            }
            (KeyCode::Char('x'), _) => {
                self.remove_selected(ctx);
                Ok(ScreenAction::None)
            }
            (KeyCode::Char('z'), _) => {
                if self.archive_pending {
                    self.status = Some("An archive job is already running".to_string());
                    Ok(ScreenAction::None)
                } else {
                    self.archive_pending = true;
                    Ok(ScreenAction::StartArchive)
                }
            }
            (KeyCode::Up, _) => {
                self.move_cursor(-1);
                Ok(ScreenAction::None)
            }
            (KeyCode::Down, _) => {
                self.move_cursor(1);
                Ok(ScreenAction::None)
            }
            _ => Ok(ScreenAction::None),
        }
    }

    fn remove_selected(&mut self, ctx: &ScreenContext) {
        let Some(index) = self.cursor.selected() else {
            return;
        };
        let Some(record) = self.records.get(index) else {
            return;
        };
        match ctx.store.remove(&record.name) {
            Ok(()) => {
                self.records.remove(index);
                if self.records.is_empty() {
                    self.cursor.select(None);
                } else {
                    self.cursor.select(Some(index.min(self.records.len() - 1)));
                }
            }
            Err(err) => {
                warn!(%err, "remove failed");
                self.status = Some(err.to_string());
            }
        }
    }

    fn move_cursor(&mut self, step: isize) {
        if self.records.is_empty() {
            return;
        }
        let current = self.cursor.selected().unwrap_or(0) as isize;
        let last = self.records.len() as isize - 1;
        self.cursor.select(Some(current.saturating_add(step).clamp(0, last) as usize));
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let [list_area, status_area, help_area] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let items: Vec<ListItem> = self
            .records
            .iter()
            .map(|record| {
                ListItem::new(Text::from(vec![
                    Line::raw(record.name.clone()),
                    Line::styled(format!("  {}", record.path.display()), muted_style()),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(" Dots ")
                    .title_style(title_style()),
            )
            .highlight_style(selected_style())
            .highlight_symbol(LIST_HIGHLIGHT_SYMBOL);
        frame.render_stateful_widget(list, list_area, &mut self.cursor);

        let status_line = if let Some(err) = &self.archive_error {
            Line::styled(format!("Archive failed: {err}"), error_style())
        } else if let Some(status) = &self.status {
            Line::styled(status.clone(), status_style())
        } else if self.archive_pending {
            Line::styled("Archiving…", muted_style())
        } else {
            Line::raw("")
        };
        frame.render_widget(Paragraph::new(status_line), status_area);
        frame.render_widget(
            Paragraph::new(Line::styled(HELP_LINE, muted_style())),
            help_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveError;
    use crate::store::RecordStore;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn fixture() -> (TempDir, RecordStore) {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("dots.json"));
        store
            .save(&[
                DotfileRecord::new("vim", "/home/user/.config/vim"),
                DotfileRecord::new("zsh", "/home/user/.config/zsh"),
            ])
            .unwrap();
        (dir, store)
    }

    fn layout() -> LayoutContext {
        LayoutContext {
            width: 80,
            height: 24,
        }
    }

    #[test]
    fn constructs_from_store_contents() {
        let (dir, store) = fixture();
        let ctx = ScreenContext {
            store: &store,
            config_dir: dir.path(),
        };
        let screen = ListScreen::new(&ctx).unwrap();
        assert_eq!(screen.records().len(), 2);
        assert_eq!(screen.selected().unwrap().name, "vim");
    }

    #[test]
    fn remove_key_deletes_the_highlighted_record() {
        let (dir, store) = fixture();
        let ctx = ScreenContext {
            store: &store,
            config_dir: dir.path(),
        };
        let mut screen = ListScreen::new(&ctx).unwrap();
        screen.handle_event(key(KeyCode::Char('x')), layout(), &ctx).unwrap();

        assert_eq!(screen.records().len(), 1);
        assert_eq!(screen.selected().unwrap().name, "zsh");
        let left = store.load().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "zsh");
    }

    #[test]
    fn archive_key_starts_a_single_job() {
        let (dir, store) = fixture();
        let ctx = ScreenContext {
            store: &store,
            config_dir: dir.path(),
        };
        let mut screen = ListScreen::new(&ctx).unwrap();
        let action = screen.handle_event(key(KeyCode::Char('z')), layout(), &ctx).unwrap();
        assert!(matches!(action, ScreenAction::StartArchive));

        // A second press while pending is refused.
        let action = screen.handle_event(key(KeyCode::Char('z')), layout(), &ctx).unwrap();
        assert!(matches!(action, ScreenAction::None));
        assert!(screen.status().is_some());
    }

    #[test]
    fn a_job_inherited_from_an_earlier_screen_still_blocks_z() {
        let (dir, store) = fixture();
        let ctx = ScreenContext {
            store: &store,
            config_dir: dir.path(),
        };
        let mut screen = ListScreen::new(&ctx).unwrap();
        screen.set_archive_pending(true);

        let action = screen.handle_event(key(KeyCode::Char('z')), layout(), &ctx).unwrap();
        assert!(matches!(action, ScreenAction::None));
        assert!(screen.status().is_some());
    }

    #[test]
    fn archive_success_reports_the_output_path() {
        let (dir, store) = fixture();
        let ctx = ScreenContext {
            store: &store,
            config_dir: dir.path(),
        };
        let mut screen = ListScreen::new(&ctx).unwrap();
        screen.handle_event(key(KeyCode::Char('z')), layout(), &ctx).unwrap();

        let path = std::path::PathBuf::from("/home/user/dotfiles.zip");
        let action = screen
            .handle_event(AppEvent::ArchiveFinished(Ok(path)), layout(), &ctx)
            .unwrap();
        assert!(matches!(action, ScreenAction::None));
        assert_eq!(
            screen.status(),
            Some("Archive written to /home/user/dotfiles.zip")
        );

        // The job is done, so another one may start.
        let action = screen.handle_event(key(KeyCode::Char('z')), layout(), &ctx).unwrap();
        assert!(matches!(action, ScreenAction::StartArchive));
    }

    #[test]
    fn archive_failure_degrades_rendering() {
        let (dir, store) = fixture();
        let ctx = ScreenContext {
            store: &store,
            config_dir: dir.path(),
        };
        let mut screen = ListScreen::new(&ctx).unwrap();
        screen.handle_event(key(KeyCode::Char('z')), layout(), &ctx).unwrap();

        let failure = ArchiveError::Spawn(std::io::Error::other("zip not found"));
        let action = screen
            .handle_event(AppEvent::ArchiveFinished(Err(failure)), layout(), &ctx)
            .unwrap();
        assert!(matches!(action, ScreenAction::LeaveAltScreen));
        assert!(screen.archive_error.is_some());
    }

    #[test]
    fn quit_keys_terminate() {
        let (dir, store) = fixture();
        let ctx = ScreenContext {
            store: &store,
            config_dir: dir.path(),
        };
        let mut screen = ListScreen::new(&ctx).unwrap();
        let action = screen.handle_event(key(KeyCode::Char('q')), layout(), &ctx).unwrap();
        assert!(matches!(action, ScreenAction::Quit));
    }
}
