//! Add screen: search the configuration directory and build a pending
//! selection of records to persist.

use super::{AppEvent, LayoutContext, ScreenAction, ScreenContext, ScreenState};
use crate::screens::ListScreen;
use crate::store::DotfileRecord;
use crate::styles::{accent_style, muted_style, selected_style, LIST_HIGHLIGHT_SYMBOL};
use crate::suggest::SuggestionIndex;
use crate::widgets::{center_popup, TextInput, TextInputWidget};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const SHORT_HELP: [&str; 1] = ["ctrl+h help · ctrl+q cancel · ctrl+c quit"];
const FULL_HELP: [&str; 3] = [
    "↑/↓ move · ctrl+s save · ctrl+x delete",
    "ctrl+n/ctrl+p suggestion · → complete",
    "ctrl+h help · ctrl+q cancel · ctrl+c quit",
];

pub struct AddScreen {
    input: TextInput,
    index: SuggestionIndex,
    config_dir: PathBuf,
    /// Records assembled this session, not yet persisted.
    pending: Vec<DotfileRecord>,
    cursor: ListState,
    /// Where the next accepted suggestion is inserted.
    insert_at: usize,
    show_full_help: bool,
    archive_error: Option<String>,
}

impl AddScreen {
    /// Build against a fresh snapshot of the configuration directory.
    pub fn new(ctx: &ScreenContext) -> Result<Self> {
        let index = SuggestionIndex::build(ctx.config_dir)?;
        Ok(Self::with_index(index, ctx.config_dir))
    }

    /// Build from an existing index, without touching the filesystem.
    pub fn with_index(index: SuggestionIndex, config_dir: &Path) -> Self {
        let mut input = TextInput::new();
        input.focus();
        input.set_suggestions(index.keys().to_vec());
        Self {
            input,
            index,
            config_dir: config_dir.to_path_buf(),
            pending: Vec::new(),
            cursor: ListState::default(),
            insert_at: 0,
            show_full_help: false,
            archive_error: None,
        }
    }

    pub fn pending(&self) -> &[DotfileRecord] {
        &self.pending
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn archive_error(&self) -> Option<&str> {
        self.archive_error.as_deref()
    }

    pub fn handle_event(
        &mut self,
        event: AppEvent,
        _layout: LayoutContext,
        ctx: &ScreenContext,
    ) -> Result<ScreenAction> {
        self.input.clear_notice();
        match event {
            // Layout follows the frame area on the next draw.
            AppEvent::Resize(..) => Ok(ScreenAction::None),
            // A job started from the list can finish while this screen is
            // up. Success needs nothing here, but a failure degrades the
            // display exactly as it does on the list screen.
            AppEvent::ArchiveFinished(Ok(_)) => Ok(ScreenAction::None),
            AppEvent::ArchiveFinished(Err(err)) => {
                self.archive_error = Some(err.to_string());
                Ok(ScreenAction::LeaveAltScreen)
            }
            AppEvent::Key(key) => self.handle_key(key, ctx),
        }
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &ScreenContext) -> Result<ScreenAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Ok(ScreenAction::Quit),
            (KeyCode::Char('x'), KeyModifiers::CONTROL) => {
                self.remove_highlighted();
                Ok(ScreenAction::None)
            }
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
                let status = match ctx.store.save(&self.pending) {
                    Ok(()) => {
                        info!(count = self.pending.len(), "saved pending selection");
                        None
                    }
                    Err(err) => {
                        warn!(%err, "saving the pending selection failed");
                        Some(format!("Save failed: {err}"))
                    }
                };
                let list = ListScreen::with_status(ctx, status)?;
                Ok(ScreenAction::Switch(ScreenState::List(list)))
            }
            (KeyCode::Char('q'), KeyModifiers::CONTROL) => {
                let list = ListScreen::new(ctx)?;
                Ok(ScreenAction::Switch(ScreenState::List(list)))
            }
            (KeyCode::Char('h'), KeyModifiers::CONTROL) => {
                self.show_full_help = !self.show_full_help;
                Ok(ScreenAction::None)
            }
            (KeyCode::Enter, _) if self.input.is_focused() => {
                self.accept_input();
                Ok(ScreenAction::None)
            }
            (KeyCode::Esc, _) => {
                self.input.blur();
                Ok(ScreenAction::None)
            }
            (KeyCode::Up, _) => {
                self.move_cursor(-1);
                Ok(ScreenAction::None)
            }
            (KeyCode::Down, _) => {
                self.move_cursor(1);
                Ok(ScreenAction::None)
            }
            _ => {
                if !self.input.is_focused() {
                    if let KeyCode::Char(c) = key.code {
                        if c.is_ascii_alphanumeric() || c == '.' {
                            self.input.focus();
                        }
                    }
                }
                // Default: hand the raw key to the input widget.
                self.input.handle_key(key);
                Ok(ScreenAction::None)
            }
        }
    }

    /// Resolve the typed name and append it to the pending selection.
    ///
    /// Duplicates are checked against the pending selection only; the
    /// store-level merge on save catches duplicates across sessions.
    fn accept_input(&mut self) {
        let query = self.input.text().to_string();
        let Some(name) = self.index.resolve(&query).map(str::to_string) else {
            self.input.reject("Invalid Dotfile");
            return;
        };
        if self.pending.iter().any(|r| r.name == name) {
            self.input.reject("Duplicate Entry");
            return;
        }
        let record = DotfileRecord::new(&name, self.config_dir.join(&name));
        let at = self.insert_at.min(self.pending.len());
        self.pending.insert(at, record);
        self.insert_at += 1;
        if self.cursor.selected().is_none() {
            self.cursor.select(Some(0));
        }
        self.input.clear();
    }

    fn remove_highlighted(&mut self) {
        let Some(index) = self.cursor.selected() else {
            return;
        };
        if index >= self.pending.len() {
            return;
        }
        self.pending.remove(index);
        if self.pending.is_empty() {
            self.cursor.select(None);
        } else {
            self.cursor.select(Some(index.min(self.pending.len() - 1)));
        }
    }

    fn move_cursor(&mut self, step: isize) {
        if self.pending.is_empty() {
            return;
        }
        let current = self.cursor.selected().unwrap_or(0) as isize;
        let last = self.pending.len() as isize - 1;
        self.cursor.select(Some(current.saturating_add(step).clamp(0, last) as usize));
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let help: &[&str] = if self.show_full_help {
            &FULL_HELP
        } else {
            &SHORT_HELP
        };

        let popup = center_popup(frame.area(), 60, 70);
        frame.render_widget(Clear, popup);
        let dialog = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(accent_style());
        let inner = dialog.inner(popup);
        frame.render_widget(dialog, popup);

        let [input_area, list_area, help_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(help.len() as u16),
        ])
        .areas(inner);

        let widget = TextInputWidget::new(&self.input).prompt("SEARCH: ");
        if self.input.is_focused() {
            frame.set_cursor_position((input_area.x + widget.cursor_offset(), input_area.y));
        }
        frame.render_widget(widget, input_area);

        let items: Vec<ListItem> = self
            .pending
            .iter()
            .map(|record| ListItem::new(Line::raw(record.name.clone())))
            .collect();
        let list = List::new(items)
            .highlight_style(selected_style())
            .highlight_symbol(LIST_HIGHLIGHT_SYMBOL);
        frame.render_stateful_widget(list, list_area, &mut self.cursor);

        let help_lines: Vec<Line> = help
            .iter()
            .map(|line| Line::styled(*line, muted_style()))
            .collect();
        frame.render_widget(Paragraph::new(help_lines), help_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStore;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn layout() -> LayoutContext {
        LayoutContext {
            width: 80,
            height: 24,
        }
    }

    fn screen() -> AddScreen {
        let index = SuggestionIndex::from_names(["Vim".to_string(), "zsh".to_string()]);
        AddScreen::with_index(index, Path::new("/home/user/.config"))
    }

    fn type_name(screen: &mut AddScreen, ctx: &ScreenContext, name: &str) {
        for c in name.chars() {
            screen.handle_event(key(KeyCode::Char(c)), layout(), ctx).unwrap();
        }
        screen.handle_event(key(KeyCode::Enter), layout(), ctx).unwrap();
    }

    fn store_ctx(dir: &TempDir) -> (RecordStore, PathBuf) {
        (RecordStore::new(dir.path().join("dots.json")), dir.path().to_path_buf())
    }

    #[test]
    fn resolved_name_joins_the_pending_selection() {
        let dir = TempDir::new().unwrap();
        let (store, config_dir) = store_ctx(&dir);
        let ctx = ScreenContext {
            store: &store,
            config_dir: &config_dir,
        };
        let mut screen = screen();
        type_name(&mut screen, &ctx, "vim");

        assert_eq!(screen.pending().len(), 1);
        assert_eq!(screen.pending()[0].name, "Vim");
        assert_eq!(
            screen.pending()[0].path,
            Path::new("/home/user/.config/Vim")
        );
        assert_eq!(screen.input().text(), "");
    }

    #[test]
    fn duplicate_pending_entry_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (store, config_dir) = store_ctx(&dir);
        let ctx = ScreenContext {
            store: &store,
            config_dir: &config_dir,
        };
        let mut screen = screen();
        type_name(&mut screen, &ctx, "vim");
        type_name(&mut screen, &ctx, "VIM");

        assert_eq!(screen.pending().len(), 1);
        assert_eq!(screen.input().notice(), Some("Duplicate Entry"));
    }

    #[test]
    fn unresolved_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (store, config_dir) = store_ctx(&dir);
        let ctx = ScreenContext {
            store: &store,
            config_dir: &config_dir,
        };
        let mut screen = screen();
        type_name(&mut screen, &ctx, "bash");

        assert!(screen.pending().is_empty());
        assert_eq!(screen.input().notice(), Some("Invalid Dotfile"));
    }

    #[test]
    fn typing_refocuses_a_blurred_input() {
        let dir = TempDir::new().unwrap();
        let (store, config_dir) = store_ctx(&dir);
        let ctx = ScreenContext {
            store: &store,
            config_dir: &config_dir,
        };
        let mut screen = screen();
        screen.handle_event(key(KeyCode::Esc), layout(), &ctx).unwrap();
        assert!(!screen.input().is_focused());

        screen.handle_event(key(KeyCode::Char('v')), layout(), &ctx).unwrap();
        assert!(screen.input().is_focused());
        assert_eq!(screen.input().text(), "v");
    }

    #[test]
    fn ctrl_x_removes_the_highlighted_entry() {
        let dir = TempDir::new().unwrap();
        let (store, config_dir) = store_ctx(&dir);
        let ctx = ScreenContext {
            store: &store,
            config_dir: &config_dir,
        };
        let mut screen = screen();
        type_name(&mut screen, &ctx, "vim");
        type_name(&mut screen, &ctx, "zsh");

        screen.handle_event(ctrl('x'), layout(), &ctx).unwrap();
        assert_eq!(screen.pending().len(), 1);
        assert_eq!(screen.pending()[0].name, "zsh");
    }

    #[test]
    fn save_persists_and_returns_to_the_list() {
        let dir = TempDir::new().unwrap();
        let (store, config_dir) = store_ctx(&dir);
        let ctx = ScreenContext {
            store: &store,
            config_dir: &config_dir,
        };
        let mut screen = screen();
        type_name(&mut screen, &ctx, "vim");

        let action = screen.handle_event(ctrl('s'), layout(), &ctx).unwrap();
        let ScreenAction::Switch(ScreenState::List(list)) = action else {
            panic!("expected a switch to the list screen");
        };
        assert_eq!(list.records().len(), 1);
        assert_eq!(list.records()[0].name, "Vim");
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn archive_failure_while_adding_degrades_rendering() {
        use crate::archive::ArchiveError;

        let dir = TempDir::new().unwrap();
        let (store, config_dir) = store_ctx(&dir);
        let ctx = ScreenContext {
            store: &store,
            config_dir: &config_dir,
        };
        let mut screen = screen();

        let failure = ArchiveError::Spawn(std::io::Error::other("zip not found"));
        let action = screen
            .handle_event(AppEvent::ArchiveFinished(Err(failure)), layout(), &ctx)
            .unwrap();
        assert!(matches!(action, ScreenAction::LeaveAltScreen));
        assert!(screen.archive_error().is_some());
    }

    #[test]
    fn cancel_discards_the_pending_selection() {
        let dir = TempDir::new().unwrap();
        let (store, config_dir) = store_ctx(&dir);
        let ctx = ScreenContext {
            store: &store,
            config_dir: &config_dir,
        };
        let mut screen = screen();
        type_name(&mut screen, &ctx, "vim");

        let action = screen.handle_event(ctrl('q'), layout(), &ctx).unwrap();
        let ScreenAction::Switch(ScreenState::List(list)) = action else {
            panic!("expected a switch to the list screen");
        };
        assert!(list.records().is_empty());
        assert!(store.load().unwrap().is_empty());
    }
}
