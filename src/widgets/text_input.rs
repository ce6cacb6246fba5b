//! Single-line text input with suggestion-based autocomplete.
//!
//! The input owns its text, cursor, and focus flag, plus a pool of
//! lowercased suggestion candidates. Candidates are prefix-matched against
//! the current text; `ctrl+n`/`ctrl+p` cycle through the matches and `→` at
//! the end of the line accepts the current one. A transient notice replaces
//! the placeholder after a rejected entry and is cleared on the next event.

use crate::styles::{accent_style, placeholder_error_style, placeholder_style};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

/// Maximum number of characters accepted by the input.
const CHAR_LIMIT: usize = 15;

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    text: String,
    cursor: usize,
    focused: bool,
    notice: Option<&'static str>,
    suggestions: Vec<String>,
    picked: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Replace the autocomplete candidate pool (lowercased names).
    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
        self.picked = 0;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.picked = 0;
    }

    /// Clear the text and show a transient error placeholder.
    pub fn reject(&mut self, notice: &'static str) {
        self.clear();
        self.notice = Some(notice);
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    /// Drop the transient notice; called at the start of every event.
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Suggestions whose key starts with the current text (lowercased).
    fn matches(&self) -> Vec<&str> {
        let prefix = self.text.to_lowercase();
        self.suggestions
            .iter()
            .filter(|s| s.starts_with(&prefix))
            .map(String::as_str)
            .collect()
    }

    /// The match currently offered for completion.
    pub fn current_suggestion(&self) -> Option<&str> {
        let matches = self.matches();
        if matches.is_empty() {
            None
        } else {
            Some(matches[self.picked % matches.len()])
        }
    }

    /// The part of the current suggestion not yet typed.
    pub fn suggestion_remainder(&self) -> Option<String> {
        let typed = self.text.chars().count();
        self.current_suggestion()
            .map(|s| s.chars().skip(typed).collect::<String>())
            .filter(|rest| !rest.is_empty())
    }

    /// Replace the text with the current suggestion.
    pub fn accept_suggestion(&mut self) {
        if let Some(suggestion) = self.current_suggestion().map(str::to_string) {
            self.text = suggestion;
            self.cursor = self.text.chars().count();
        }
    }

    fn next_suggestion(&mut self) {
        let count = self.matches().len();
        if count > 0 {
            self.picked = (self.picked + 1) % count;
        }
    }

    fn prev_suggestion(&mut self) {
        let count = self.matches().len();
        if count > 0 {
            self.picked = (self.picked + count - 1) % count;
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if self.text.chars().count() >= CHAR_LIMIT {
            return;
        }
        let at = byte_index(&self.text, self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
        self.picked = 0;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let at = byte_index(&self.text, self.cursor - 1);
            self.text.remove(at);
            self.cursor -= 1;
            self.picked = 0;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let at = byte_index(&self.text, self.cursor);
            self.text.remove(at);
            self.picked = 0;
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Handle an editing or autocomplete key.
    ///
    /// Returns true when the key was consumed. Ignores everything while
    /// the input is unfocused.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if !self.focused {
            return false;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Char('n'), KeyModifiers::CONTROL) => self.next_suggestion(),
            (KeyCode::Char('p'), KeyModifiers::CONTROL) => self.prev_suggestion(),
            (KeyCode::Right, _) if self.cursor == self.text.chars().count() => {
                self.accept_suggestion();
            }
            (KeyCode::Char(c), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert_char(c);
            }
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Left, _) => self.move_left(),
            (KeyCode::Right, _) => self.move_right(),
            (KeyCode::Home, _) => self.move_home(),
            (KeyCode::End, _) => self.move_end(),
            _ => return false,
        }
        true
    }
}

fn byte_index(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map_or(text.len(), |(i, _)| i)
}

/// Renders a [`TextInput`] as a prompt line with ghost-text completion.
pub struct TextInputWidget<'a> {
    input: &'a TextInput,
    prompt: &'a str,
}

impl<'a> TextInputWidget<'a> {
    pub fn new(input: &'a TextInput) -> Self {
        Self { input, prompt: "" }
    }

    pub fn prompt(mut self, prompt: &'a str) -> Self {
        self.prompt = prompt;
        self
    }

    /// Column of the cursor relative to the widget's left edge.
    pub fn cursor_offset(&self) -> u16 {
        (self.prompt.chars().count() + self.input.cursor()) as u16
    }
}

impl Widget for TextInputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(self.prompt, accent_style())];
        if self.input.text().is_empty() {
            if let Some(notice) = self.input.notice() {
                spans.push(Span::styled(notice, placeholder_error_style()));
            } else if let Some(suggestion) = self.input.current_suggestion() {
                spans.push(Span::styled(suggestion.to_string(), placeholder_style()));
            }
        } else {
            spans.push(Span::raw(self.input.text()));
            if let Some(rest) = self.input.suggestion_remainder() {
                spans.push(Span::styled(rest, placeholder_style()));
            }
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn typed(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_and_editing() {
        let mut input = TextInput::new();
        input.focus();
        typed(&mut input, "vim");
        assert_eq!(input.text(), "vim");
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.text(), "vi");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn unfocused_input_ignores_keys() {
        let mut input = TextInput::new();
        assert!(!input.handle_key(key(KeyCode::Char('v'))));
        assert_eq!(input.text(), "");
    }

    #[test]
    fn char_limit_is_enforced() {
        let mut input = TextInput::new();
        input.focus();
        typed(&mut input, "abcdefghijklmnopqrst");
        assert_eq!(input.text().chars().count(), 15);
    }

    #[test]
    fn suggestions_prefix_match_and_cycle() {
        let mut input = TextInput::new();
        input.focus();
        input.set_suggestions(vec!["nvim".into(), "vim".into(), "zsh".into()]);
        typed(&mut input, "v");
        assert_eq!(input.current_suggestion(), Some("vim"));
        input.handle_key(ctrl('n'));
        assert_eq!(input.current_suggestion(), Some("vim"));

        input.clear();
        assert_eq!(input.current_suggestion(), Some("nvim"));
        input.handle_key(ctrl('n'));
        assert_eq!(input.current_suggestion(), Some("vim"));
        input.handle_key(ctrl('p'));
        assert_eq!(input.current_suggestion(), Some("nvim"));
    }

    #[test]
    fn right_at_end_accepts_the_suggestion() {
        let mut input = TextInput::new();
        input.focus();
        input.set_suggestions(vec!["starship.toml".into()]);
        typed(&mut input, "star");
        input.handle_key(key(KeyCode::Right));
        assert_eq!(input.text(), "starship.toml");
        assert_eq!(input.cursor(), "starship.toml".chars().count());
    }

    #[test]
    fn reject_clears_text_and_sets_notice() {
        let mut input = TextInput::new();
        input.focus();
        typed(&mut input, "bogus");
        input.reject("Invalid Dotfile");
        assert_eq!(input.text(), "");
        assert_eq!(input.notice(), Some("Invalid Dotfile"));
        input.clear_notice();
        assert_eq!(input.notice(), None);
    }
}
