//! Styling constants shared by both screens.

use ratatui::style::{Color, Modifier, Style};

/// Main accent color (borders, prompts, titles).
pub const ACCENT: Color = Color::Rgb(0x87, 0x4b, 0xfd);
/// Placeholder text in an idle input.
pub const PLACEHOLDER_DEFAULT: Color = Color::Rgb(0x64, 0x64, 0x66);
/// Placeholder text after a rejected entry.
pub const PLACEHOLDER_ERROR: Color = Color::Rgb(0xa0, 0x32, 0x32);

/// List selection indicator shown next to the selected item.
pub const LIST_HIGHLIGHT_SYMBOL: &str = "» ";

pub fn accent_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn placeholder_style() -> Style {
    Style::default().fg(PLACEHOLDER_DEFAULT)
}

pub fn placeholder_error_style() -> Style {
    Style::default().fg(PLACEHOLDER_ERROR)
}

pub fn muted_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

pub fn status_style() -> Style {
    Style::default().fg(Color::Green)
}

pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}
