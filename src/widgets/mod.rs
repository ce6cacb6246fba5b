//! Reusable UI widgets.

pub mod text_input;

pub use text_input::{TextInput, TextInputWidget};

use ratatui::layout::Rect;

/// Center a popup of the given percentage size within `area`.
pub fn center_popup(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    // Widened so very wide terminals do not overflow the multiply.
    let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
    let height = (u32::from(area.height) * u32::from(percent_y) / 100) as u16;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_popup_is_centered() {
        let popup = center_popup(Rect::new(0, 0, 100, 50), 60, 70);
        assert_eq!(popup, Rect::new(20, 7, 60, 35));
    }

    #[test]
    fn center_popup_handles_a_very_wide_terminal() {
        let popup = center_popup(Rect::new(0, 0, 1200, 1000), 60, 70);
        assert_eq!(popup, Rect::new(240, 150, 720, 700));
    }
}
