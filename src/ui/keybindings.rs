use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::Line, widgets::Paragraph, Frame};

/// Hint text for the current mode
pub fn hints(mode: UiMode) -> &'static str {
    match mode {
        UiMode::Normal => {
            " ↑/↓ select   Enter start/pause   s start   p pause   c complete   x delete   a add   \
             / search   f status   P priority   r reset   n note   e edit note   Tab focus   m alerts   q quit"
        }
        UiMode::AddingTask => " Tab next field   ↑/↓ priority   Enter create   Esc cancel",
        UiMode::Searching => " type to filter   Enter keep   Esc clear",
        UiMode::AddingNote | UiMode::EditingNote => " Enter save   Esc cancel",
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, area: Rect, mode: UiMode) {
    let paragraph = Paragraph::new(Line::raw(hints(mode))).style(hint_style());
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_follow_mode() {
        assert!(hints(UiMode::Normal).contains("q quit"));
        assert!(hints(UiMode::Searching).contains("Esc clear"));
        assert!(!hints(UiMode::AddingTask).contains("q quit"));
    }
}
