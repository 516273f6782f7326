use crate::app::{AppState, Focus};
use crate::clock::Clock;
use crate::ui::styles::{border_style, focused_border_style, hint_style, note_style, selected_style, title_style};
use ratatui::{
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the scratch-pad notes, newest first
pub fn render_notes_pane<C: Clock>(f: &mut Frame, app: &AppState<C>, area: Rect) {
    let focused = app.focus == Focus::Notes;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused { focused_border_style() } else { border_style() })
        .title(Span::styled(format!(" Notes ({}) ", app.notes.notes.len()), title_style()));

    if app.notes.notes.is_empty() {
        let empty = Paragraph::new(Span::styled("n to jot something down", hint_style())).block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .notes
        .notes
        .iter()
        .map(|note| ListItem::new(Span::styled(format!("▌ {}", note.content), note_style(note.color))))
        .collect();

    let mut list = List::new(items).block(block);
    let mut state = ListState::default();
    if focused {
        list = list.highlight_style(selected_style());
        state.select(Some(app.selected_note));
    }
    f.render_stateful_widget(list, area, &mut state);
}
