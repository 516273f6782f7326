pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod notes_pane;
pub mod stats_pane;
pub mod styles;
pub mod timer_pane;

use crate::app::AppState;
use crate::clock::Clock;
use crate::domain::UiMode;
use input_form::{render_input_form, render_note_form};
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use notes_pane::render_notes_pane;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use stats_pane::render_stats_pane;
use styles::{error_style, hint_style, modal_title_style};
use timer_pane::render_timer_pane;

/// Main render function - draws the entire UI
pub fn render<C: Clock>(f: &mut Frame, app: &AppState<C>) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, layout.keybindings_area, app.ui_mode);

    render_list_pane(f, app, layout.list_area);
    render_timer_pane(f, app, layout.timer_area);
    render_stats_pane(f, app, layout.stats_area);
    render_notes_pane(f, app, layout.notes_area);
    render_status_bar(f, app, layout.status_area);

    match app.ui_mode {
        UiMode::AddingTask => render_input_form(f, app, size),
        UiMode::AddingNote | UiMode::EditingNote => render_note_form(f, app, size),
        UiMode::Normal | UiMode::Searching => {}
    }
}

/// Search prompt while searching, otherwise the last message or filter summary
fn render_status_bar<C: Clock>(f: &mut Frame, app: &AppState<C>, area: Rect) {
    let line = if app.ui_mode == UiMode::Searching {
        Line::from(vec![
            Span::styled(" / ", modal_title_style()),
            Span::raw(app.filter.search.as_str()),
            Span::styled("█", modal_title_style()),
        ])
    } else if let (Some(message), UiMode::Normal) = (&app.status_message, app.ui_mode) {
        Line::from(Span::styled(format!(" {}", message), error_style()))
    } else if !app.filter.is_empty() {
        Line::from(Span::styled(format!(" filter: {}", app.filter.describe()), hint_style()))
    } else {
        Line::raw("")
    };
    f.render_widget(Paragraph::new(line), area);
}
