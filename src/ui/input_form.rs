use crate::app::AppState;
use crate::clock::Clock;
use crate::domain::UiMode;
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style, priority_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// One labelled text field with a cursor when it is being edited
fn field_lines<'a>(label: &'a str, value: &'a str, editing: bool) -> [Line<'a>; 3] {
    let label = if editing {
        Line::raw(format!("{} (editing)", label))
    } else {
        Line::raw(label)
    };
    let value_line = Line::from(vec![
        Span::raw("> "),
        Span::styled(value, modal_title_style()),
        if editing {
            Span::styled("█", modal_title_style()) // Cursor
        } else {
            Span::raw("")
        },
    ]);
    [label, value_line, Line::raw("")]
}

/// Render the input form for adding tasks
pub fn render_input_form<C: Clock>(f: &mut Frame, app: &AppState<C>, area: Rect) {
    let Some(form) = &app.input_form else {
        return;
    };
    let modal_area = create_modal_area(area);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let mut lines = vec![Line::raw("")];
    lines.extend(field_lines("Title:", &form.title, form.editing_field == 0));
    lines.extend(field_lines("Estimate (minutes):", &form.estimate, form.editing_field == 1));
    lines.extend(field_lines("Tags (comma-separated):", &form.tags, form.editing_field == 2));
    lines.push(Line::from(vec![
        Span::raw("Priority: "),
        Span::styled(form.priority.label(), priority_style(form.priority)),
        Span::raw("  (↑/↓ to change)"),
    ]));
    lines.push(Line::raw(""));

    if let Some(message) = &app.status_message {
        lines.push(Line::from(Span::styled(message.as_str(), error_style())));
    }
    lines.push(Line::raw("Tab to switch fields  ·  Enter to submit  ·  Esc to cancel"));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Add Task ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the single-line form for writing or editing a note
pub fn render_note_form<C: Clock>(f: &mut Frame, app: &AppState<C>, area: Rect) {
    let title = match app.ui_mode {
        UiMode::EditingNote => " Edit Note ",
        UiMode::AddingNote => " New Note ",
        _ => return,
    };
    let modal_area = create_modal_area(area);
    f.render_widget(Clear, modal_area);

    let mut lines = vec![Line::raw("")];
    lines.extend(field_lines("Note:", &app.note_input, true));
    lines.push(Line::raw("Enter to save  ·  Esc to cancel"));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
