use crate::app::{AppState, Focus};
use crate::clock::Clock;
use crate::domain::UiMode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events; returns true when the app should quit
pub fn handle_key<C: Clock>(app: &mut AppState<C>, key: KeyEvent) -> bool {
    // Ctrl+C quits from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask => handle_input_form_mode(app, key),
        UiMode::Searching => handle_search_mode(app, key),
        UiMode::AddingNote | UiMode::EditingNote => handle_note_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode<C: Clock>(app: &mut AppState<C>, key: KeyEvent) -> bool {
    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
        KeyCode::Tab => app.toggle_focus(),

        // Lifecycle
        KeyCode::Enter => app.toggle_run_pause(),
        KeyCode::Char('s') => app.start_selected(),
        KeyCode::Char('p') => app.pause_selected(),
        KeyCode::Char('c') => app.complete_selected(),
        KeyCode::Char('a') => app.start_add_task(),

        // Delete acts on whichever pane has focus
        KeyCode::Char('x') | KeyCode::Delete => match app.focus {
            Focus::Tasks => app.delete_selected(),
            Focus::Notes => app.delete_selected_note(),
        },

        // Filters
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('f') => app.cycle_status_filter(),
        KeyCode::Char('P') => app.cycle_priority_filter(),
        KeyCode::Char('r') | KeyCode::Esc => app.clear_filters(),

        // Notes
        KeyCode::Char('n') => app.start_add_note(),
        KeyCode::Char('e') => {
            if app.focus == Focus::Notes {
                app.start_edit_note();
            }
        }

        KeyCode::Char('m') => app.toggle_notifications(),

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,

        _ => {}
    }
    false
}

/// Handle keys in input form mode
fn handle_input_form_mode<C: Clock>(app: &mut AppState<C>, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => app.submit_input_form(),
        KeyCode::Esc => app.cancel_input_form(),
        // Switch between title, estimate and tags
        KeyCode::Tab => app.input_form_toggle_field(),
        KeyCode::Up | KeyCode::Down => app.input_form_cycle_priority(),
        KeyCode::Backspace => app.input_form_backspace(),
        KeyCode::Char(c) => app.input_form_add_char(c),
        _ => {}
    }
    false
}

/// Handle keys while typing a search term
fn handle_search_mode<C: Clock>(app: &mut AppState<C>, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => app.finish_search(),
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Char(c) => app.search_add_char(c),
        _ => {}
    }
    false
}

/// Handle keys while writing or editing a note
fn handle_note_mode<C: Clock>(app: &mut AppState<C>, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => app.submit_note(),
        KeyCode::Esc => app.cancel_note(),
        KeyCode::Backspace => app.note_input_backspace(),
        KeyCode::Char(c) => app.note_input_add_char(c),
        _ => {}
    }
    false
}
