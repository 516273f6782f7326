use crate::domain::{NoteColor, Priority, TaskStatus};
use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Running status badge style
pub fn running_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

/// Paused status badge style
pub fn paused_style() -> Style {
    Style::default().fg(Color::Yellow)
}

/// Not-started status badge style
pub fn idle_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Done/completed task style
pub fn done_style() -> Style {
    Style::default().fg(Color::Green)
}

pub fn status_style(status: TaskStatus) -> Style {
    match status {
        TaskStatus::InProgress => running_style(),
        TaskStatus::Paused => paused_style(),
        TaskStatus::NotStarted => idle_style(),
        TaskStatus::Completed => done_style(),
    }
}

pub fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::Low => Style::default().fg(Color::DarkGray),
        Priority::Medium => Style::default().fg(Color::Blue),
        Priority::High => Style::default().fg(Color::Yellow),
        Priority::Urgent => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

pub fn note_style(color: NoteColor) -> Style {
    let fg = match color {
        NoteColor::Yellow => Color::Yellow,
        NoteColor::Pink => Color::LightMagenta,
        NoteColor::Blue => Color::LightBlue,
        NoteColor::Green => Color::LightGreen,
        NoteColor::Purple => Color::Magenta,
    };
    Style::default().fg(fg)
}

/// Over-estimate warning style
pub fn over_estimate_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Border of the pane that has focus
pub fn focused_border_style() -> Style {
    Style::default().fg(Color::LightCyan)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Countdown gauge style
pub fn gauge_style() -> Style {
    Style::default().fg(Color::Green).bg(Color::DarkGray)
}

/// Error message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Tag badge style
pub fn tag_style() -> Style {
    Style::default().fg(Color::Blue)
}
