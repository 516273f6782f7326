pub mod enums;
pub mod note;
pub mod task;
pub mod views;

pub use enums::{Priority, TaskStatus, UiMode};
pub use note::{Note, NoteColor, NotePad};
pub use task::{RunState, Task, TaskDraft, TaskId};
pub use views::{
    format_countdown, format_duration, format_hms, progress_ratio, status_badge, visible_tasks,
    TaskFilter,
};
