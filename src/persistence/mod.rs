pub mod files;
pub mod metadata;
pub mod snapshot;

pub use files::{atomic_write, ensure_data_dir, init_local_data_dir, log_file, report_file, META_FILE_NAME};
pub use metadata::{load_settings, save_settings, Settings};
pub use snapshot::{load_notes, load_tasks, save_notes, save_tasks};
