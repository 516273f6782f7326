use crate::clock::{Clock, DefaultClock};
use crate::domain::{visible_tasks, Note, NotePad, Priority, Task, TaskDraft, TaskFilter, TaskId, TaskStatus, UiMode};
use crate::lifecycle::LifecycleController;
use crate::notifications::{deliver_all, Notifier};
use crate::persistence::{save_notes, save_settings, save_tasks, Settings, META_FILE_NAME};
use crate::ticker::{Pacer, TICK_INTERVAL};
use anyhow::Result;
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

/// Which pane the selection keys move in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tasks,
    Notes,
}

/// Input form state for adding tasks
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub title: String,
    pub estimate: String, // Minutes, digits only
    pub tags: String,     // Comma-separated tags
    pub priority: Priority,
    pub editing_field: usize, // 0 = title, 1 = estimate, 2 = tags
}

impl InputFormState {
    pub const FIELD_COUNT: usize = 3;

    fn new(settings: &Settings) -> Self {
        Self {
            title: String::new(),
            estimate: settings.default_estimate_minutes.to_string(),
            tags: String::new(),
            priority: settings.default_priority,
            editing_field: 0,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.editing_field {
            1 => &mut self.estimate,
            2 => &mut self.tags,
            _ => &mut self.title,
        }
    }

    /// Build a validated draft from the typed fields
    fn to_draft(&self) -> std::result::Result<TaskDraft, String> {
        let minutes: u32 = self
            .estimate
            .trim()
            .parse()
            .map_err(|_| format!("Invalid estimate: '{}'", self.estimate.trim()))?;
        let mut draft = TaskDraft::new(self.title.clone(), minutes);
        draft.priority = self.priority;
        draft.tags = self.tags.split(',').map(str::to_string).collect();
        draft.validate().map_err(|e| e.to_string())
    }
}

/// Main application state
pub struct AppState<C: Clock = DefaultClock> {
    pub controller: LifecycleController<C>,
    pub notes: NotePad,
    pub settings: Settings,
    pub filter: TaskFilter,
    pub selected_index: usize,
    pub selected_note: usize,
    pub focus: Focus,
    pub ui_mode: UiMode,
    pub input_form: Option<InputFormState>,
    pub note_input: String,
    pub editing_note: Option<Uuid>,
    pub status_message: Option<String>,
    pub needs_save: bool, // Notes or settings changed
    saved_revision: u64,
    data_dir: Option<PathBuf>,
    notifier: Box<dyn Notifier>,
    pacer: Pacer,
}

impl<C: Clock> AppState<C> {
    /// `data_dir` of None keeps everything in memory
    pub fn new(
        mut controller: LifecycleController<C>,
        notes: Vec<Note>,
        settings: Settings,
        notifier: Box<dyn Notifier>,
        data_dir: Option<PathBuf>,
    ) -> Self {
        controller.set_notifications_enabled(settings.notifications_enabled);
        let saved_revision = controller.revision();
        Self {
            controller,
            notes: NotePad::new(notes),
            settings,
            filter: TaskFilter::default(),
            selected_index: 0,
            selected_note: 0,
            focus: Focus::Tasks,
            ui_mode: UiMode::Normal,
            input_form: None,
            note_input: String::new(),
            editing_note: None,
            status_message: None,
            needs_save: false,
            saved_revision,
            data_dir,
            notifier,
            pacer: Pacer::new(TICK_INTERVAL, Instant::now()),
        }
    }

    /// Tasks after filtering, in display order
    pub fn visible(&self) -> Vec<&Task> {
        visible_tasks(self.controller.tasks(), &self.filter)
    }

    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.visible().get(self.selected_index).map(|t| t.id)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_task_id().and_then(|id| self.controller.task(id))
    }

    pub fn selected_note_id(&self) -> Option<Uuid> {
        self.notes.notes.get(self.selected_note).map(|n| n.id)
    }

    /// Keep selections inside the visible lists after they shrink
    fn clamp_selection(&mut self) {
        let rows = self.visible().len();
        if self.selected_index >= rows {
            self.selected_index = rows.saturating_sub(1);
        }
        let notes = self.notes.notes.len();
        if self.selected_note >= notes {
            self.selected_note = notes.saturating_sub(1);
        }
    }

    /// Point the selection at a task if it is visible
    fn select_task(&mut self, id: TaskId) {
        if let Some(pos) = self.visible().iter().position(|t| t.id == id) {
            self.selected_index = pos;
        }
    }

    pub fn move_selection_up(&mut self) {
        match self.focus {
            Focus::Tasks => self.selected_index = self.selected_index.saturating_sub(1),
            Focus::Notes => self.selected_note = self.selected_note.saturating_sub(1),
        }
    }

    pub fn move_selection_down(&mut self) {
        match self.focus {
            Focus::Tasks => {
                if self.selected_index + 1 < self.visible().len() {
                    self.selected_index += 1;
                }
            }
            Focus::Notes => {
                if self.selected_note + 1 < self.notes.notes.len() {
                    self.selected_note += 1;
                }
            }
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Tasks => Focus::Notes,
            Focus::Notes => Focus::Tasks,
        };
    }

    /// Start (or resume) the selected task; the selection follows it
    pub fn start_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            if self.controller.start_task(id) {
                self.select_task(id);
            }
        }
    }

    pub fn pause_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.controller.pause_task(id);
        }
    }

    /// Enter: pause the selected task if it runs, start it otherwise
    pub fn toggle_run_pause(&mut self) {
        match self.selected_task() {
            Some(task) if task.status() == TaskStatus::InProgress => self.pause_selected(),
            Some(_) => self.start_selected(),
            None => {}
        }
    }

    pub fn complete_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            if self.controller.complete_task(id) {
                self.select_task(id);
            }
        }
        self.deliver_notifications();
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.controller.delete_task(id);
            self.clamp_selection();
        }
    }

    /// Start adding a new task (opens input form)
    pub fn start_add_task(&mut self) {
        self.input_form = Some(InputFormState::new(&self.settings));
        self.status_message = None;
        self.ui_mode = UiMode::AddingTask;
    }

    /// Cycle title -> estimate -> tags
    pub fn input_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.editing_field = (form.editing_field + 1) % InputFormState::FIELD_COUNT;
        }
    }

    pub fn input_form_cycle_priority(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.priority = form.priority.next();
        }
    }

    /// Add character to the current field; the estimate only takes digits
    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            if form.editing_field == 1 && !c.is_ascii_digit() {
                return;
            }
            form.field_mut().push(c);
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.field_mut().pop();
        }
    }

    /// Create the task; an invalid form stays open with a message
    pub fn submit_input_form(&mut self) {
        let Some(form) = self.input_form.as_ref() else {
            return;
        };
        match form.to_draft() {
            Ok(draft) => {
                let id = self.controller.create_task(draft);
                self.input_form = None;
                self.ui_mode = UiMode::Normal;
                self.status_message = None;
                self.select_task(id);
            }
            Err(message) => {
                tracing::debug!(%message, "task form rejected");
                self.status_message = Some(message);
            }
        }
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.status_message = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Search edits the filter live
    pub fn start_search(&mut self) {
        self.ui_mode = UiMode::Searching;
    }

    pub fn search_add_char(&mut self, c: char) {
        self.filter.search.push(c);
        self.selected_index = 0;
    }

    pub fn search_backspace(&mut self) {
        self.filter.search.pop();
        self.selected_index = 0;
    }

    /// Keep the term and return to normal mode
    pub fn finish_search(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    pub fn cancel_search(&mut self) {
        self.filter.search.clear();
        self.ui_mode = UiMode::Normal;
        self.clamp_selection();
    }

    pub fn cycle_status_filter(&mut self) {
        self.filter.status = TaskStatus::cycle(self.filter.status);
        self.selected_index = 0;
    }

    pub fn cycle_priority_filter(&mut self) {
        self.filter.priority = Priority::cycle(self.filter.priority);
        self.selected_index = 0;
    }

    pub fn clear_filters(&mut self) {
        self.filter = TaskFilter::default();
        self.clamp_selection();
    }

    pub fn start_add_note(&mut self) {
        self.note_input.clear();
        self.editing_note = None;
        self.ui_mode = UiMode::AddingNote;
    }

    /// Edit the selected note in place
    pub fn start_edit_note(&mut self) {
        let Some(note) = self.notes.notes.get(self.selected_note) else {
            return;
        };
        self.note_input = note.content.clone();
        self.editing_note = Some(note.id);
        self.ui_mode = UiMode::EditingNote;
    }

    pub fn note_input_add_char(&mut self, c: char) {
        self.note_input.push(c);
    }

    pub fn note_input_backspace(&mut self) {
        self.note_input.pop();
    }

    /// Blank content is ignored for a new note and rejected for an edit
    pub fn submit_note(&mut self) {
        let changed = match self.editing_note.take() {
            Some(id) => self.notes.edit(id, &self.note_input),
            None => {
                let added = self.notes.add(&self.note_input, self.controller.now()).is_some();
                if added {
                    self.selected_note = 0;
                }
                added
            }
        };
        if changed {
            self.needs_save = true;
        }
        self.note_input.clear();
        self.ui_mode = UiMode::Normal;
    }

    pub fn cancel_note(&mut self) {
        self.note_input.clear();
        self.editing_note = None;
        self.ui_mode = UiMode::Normal;
    }

    pub fn delete_selected_note(&mut self) {
        if let Some(id) = self.selected_note_id() {
            if self.notes.remove(id) {
                self.needs_save = true;
                self.clamp_selection();
            }
        }
    }

    pub fn toggle_notifications(&mut self) {
        let enabled = !self.settings.notifications_enabled;
        self.settings.notifications_enabled = enabled;
        self.controller.set_notifications_enabled(enabled);
        self.needs_save = true;
        tracing::info!(enabled, "notifications toggled");
    }

    /// Fire the countdown when the pacer says a second has passed
    pub fn tick(&mut self, now: Instant) {
        if self.pacer.due(self.controller.tick_handle(), now) {
            self.controller.tick();
        }
        self.deliver_notifications();
    }

    pub fn deliver_notifications(&mut self) {
        let events = self.controller.drain_events();
        if !events.is_empty() {
            deliver_all(self.notifier.as_ref(), &events);
        }
    }

    /// True when tasks, notes or settings changed since the last save
    pub fn is_dirty(&self) -> bool {
        self.needs_save || self.controller.revision() != self.saved_revision
    }

    /// Save state to disk
    pub fn save(&mut self) -> Result<()> {
        if let Some(dir) = &self.data_dir {
            save_tasks(dir, self.controller.tasks())?;
            save_notes(dir, &self.notes.notes)?;
            save_settings(dir.join(META_FILE_NAME), &self.settings)?;
        }
        self.saved_revision = self.controller.revision();
        self.needs_save = false;
        Ok(())
    }
}
