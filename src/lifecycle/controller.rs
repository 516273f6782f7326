use super::store::TaskStore;
use crate::clock::Clock;
use crate::domain::{Task, TaskDraft, TaskId};
use crate::notifications::{NotificationEvent, NotificationTrigger};
use crate::report::stats::{calculate_stats, TaskStats};
use crate::ticker::{LiveCounters, TickDriver, TickHandle};
use chrono::{DateTime, Utc};

/// Owns the task store and enforces every lifecycle transition.
///
/// Invariants kept here:
/// - at most one task is running, and `active` points at it;
/// - the tick driver is scheduled iff `active` is set, for that task;
/// - `active_secs` is written only by pause and complete.
pub struct LifecycleController<C: Clock> {
    store: TaskStore,
    active: Option<TaskId>,
    driver: TickDriver,
    trigger: NotificationTrigger,
    clock: C,
    outbox: Vec<NotificationEvent>,
}

impl<C: Clock> LifecycleController<C> {
    pub fn new(clock: C) -> Self {
        Self {
            store: TaskStore::default(),
            active: None,
            driver: TickDriver::new(),
            trigger: NotificationTrigger::default(),
            clock,
            outbox: Vec::new(),
        }
    }

    /// Rebuild from persisted records.
    ///
    /// A task stored as running stays running: it becomes the active task and
    /// the live counters include the seconds since its last resume. If several
    /// tasks claim to be running, only the most recently resumed one keeps going.
    pub fn restore(tasks: Vec<Task>, clock: C) -> Self {
        let mut controller = Self::new(clock);
        controller.store = TaskStore::new(tasks);

        let mut running: Vec<&Task> = controller.store.tasks().iter().filter(|t| t.is_running()).collect();
        running.sort_by_key(|t| match t.state {
            crate::domain::RunState::Running { since } => since,
            _ => t.created_at,
        });
        let keep = running.last().map(|t| t.id);
        let extras: Vec<TaskId> = running.iter().map(|t| t.id).filter(|id| Some(*id) != keep).collect();

        let now = controller.clock.utc();
        for id in extras {
            tracing::warn!(task = %id, "more than one running task on load; pausing");
            controller.store.update(id, |t| t.pause(now));
        }

        if let Some(id) = keep {
            controller.active = Some(id);
            if let Some(task) = controller.store.get(id) {
                let elapsed = task.active_secs_signed() + task.unfolded_secs(now) as i64;
                let counters = LiveCounters {
                    elapsed,
                    remaining: task.estimated_secs() - elapsed,
                };
                controller.driver.schedule(id, counters);
            }
        }
        controller
    }

    /// Current time from the injected clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    pub fn active_task_id(&self) -> Option<TaskId> {
        self.active
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.active.and_then(|id| self.store.get(id))
    }

    pub fn live_counters(&self) -> Option<LiveCounters> {
        self.driver.counters()
    }

    /// Handle of the current countdown schedule, if any
    pub fn tick_handle(&self) -> Option<TickHandle> {
        self.driver.current()
    }

    /// Store revision; moves on every effective mutation
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    pub fn stats(&self) -> TaskStats {
        calculate_stats(self.store.tasks())
    }

    pub fn notifications_enabled(&self) -> bool {
        self.trigger.enabled()
    }

    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        self.trigger.set_enabled(enabled);
    }

    /// Take the notification events raised since the last call
    pub fn drain_events(&mut self) -> Vec<NotificationEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Find a task by a unique prefix of its id
    pub fn resolve(&self, prefix: &str) -> Option<TaskId> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return None;
        }
        let mut matches = self.store.tasks().iter().filter(|t| {
            let full = t.id.to_string();
            full.starts_with(&prefix) || full.replace('-', "").starts_with(&prefix)
        });
        let first = matches.next()?;
        if matches.next().is_some() {
            tracing::debug!(%prefix, "ambiguous task id prefix");
            return None;
        }
        Some(first.id)
    }

    /// Insert a new NotStarted task
    pub fn create_task(&mut self, draft: TaskDraft) -> TaskId {
        let task = Task::from_draft(draft, self.clock.utc());
        let id = task.id;
        tracing::info!(task = %id, title = %task.title, "task created");
        self.store.insert(task);
        id
    }

    /// Make `id` the active task, pausing whatever was running before
    pub fn start_task(&mut self, id: TaskId) -> bool {
        let Some(target) = self.store.get(id) else {
            tracing::debug!(task = %id, "start ignored: unknown task");
            return false;
        };
        if target.is_completed() || target.is_running() {
            tracing::debug!(task = %id, status = ?target.status(), "start ignored");
            return false;
        }

        if let Some(previous) = self.active {
            self.pause_task(previous);
        }

        let now = self.clock.utc();
        if !self.store.update(id, |t| t.begin(now)) {
            return false;
        }
        self.active = Some(id);

        if let Some(task) = self.store.get(id) {
            let counters = LiveCounters {
                elapsed: task.active_secs_signed(),
                remaining: task.remaining_secs(),
            };
            self.driver.schedule(id, counters);
            tracing::info!(task = %id, remaining = counters.remaining, "task started");
        }
        true
    }

    /// Fold the running span into active time and open a break
    pub fn pause_task(&mut self, id: TaskId) -> bool {
        let now = self.clock.utc();
        if !self.store.update(id, |t| t.pause(now)) {
            tracing::debug!(task = %id, "pause ignored");
            return false;
        }
        if self.active == Some(id) {
            self.active = None;
            self.driver.cancel();
        }
        tracing::info!(task = %id, "task paused");
        true
    }

    /// Finish a task; repeated calls are no-ops
    pub fn complete_task(&mut self, id: TaskId) -> bool {
        let now = self.clock.utc();
        if !self.store.update(id, |t| t.complete(now)) {
            tracing::debug!(task = %id, "complete ignored");
            return false;
        }
        tracing::info!(task = %id, "task completed");

        if self.active == Some(id) {
            self.active = None;
            self.driver.cancel();
            if let Some(event) = self.store.get(id).and_then(|t| self.trigger.on_completed(t)) {
                self.outbox.push(event);
            }
        }
        true
    }

    /// Remove a task from any state
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        if self.active == Some(id) {
            self.active = None;
            self.driver.cancel();
        }
        let removed = self.store.remove(id).is_some();
        if removed {
            tracing::info!(task = %id, "task deleted");
        }
        removed
    }

    /// Fire one countdown tick; returns the new counters if a task is active
    pub fn tick(&mut self) -> Option<LiveCounters> {
        let event = self.driver.fire()?;
        if let Some(task) = self.store.get(event.task_id) {
            if let Some(notification) = self.trigger.on_tick(task, event.counters.remaining) {
                tracing::info!(task = %event.task_id, "estimate reached");
                self.outbox.push(notification);
            }
        }
        Some(event.counters)
    }
}
