//! Notification events raised by the lifecycle core, and their delivery.
//!
//! The trigger only decides *when* something is worth announcing. Delivery
//! (desktop popup, sound) is behind [`Notifier`] so failures stay out of the
//! time-accounting code.

use crate::domain::Task;
use anyhow::Result;
use notify_rust::{Notification, Timeout};

/// Icon name used for the estimate-reached alert
pub const TIME_COMPLETE_ICON: &str = "alarm-clock";
/// Icon name used for the task-completed alert
pub const TASK_COMPLETED_ICON: &str = "emblem-default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    TimeComplete,
    TaskCompleted,
}

/// Abstract alert handed to a delivery collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub icon: &'static str,
}

impl NotificationEvent {
    pub fn time_complete(task: &Task) -> Self {
        Self {
            kind: NotificationKind::TimeComplete,
            title: "Task Time Complete".to_string(),
            body: format!("Estimated time for \"{}\" has been reached.", task.title),
            icon: TIME_COMPLETE_ICON,
        }
    }

    pub fn task_completed(task: &Task) -> Self {
        Self {
            kind: NotificationKind::TaskCompleted,
            title: "Task Completed".to_string(),
            body: format!("Great job! You've completed: {}", task.title),
            icon: TASK_COMPLETED_ICON,
        }
    }
}

/// Watches countdown ticks and lifecycle outcomes
#[derive(Debug, Clone)]
pub struct NotificationTrigger {
    enabled: bool,
}

impl Default for NotificationTrigger {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl NotificationTrigger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Called after every fired tick. Ticks move `remaining` by exactly one,
    /// so hitting zero happens once per schedule.
    pub fn on_tick(&self, task: &Task, remaining: i64) -> Option<NotificationEvent> {
        if self.enabled && remaining == 0 {
            Some(NotificationEvent::time_complete(task))
        } else {
            None
        }
    }

    /// Called when a complete actually finished the task that was active
    pub fn on_completed(&self, task: &Task) -> Option<NotificationEvent> {
        self.enabled.then(|| NotificationEvent::task_completed(task))
    }
}

/// Delivery collaborator for notification events
pub trait Notifier {
    fn deliver(&self, event: &NotificationEvent) -> Result<()>;
}

/// Desktop notification with a sound hint
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for DesktopNotifier {
    fn deliver(&self, event: &NotificationEvent) -> Result<()> {
        Notification::new()
            .appname("taskflow")
            .summary(&event.title)
            .body(&event.body)
            .icon(event.icon)
            .sound_name("message-new-instant")
            .timeout(Timeout::Milliseconds(5000))
            .show()?;
        Ok(())
    }
}

/// Deliver every event, logging failures instead of propagating them
pub fn deliver_all(notifier: &dyn Notifier, events: &[NotificationEvent]) {
    for event in events {
        tracing::info!(kind = ?event.kind, title = %event.title, "delivering notification");
        if let Err(e) = notifier.deliver(event) {
            tracing::warn!(error = %e, "failed to deliver notification");
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Notifier that records what it was asked to deliver. Clones share the log.
    #[derive(Default, Clone)]
    pub struct RecordingNotifier {
        pub delivered: Rc<RefCell<Vec<NotificationEvent>>>,
        pub fail: bool,
    }

    impl Notifier for RecordingNotifier {
        fn deliver(&self, event: &NotificationEvent) -> Result<()> {
            if self.fail {
                anyhow::bail!("notification daemon unavailable");
            }
            self.delivered.borrow_mut().push(event.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;
    use crate::domain::TaskDraft;
    use chrono::Utc;

    fn task() -> Task {
        Task::from_draft(TaskDraft::new("Inbox zero", 1).validate().unwrap(), Utc::now())
    }

    #[test]
    fn test_on_tick_fires_only_at_zero() {
        let trigger = NotificationTrigger::default();
        let task = task();
        assert!(trigger.on_tick(&task, 1).is_none());
        let event = trigger.on_tick(&task, 0).unwrap();
        assert_eq!(event.kind, NotificationKind::TimeComplete);
        assert!(event.body.contains("Inbox zero"));
        assert!(trigger.on_tick(&task, -1).is_none());
    }

    #[test]
    fn test_disabled_trigger_is_silent() {
        let mut trigger = NotificationTrigger::default();
        trigger.set_enabled(false);
        let task = task();
        assert!(trigger.on_tick(&task, 0).is_none());
        assert!(trigger.on_completed(&task).is_none());
    }

    #[test]
    fn test_completed_event_payload() {
        let event = NotificationTrigger::default().on_completed(&task()).unwrap();
        assert_eq!(event.title, "Task Completed");
        assert_eq!(event.body, "Great job! You've completed: Inbox zero");
        assert_eq!(event.icon, TASK_COMPLETED_ICON);
    }

    #[test]
    fn test_deliver_all_survives_failures() {
        let events = vec![NotificationEvent::task_completed(&task())];

        let failing = RecordingNotifier {
            fail: true,
            ..Default::default()
        };
        deliver_all(&failing, &events);
        assert!(failing.delivered.borrow().is_empty());

        let ok = RecordingNotifier::default();
        deliver_all(&ok, &events);
        assert_eq!(ok.delivered.borrow().len(), 1);
    }
}
