use crate::domain::TaskId;
use std::time::{Duration, Instant};

/// Event loop poll interval in milliseconds
pub const DEFAULT_POLL_MS: u64 = 250;

/// Interval between countdown ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Get event loop poll duration
pub fn poll_duration() -> Duration {
    Duration::from_millis(DEFAULT_POLL_MS)
}

/// Live display counters for the active task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveCounters {
    pub elapsed: i64,
    /// Negative once the estimate is exceeded
    pub remaining: i64,
}

impl LiveCounters {
    pub fn is_overtime(&self) -> bool {
        self.remaining < 0
    }
}

/// Handle to one schedule of the tick driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

/// What a single fired tick produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    pub handle: TickHandle,
    pub task_id: TaskId,
    pub counters: LiveCounters,
}

#[derive(Debug, Clone)]
struct Schedule {
    handle: TickHandle,
    task_id: TaskId,
    counters: LiveCounters,
}

/// Drives the live countdown for at most one task at a time.
///
/// Counters are seeded when a schedule starts and then move by exactly one
/// per fired tick; they are never recomputed from the wall clock. The driver
/// never writes task state.
#[derive(Debug, Default)]
pub struct TickDriver {
    next_handle: u64,
    schedule: Option<Schedule>,
}

impl TickDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new schedule, cancelling any previous one
    pub fn schedule(&mut self, task_id: TaskId, counters: LiveCounters) -> TickHandle {
        self.next_handle += 1;
        let handle = TickHandle(self.next_handle);
        self.schedule = Some(Schedule {
            handle,
            task_id,
            counters,
        });
        handle
    }

    /// Drop the current schedule; returns the handle that was cancelled
    pub fn cancel(&mut self) -> Option<TickHandle> {
        self.schedule.take().map(|s| s.handle)
    }

    pub fn is_scheduled(&self, handle: TickHandle) -> bool {
        self.schedule.as_ref().is_some_and(|s| s.handle == handle)
    }

    pub fn current(&self) -> Option<TickHandle> {
        self.schedule.as_ref().map(|s| s.handle)
    }

    pub fn task_id(&self) -> Option<TaskId> {
        self.schedule.as_ref().map(|s| s.task_id)
    }

    pub fn counters(&self) -> Option<LiveCounters> {
        self.schedule.as_ref().map(|s| s.counters)
    }

    /// Advance the live counters by one second
    pub fn fire(&mut self) -> Option<TickEvent> {
        let schedule = self.schedule.as_mut()?;
        schedule.counters.elapsed += 1;
        schedule.counters.remaining -= 1;
        Some(TickEvent {
            handle: schedule.handle,
            task_id: schedule.task_id,
            counters: schedule.counters,
        })
    }
}

/// Decides when the event loop should fire the next tick.
///
/// Fires at most once per call; intervals missed while the loop was busy are
/// dropped rather than replayed.
#[derive(Debug, Clone)]
pub struct Pacer {
    interval: Duration,
    last: Instant,
    handle: Option<TickHandle>,
}

impl Pacer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last: now,
            handle: None,
        }
    }

    /// Returns true when a tick is due for the given schedule
    pub fn due(&mut self, handle: Option<TickHandle>, now: Instant) -> bool {
        if handle != self.handle {
            // New schedule: the first tick comes one full interval later
            self.handle = handle;
            self.last = now;
            return false;
        }
        if handle.is_none() {
            return false;
        }
        if now.duration_since(self.last) >= self.interval {
            self.last = now;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(elapsed: i64, remaining: i64) -> LiveCounters {
        LiveCounters { elapsed, remaining }
    }

    #[test]
    fn test_poll_duration() {
        assert_eq!(poll_duration(), Duration::from_millis(250));
    }

    #[test]
    fn test_fire_without_schedule_does_nothing() {
        let mut driver = TickDriver::new();
        assert!(driver.fire().is_none());
        assert!(driver.counters().is_none());
    }

    #[test]
    fn test_fire_moves_counters_by_one() {
        let mut driver = TickDriver::new();
        let task = TaskId::new();
        let handle = driver.schedule(task, seed(10, 50));

        let event = driver.fire().unwrap();
        assert_eq!(event.handle, handle);
        assert_eq!(event.task_id, task);
        assert_eq!(event.counters, seed(11, 49));

        for _ in 0..60 {
            driver.fire();
        }
        assert_eq!(driver.counters(), Some(seed(71, -11)));
        assert!(driver.counters().unwrap().is_overtime());
    }

    #[test]
    fn test_reschedule_invalidates_old_handle() {
        let mut driver = TickDriver::new();
        let first = driver.schedule(TaskId::new(), seed(0, 60));
        driver.fire();

        let second_task = TaskId::new();
        let second = driver.schedule(second_task, seed(5, 5));
        assert_ne!(first, second);
        assert!(!driver.is_scheduled(first));
        assert!(driver.is_scheduled(second));
        assert_eq!(driver.task_id(), Some(second_task));
        assert_eq!(driver.counters(), Some(seed(5, 5)));
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let mut driver = TickDriver::new();
        let handle = driver.schedule(TaskId::new(), seed(0, 60));
        assert_eq!(driver.cancel(), Some(handle));
        assert!(driver.fire().is_none());
        assert_eq!(driver.cancel(), None);
    }

    #[test]
    fn test_pacer_waits_full_interval_after_new_schedule() {
        let start = Instant::now();
        let mut pacer = Pacer::new(TICK_INTERVAL, start);
        let mut driver = TickDriver::new();
        let handle = Some(driver.schedule(TaskId::new(), seed(0, 60)));

        assert!(!pacer.due(handle, start + Duration::from_millis(900)));
        assert!(!pacer.due(handle, start + Duration::from_millis(1500)));
        assert!(pacer.due(handle, start + Duration::from_millis(1900)));
        assert!(!pacer.due(handle, start + Duration::from_millis(2000)));
    }

    #[test]
    fn test_pacer_drops_missed_intervals() {
        let start = Instant::now();
        let mut pacer = Pacer::new(TICK_INTERVAL, start);
        let handle = Some(TickDriver::new().schedule(TaskId::new(), seed(0, 60)));
        pacer.due(handle, start);

        // Five seconds late: still only one tick
        assert!(pacer.due(handle, start + Duration::from_secs(5)));
        assert!(!pacer.due(handle, start + Duration::from_millis(5500)));
    }

    #[test]
    fn test_pacer_idle_without_schedule() {
        let start = Instant::now();
        let mut pacer = Pacer::new(TICK_INTERVAL, start);
        assert!(!pacer.due(None, start + Duration::from_secs(10)));
    }
}
