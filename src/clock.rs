//! Time source used for every lifecycle transition.
//!
//! The controller samples the wall clock only at start, pause and complete,
//! always through a [`Clock`], so tests can drive exact sequences.

pub use mockable::{Clock, DefaultClock};

#[cfg(test)]
pub use manual::ManualClock;

#[cfg(test)]
mod manual {
    use super::Clock;
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    /// Clock that only moves when told to. Clones share the same time.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        millis: Arc<AtomicI64>,
    }

    impl ManualClock {
        pub fn at(start: DateTime<Utc>) -> Self {
            Self {
                millis: Arc::new(AtomicI64::new(start.timestamp_millis())),
            }
        }

        /// 2024-03-01 09:00:00 UTC
        pub fn epoch() -> Self {
            Self::at(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap())
        }

        pub fn advance(&self, by: Duration) {
            self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
        }

        pub fn advance_secs(&self, secs: i64) {
            self.advance(Duration::seconds(secs));
        }
    }

    impl Clock for ManualClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            Utc.timestamp_millis_opt(self.millis.load(Ordering::SeqCst)).unwrap()
        }
    }
}
