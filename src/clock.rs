use std::sync::RwLock;

use chrono::{Local, NaiveDateTime, TimeDelta, Utc};

/// Source of "now" for all schedule arithmetic. Reminder times are wall-clock
/// times of day, so the clock yields naive local datetimes in whatever zone
/// the host considers local.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The operating system's local time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Local time in a fixed IANA zone, for hosts whose reminder schedule should
/// not follow the device zone.
pub struct ZonedClock {
    tz: chrono_tz::Tz,
}

impl ZonedClock {
    pub fn new(tz: chrono_tz::Tz) -> Self {
        Self { tz }
    }
}

impl Clock for ZonedClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }
}

/// A clock that only moves when told to.
pub struct ManualClock {
    now: RwLock<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.write().expect("clock lock poisoned") = now;
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.write().expect("clock lock poisoned");
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.read().expect("clock lock poisoned")
    }
}
