use chrono::{NaiveTime, Timelike};

pub type ReminderId = u64;

/// Wall-clock time of day a reminder fires at, every day, local time.
/// Seconds and sub-second precision are normalized away: the schedulable
/// granularity is the minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderFireTime(NaiveTime);

impl ReminderFireTime {
    pub fn new(inner: NaiveTime) -> Self {
        let normalized = inner
            .with_second(0)
            .and_then(|time| time.with_nanosecond(0))
            .expect("Will never fail.");
        Self(normalized)
    }

    /// Validating constructor for the raw-integer boundary. `None` when the
    /// pair is not a valid time of day.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: ReminderId,
    pub title: String,
    pub body: String,
    pub fire_at: ReminderFireTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hm_accepts_full_day_range() {
        assert!(ReminderFireTime::from_hm(0, 0).is_some());
        assert!(ReminderFireTime::from_hm(23, 59).is_some());
    }

    #[test]
    fn from_hm_rejects_out_of_range_values() {
        assert!(ReminderFireTime::from_hm(24, 0).is_none());
        assert!(ReminderFireTime::from_hm(8, 60).is_none());
    }

    #[test]
    fn new_normalizes_seconds_away() {
        let fire_time = ReminderFireTime::new(NaiveTime::from_hms_opt(8, 30, 42).unwrap());
        assert_eq!(fire_time.time(), NaiveTime::from_hms_opt(8, 30, 0).unwrap());
    }
}
