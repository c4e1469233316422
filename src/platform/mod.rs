pub mod alarms;
pub mod gate;
pub mod presenter;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reminder::{Reminder, ReminderFireTime, ReminderId};

pub use alarms::{AlarmFacility, TokioAlarmFacility};
pub use gate::{AlwaysGranted, ExactAlarmGate, ManualGate};
pub use presenter::{AlertPresenter, ChannelSpec, LogPresenter, Notification};

/// What the timer facility stores at arming time and delivers back verbatim
/// when the timer elapses. The fire handler must be able to act on this alone,
/// with no live reminder store available.
///
/// `title`/`body` may be absent and `hour`/`minute` are raw integers: a
/// durable platform backend round-trips this through its own storage, and a
/// damaged delivery must still be presentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmPayload {
    pub id: ReminderId,
    pub title: Option<String>,
    pub body: Option<String>,
    pub hour: i32,
    pub minute: i32,
}

impl AlarmPayload {
    pub fn for_reminder(reminder: &Reminder) -> Self {
        Self {
            id: reminder.id,
            title: Some(reminder.title.clone()),
            body: Some(reminder.body.clone()),
            hour: reminder.fire_at.hour() as i32,
            minute: reminder.fire_at.minute() as i32,
        }
    }

    /// The daily fire time this payload was armed with, if the raw fields
    /// still form a valid time of day.
    pub fn fire_time(&self) -> Option<ReminderFireTime> {
        let hour = u32::try_from(self.hour).ok()?;
        let minute = u32::try_from(self.minute).ok()?;
        ReminderFireTime::from_hm(hour, minute)
    }
}

#[derive(Debug, Error)]
pub enum AlarmError {
    #[error("fire instant {0} is not in the future")]
    PastInstant(NaiveDateTime),

    #[error("alarm facility rejected the request: {0}")]
    Facility(String),
}

#[derive(Debug, Error)]
pub enum PresentError {
    #[error("could not declare alert channel '{0}'")]
    Channel(String),

    #[error("alert playback failed: {0}")]
    Alert(String),

    #[error("notification delivery failed: {0}")]
    Notification(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::ReminderFireTime;

    fn reminder() -> Reminder {
        Reminder {
            id: 7,
            title: "Aspirin".to_string(),
            body: "Take 1 pill".to_string(),
            fire_at: ReminderFireTime::from_hm(8, 30).unwrap(),
        }
    }

    #[test]
    fn payload_round_trips_the_fire_time() {
        let payload = AlarmPayload::for_reminder(&reminder());

        assert_eq!(
            payload.fire_time(),
            Some(ReminderFireTime::from_hm(8, 30).unwrap())
        );
    }

    #[test]
    fn malformed_payload_has_no_fire_time() {
        let mut payload = AlarmPayload::for_reminder(&reminder());
        payload.hour = -1;
        assert_eq!(payload.fire_time(), None);

        let mut payload = AlarmPayload::for_reminder(&reminder());
        payload.minute = 60;
        assert_eq!(payload.fire_time(), None);
    }
}
