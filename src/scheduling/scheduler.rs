use std::sync::Arc;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

use crate::{
    clock::Clock,
    platform::{
        AlarmFacility, AlarmPayload, ExactAlarmGate,
        presenter::{self, AlertPresenter},
    },
    reminder::{Reminder, ReminderFireTime, ReminderId},
};

/// The nearest future instant at the given wall-clock time: today if that
/// point is still ahead, otherwise tomorrow. The comparison is non-strict —
/// a target equal to `now` counts as already passed, so registration never
/// fires synchronously and a rearm lands a full day ahead.
pub fn next_occurrence(fire_at: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(fire_at);
    if today > now {
        today
    } else {
        today
            .checked_add_signed(TimeDelta::days(1))
            .expect("Not realistic to overflow")
    }
}

/// Owns the reminder-id → armed-timer mapping (held by the alarm facility)
/// and decides when the next fire time is. The authoritative register/cancel
/// surface; the fire handler re-enters through [`ExactAlarmScheduler::rearm`].
pub struct ExactAlarmScheduler {
    clock: Arc<dyn Clock>,
    gate: Arc<dyn ExactAlarmGate>,
    alarms: Arc<dyn AlarmFacility>,
    presenter: Arc<dyn AlertPresenter>,
}

impl ExactAlarmScheduler {
    pub fn new(
        clock: Arc<dyn Clock>,
        gate: Arc<dyn ExactAlarmGate>,
        alarms: Arc<dyn AlarmFacility>,
        presenter: Arc<dyn AlertPresenter>,
    ) -> Self {
        Self {
            clock,
            gate,
            alarms,
            presenter,
        }
    }

    /// Arms (or re-arms, replacing) the timer for the reminder. `false` when
    /// the exact-scheduling capability is denied or the facility refuses —
    /// never a silent downgrade to inexact timing.
    pub async fn register(&self, reminder: &Reminder) -> bool {
        self.arm_payload(
            reminder.fire_at.time(),
            AlarmPayload::for_reminder(reminder),
        )
        .await
    }

    /// Re-arms a fired payload for its next occurrence, preserving the
    /// payload exactly as it was armed.
    pub async fn rearm(&self, fire_at: ReminderFireTime, payload: AlarmPayload) -> bool {
        self.arm_payload(fire_at.time(), payload).await
    }

    /// Disarms the timer for `id`. Unknown ids succeed as a no-op: callers
    /// cannot always know whether a timer is currently armed.
    pub async fn cancel(&self, id: ReminderId) -> bool {
        match self.alarms.disarm(id).await {
            Ok(()) => true,
            Err(error) => {
                log::warn!("disarming reminder {id} failed: {error}");
                false
            }
        }
    }

    /// Disarms every timer.
    pub async fn cancel_all(&self) -> bool {
        match self.alarms.disarm_all().await {
            Ok(()) => true,
            Err(error) => {
                log::warn!("disarming all reminders failed: {error}");
                false
            }
        }
    }

    pub fn has_capability(&self) -> bool {
        self.gate.has_exact_capability()
    }

    pub fn open_capability_settings(&self) {
        self.gate.request_capability();
    }

    pub async fn next_fire_at(&self, id: ReminderId) -> Option<NaiveDateTime> {
        self.alarms.next_fire(id).await
    }

    async fn arm_payload(&self, fire_at: NaiveTime, payload: AlarmPayload) -> bool {
        let id = payload.id;
        if !self.gate.has_exact_capability() {
            log::warn!("exact scheduling capability denied, reminder {id} not armed");
            return false;
        }

        if let Err(error) = presenter::ensure_channels(self.presenter.as_ref()).await {
            log::warn!("alert channel declaration failed: {error}");
        }

        let instant = next_occurrence(fire_at, self.clock.now());
        match self.alarms.arm(instant, payload).await {
            Ok(()) => {
                log::info!("reminder {id} armed for {instant}");
                true
            }
            Err(error) => {
                log::warn!("arming reminder {id} failed: {error}");
                false
            }
        }
    }
}
