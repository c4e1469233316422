use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    clock::Clock,
    platform::{AlarmPayload, ExactAlarmGate, TokioAlarmFacility, presenter::AlertPresenter},
    reminder::{Reminder, ReminderFireTime, ReminderId},
    scheduling::{ExactAlarmScheduler, FireHandler},
};

/// The method-call boundary handed to the UI/store layer. Wires the clock,
/// permission gate, timer facility, scheduler, fire handler and the dispatch
/// loop that drains fired timers.
pub struct ReminderService {
    scheduler: Arc<ExactAlarmScheduler>,
    dispatch_handle: JoinHandle<()>,
}

impl ReminderService {
    pub fn start(
        clock: Arc<dyn Clock>,
        gate: Arc<dyn ExactAlarmGate>,
        presenter: Arc<dyn AlertPresenter>,
    ) -> Self {
        let (alarms, fired) = TokioAlarmFacility::new(clock.clone());
        let scheduler = Arc::new(ExactAlarmScheduler::new(
            clock,
            gate,
            alarms,
            presenter.clone(),
        ));
        let handler = Arc::new(FireHandler::new(scheduler.clone(), presenter));
        let dispatch_handle = tokio::spawn(Self::dispatch(fired, handler));

        Self {
            scheduler,
            dispatch_handle,
        }
    }

    /// Drains fired payloads one at a time, which keeps fire → rearm strictly
    /// ordered for any single reminder id.
    async fn dispatch(mut fired: mpsc::Receiver<AlarmPayload>, handler: Arc<FireHandler>) {
        while let Some(payload) = fired.recv().await {
            handler.on_fire(payload).await;
        }
    }

    /// Registers (or re-registers, replacing) a daily reminder. `false` when
    /// the hour/minute pair is not a valid time of day, the exact-scheduling
    /// capability is denied, or the timer facility refuses.
    pub async fn register(
        &self,
        id: ReminderId,
        title: &str,
        body: &str,
        hour: u32,
        minute: u32,
    ) -> bool {
        let Some(fire_at) = ReminderFireTime::from_hm(hour, minute) else {
            log::warn!("rejecting reminder {id}: {hour:02}:{minute:02} is not a valid time of day");
            return false;
        };
        let reminder = Reminder {
            id,
            title: title.to_string(),
            body: body.to_string(),
            fire_at,
        };
        self.scheduler.register(&reminder).await
    }

    pub async fn cancel(&self, id: ReminderId) -> bool {
        self.scheduler.cancel(id).await
    }

    pub async fn cancel_all(&self) -> bool {
        self.scheduler.cancel_all().await
    }

    pub fn has_capability(&self) -> bool {
        self.scheduler.has_capability()
    }

    pub fn open_capability_settings(&self) {
        self.scheduler.open_capability_settings();
    }

    pub async fn next_fire_at(&self, id: ReminderId) -> Option<NaiveDateTime> {
        self.scheduler.next_fire_at(id).await
    }

    pub async fn shutdown(self) {
        self.dispatch_handle.abort();
        let _ = self.dispatch_handle.await;
    }
}
