use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::{
    platform::{
        AlarmError, AlarmFacility, AlarmPayload, PresentError,
        presenter::{AlertPresenter, ChannelSpec, Notification},
    },
    reminder::{Reminder, ReminderFireTime, ReminderId},
};

pub(crate) fn reminder_at(id: ReminderId, hour: u32, minute: u32) -> Reminder {
    Reminder {
        id,
        title: "Aspirin".to_string(),
        body: "Take 1 pill".to_string(),
        fire_at: ReminderFireTime::from_hm(hour, minute).unwrap(),
    }
}

/// Facility that records the armed bindings instead of keeping time.
pub(crate) struct RecordingFacility {
    armed: Mutex<HashMap<ReminderId, (NaiveDateTime, AlarmPayload)>>,
}

impl RecordingFacility {
    pub(crate) fn new() -> Self {
        Self {
            armed: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn armed_count(&self) -> usize {
        self.armed.lock().unwrap().len()
    }

    pub(crate) fn armed_instant(&self, id: ReminderId) -> Option<NaiveDateTime> {
        self.armed.lock().unwrap().get(&id).map(|(at, _)| *at)
    }

    pub(crate) fn armed_payload(&self, id: ReminderId) -> Option<AlarmPayload> {
        self.armed
            .lock()
            .unwrap()
            .get(&id)
            .map(|(_, payload)| payload.clone())
    }
}

#[async_trait]
impl AlarmFacility for RecordingFacility {
    async fn arm(&self, fire_at: NaiveDateTime, payload: AlarmPayload) -> Result<(), AlarmError> {
        self.armed
            .lock()
            .unwrap()
            .insert(payload.id, (fire_at, payload));
        Ok(())
    }

    async fn disarm(&self, id: ReminderId) -> Result<(), AlarmError> {
        self.armed.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn disarm_all(&self) -> Result<(), AlarmError> {
        self.armed.lock().unwrap().clear();
        Ok(())
    }

    async fn next_fire(&self, id: ReminderId) -> Option<NaiveDateTime> {
        self.armed_instant(id)
    }
}

/// Presenter that succeeds silently.
pub(crate) struct NullPresenter;

#[async_trait]
impl AlertPresenter for NullPresenter {
    async fn ensure_channel(&self, _channel: &ChannelSpec) -> Result<(), PresentError> {
        Ok(())
    }

    async fn play_alert(&self) -> Result<(), PresentError> {
        Ok(())
    }

    async fn show_notification(&self, _notification: &Notification) -> Result<(), PresentError> {
        Ok(())
    }
}

/// Presenter that captures what it was asked to present.
pub(crate) struct RecordingPresenter {
    alerts: AtomicUsize,
    shown: Mutex<Vec<Notification>>,
}

impl RecordingPresenter {
    pub(crate) fn new() -> Self {
        Self {
            alerts: AtomicUsize::new(0),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn alert_count(&self) -> usize {
        self.alerts.load(Ordering::SeqCst)
    }

    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertPresenter for RecordingPresenter {
    async fn ensure_channel(&self, _channel: &ChannelSpec) -> Result<(), PresentError> {
        Ok(())
    }

    async fn play_alert(&self) -> Result<(), PresentError> {
        self.alerts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn show_notification(&self, notification: &Notification) -> Result<(), PresentError> {
        self.shown.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Presenter whose every step fails, for continue-on-failure tests.
pub(crate) struct FailingPresenter;

#[async_trait]
impl AlertPresenter for FailingPresenter {
    async fn ensure_channel(&self, channel: &ChannelSpec) -> Result<(), PresentError> {
        Err(PresentError::Channel(channel.id.to_string()))
    }

    async fn play_alert(&self) -> Result<(), PresentError> {
        Err(PresentError::Alert("no audio device".to_string()))
    }

    async fn show_notification(&self, _notification: &Notification) -> Result<(), PresentError> {
        Err(PresentError::Notification("surface unavailable".to_string()))
    }
}
