use std::sync::Arc;

use crate::platform::{
    AlarmPayload, PresentError,
    presenter::{self, AlertPresenter, Notification, REMINDER_CHANNEL},
};

use super::ExactAlarmScheduler;

pub const DEFAULT_TITLE: &str = "MediRemind";
pub const DEFAULT_BODY: &str = "Time to take your medication";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RearmOutcome {
    /// The next occurrence is armed; the daily chain continues.
    Armed,
    /// The capability was revoked since the last arm. The chain stops here
    /// and only an explicit register resumes it.
    CapabilityLost,
    /// The fired payload carried no valid time of day; presentation still
    /// happened, rearming did not.
    MalformedPayload,
    /// The facility refused the new timer.
    Failed,
}

/// Per-step record of one firing. Presentation steps are continue-on-failure;
/// the rearm is must-attempt regardless of what the earlier steps did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireOutcome {
    pub channels: StepOutcome,
    pub alert: StepOutcome,
    pub notification: StepOutcome,
    pub rearm: RearmOutcome,
}

/// Runs when an armed timer elapses. Self-contained: the payload is all it
/// gets, no other part of the application is assumed to be initialized — the
/// process may have been started straight into a background delivery.
pub struct FireHandler {
    scheduler: Arc<ExactAlarmScheduler>,
    presenter: Arc<dyn AlertPresenter>,
}

impl FireHandler {
    pub fn new(scheduler: Arc<ExactAlarmScheduler>, presenter: Arc<dyn AlertPresenter>) -> Self {
        Self {
            scheduler,
            presenter,
        }
    }

    /// Handles one delivery. Delivery is at-least-once: a duplicate re-runs
    /// the presentation and re-arms the same next occurrence, which the
    /// replace-on-arm facility absorbs without drift.
    pub async fn on_fire(&self, payload: AlarmPayload) -> FireOutcome {
        log::info!("reminder {} fired", payload.id);

        let channels = swallow(
            presenter::ensure_channels(self.presenter.as_ref()).await,
            "channel declaration",
        );
        let alert = swallow(self.presenter.play_alert().await, "alert playback");
        let notification = swallow(
            self.presenter
                .show_notification(&notification_for(&payload))
                .await,
            "notification delivery",
        );
        let rearm = self.rearm(payload).await;

        FireOutcome {
            channels,
            alert,
            notification,
            rearm,
        }
    }

    async fn rearm(&self, payload: AlarmPayload) -> RearmOutcome {
        let Some(fire_at) = payload.fire_time() else {
            log::warn!(
                "fired payload for reminder {} carries no valid time, not rearming",
                payload.id
            );
            return RearmOutcome::MalformedPayload;
        };

        if !self.scheduler.has_capability() {
            log::info!(
                "exact scheduling capability revoked, chain for reminder {} stops",
                payload.id
            );
            return RearmOutcome::CapabilityLost;
        }

        if self.scheduler.rearm(fire_at, payload).await {
            RearmOutcome::Armed
        } else {
            RearmOutcome::Failed
        }
    }
}

fn notification_for(payload: &AlarmPayload) -> Notification {
    Notification {
        id: payload.id,
        channel: REMINDER_CHANNEL.id,
        title: payload.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        body: payload.body.clone().unwrap_or_else(|| DEFAULT_BODY.to_string()),
        full_screen: true,
        auto_cancel: true,
    }
}

fn swallow(result: Result<(), PresentError>, step: &str) -> StepOutcome {
    match result {
        Ok(()) => StepOutcome::Done,
        Err(error) => {
            log::warn!("{step} failed: {error}");
            StepOutcome::Failed
        }
    }
}
