use async_trait::async_trait;

use super::PresentError;
use crate::reminder::ReminderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelImportance {
    Default,
    High,
}

/// Declaration of an alert channel. Declaring an already-declared channel is
/// a no-op on every real platform, so these are safe to (re)declare at both
/// registration time and fire time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub importance: ChannelImportance,
    pub bypass_dnd: bool,
    pub vibration_pattern: &'static [u64],
}

/// Medication intake alerts. Maximum urgency and do-not-disturb bypass:
/// a missed dose is worse than an interrupted quiet hour.
pub const REMINDER_CHANNEL: ChannelSpec = ChannelSpec {
    id: "medication-reminders",
    name: "Medication reminders",
    description: "Notifications for medication intake",
    importance: ChannelImportance::High,
    bypass_dnd: true,
    vibration_pattern: &[0, 500, 200, 500],
};

/// Resupply alerts, ordinary urgency.
pub const STOCK_CHANNEL: ChannelSpec = ChannelSpec {
    id: "stock-alerts",
    name: "Stock alerts",
    description: "Medication resupply alerts",
    importance: ChannelImportance::Default,
    bypass_dnd: false,
    vibration_pattern: &[],
};

pub const CHANNELS: [&ChannelSpec; 2] = [&REMINDER_CHANNEL, &STOCK_CHANNEL];

/// A persistent notification, keyed by reminder id so that a repeat fire
/// replaces the previous one instead of stacking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: ReminderId,
    pub channel: &'static str,
    pub title: String,
    pub body: String,
    pub full_screen: bool,
    pub auto_cancel: bool,
}

/// Presentation side effects, implemented by the host for its platform.
/// `play_alert` must use the most privilege-bypassing audible primitive the
/// platform offers; interrupting do-not-disturb is a requirement here, not
/// an optimization.
#[async_trait]
pub trait AlertPresenter: Send + Sync {
    async fn ensure_channel(&self, channel: &ChannelSpec) -> Result<(), PresentError>;

    async fn play_alert(&self) -> Result<(), PresentError>;

    async fn show_notification(&self, notification: &Notification) -> Result<(), PresentError>;
}

/// Declares every channel the crate uses. Idempotent, called defensively at
/// registration and fire time; there is no authoritative startup path.
pub async fn ensure_channels(presenter: &dyn AlertPresenter) -> Result<(), PresentError> {
    for channel in CHANNELS {
        presenter.ensure_channel(channel).await?;
    }
    Ok(())
}

/// Presenter that only logs. Rendering real notifications is the host's job;
/// this keeps the chain observable in demos and headless runs.
pub struct LogPresenter;

#[async_trait]
impl AlertPresenter for LogPresenter {
    async fn ensure_channel(&self, channel: &ChannelSpec) -> Result<(), PresentError> {
        log::debug!("channel '{}' declared", channel.id);
        Ok(())
    }

    async fn play_alert(&self) -> Result<(), PresentError> {
        log::info!("ALERT: playing alarm sound");
        Ok(())
    }

    async fn show_notification(&self, notification: &Notification) -> Result<(), PresentError> {
        log::info!(
            "NOTIFY [{}] {}: {}",
            notification.id,
            notification.title,
            notification.body
        );
        Ok(())
    }
}
