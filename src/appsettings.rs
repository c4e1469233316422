use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
pub struct SchedulerSettings {
    /// IANA zone name the daily fire times are evaluated in. Absent means
    /// the operating system's local zone.
    pub timezone: Option<String>,
}

/// A reminder seeded from configuration. Stands in for the external reminder
/// store, which is not this crate's concern.
#[derive(Deserialize, Debug, Clone)]
pub struct ReminderSettings {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub hour: u32,
    pub minute: u32,
}

#[derive(Deserialize, Debug, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    #[serde(default)]
    pub reminders: Vec<ReminderSettings>,
}

impl AppSettings {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("appsettings").required(true))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(Environment::with_prefix("MEDIREMIND"))
            .build()?;

        settings.try_deserialize()
    }
}
