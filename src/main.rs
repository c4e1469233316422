use std::sync::Arc;

use anyhow::Context;

use mediremind::{
    appsettings::AppSettings,
    clock::{Clock, SystemClock, ZonedClock},
    platform::{AlwaysGranted, LogPresenter},
    service::ReminderService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = AppSettings::load().context("could not load settings")?;
    let clock: Arc<dyn Clock> = match settings.scheduler.timezone.as_deref() {
        Some(name) => {
            let tz: chrono_tz::Tz = name
                .parse()
                .map_err(|error| anyhow::anyhow!("unknown timezone '{name}': {error}"))?;
            Arc::new(ZonedClock::new(tz))
        }
        None => Arc::new(SystemClock),
    };

    let service =
        ReminderService::start(clock, Arc::new(AlwaysGranted), Arc::new(LogPresenter));

    if !service.has_capability() {
        log::warn!("exact scheduling is not permitted, opening the grant surface");
        service.open_capability_settings();
    }

    let mut armed = 0;
    for reminder in &settings.reminders {
        if service
            .register(
                reminder.id,
                &reminder.title,
                &reminder.body,
                reminder.hour,
                reminder.minute,
            )
            .await
        {
            armed += 1;
        } else {
            log::warn!("reminder {} was not armed", reminder.id);
        }
    }

    log::info!("{armed} reminder(s) armed, waiting for fire times (ctrl-c to exit)");
    tokio::signal::ctrl_c()
        .await
        .context("could not listen for shutdown signal")?;

    service.shutdown().await;
    Ok(())
}
