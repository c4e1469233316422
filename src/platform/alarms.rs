use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::{
    sync::{RwLock, mpsc},
    task::JoinHandle,
    time,
};
use tokio_util::sync::CancellationToken;

use super::{AlarmError, AlarmPayload};
use crate::{clock::Clock, reminder::ReminderId};

const CANCEL_TIMEOUT: Duration = Duration::from_secs(5);

/// The platform's durable, wake-capable one-shot timer table, keyed by
/// reminder id. Arming replaces any existing timer for the same id; disarming
/// an unknown id is a no-op. Delivery is at-least-once: a fired payload is
/// handed back to whoever drains the delivery channel.
#[async_trait]
pub trait AlarmFacility: Send + Sync {
    async fn arm(&self, fire_at: NaiveDateTime, payload: AlarmPayload) -> Result<(), AlarmError>;

    async fn disarm(&self, id: ReminderId) -> Result<(), AlarmError>;

    async fn disarm_all(&self) -> Result<(), AlarmError>;

    async fn next_fire(&self, id: ReminderId) -> Option<NaiveDateTime>;
}

struct ArmedTask {
    fire_at: NaiveDateTime,
    task_handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl ArmedTask {
    async fn cancel(self) {
        self.cancellation_token.cancel();
        let _ = time::timeout(CANCEL_TIMEOUT, self.task_handle).await;
    }
}

/// In-process reference implementation: one sleeping tokio task per armed
/// timer. Not durable across process death — a mobile host swaps in its
/// platform alarm service behind the same trait; this one carries demos,
/// desktop use and tests.
pub struct TokioAlarmFacility {
    clock: Arc<dyn Clock>,
    tasks: Arc<RwLock<HashMap<ReminderId, ArmedTask>>>,
    delivery: mpsc::Sender<AlarmPayload>,
}

impl TokioAlarmFacility {
    /// The returned receiver yields fired payloads; the caller owns the
    /// dispatch loop that drains it.
    pub fn new(clock: Arc<dyn Clock>) -> (Arc<Self>, mpsc::Receiver<AlarmPayload>) {
        let (delivery, fired) = mpsc::channel(64);
        let facility = Arc::new(Self {
            clock,
            tasks: Arc::new(RwLock::new(HashMap::new())),
            delivery,
        });
        (facility, fired)
    }
}

#[async_trait]
impl AlarmFacility for TokioAlarmFacility {
    async fn arm(&self, fire_at: NaiveDateTime, payload: AlarmPayload) -> Result<(), AlarmError> {
        let now = self.clock.now();
        if fire_at <= now {
            return Err(AlarmError::PastInstant(fire_at));
        }
        let delay = (fire_at - now)
            .to_std()
            .expect("The target delay is always in the future.");

        let id = payload.id;
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();
        let delivery = self.delivery.clone();
        let tasks = Arc::clone(&self.tasks);

        let task_handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_cancellation_token.cancelled() => {
                    log::debug!("armed timer for reminder {id} cancelled");
                },
                _ = time::sleep(delay) => {
                    if delivery.send(payload).await.is_err() {
                        log::warn!("timer for reminder {id} fired with no delivery loop running");
                    }
                    // A one-shot timer consumes its binding when it fires.
                    // The fire-instant check keeps a rearm that has already
                    // replaced this entry untouched.
                    let mut table = tasks.write().await;
                    if table.get(&id).is_some_and(|armed| armed.fire_at == fire_at) {
                        table.remove(&id);
                    }
                }
            }
        });

        let previous = self.tasks.write().await.insert(
            id,
            ArmedTask {
                fire_at,
                task_handle,
                cancellation_token,
            },
        );
        if let Some(previous) = previous {
            previous.cancel().await;
        }

        log::debug!("reminder {id} armed for {fire_at}");
        Ok(())
    }

    async fn disarm(&self, id: ReminderId) -> Result<(), AlarmError> {
        let removed = self.tasks.write().await.remove(&id);
        if let Some(task) = removed {
            task.cancel().await;
            log::debug!("reminder {id} disarmed");
        }
        Ok(())
    }

    async fn disarm_all(&self) -> Result<(), AlarmError> {
        let drained: Vec<ArmedTask> = {
            let mut tasks = self.tasks.write().await;
            tasks.drain().map(|(_, task)| task).collect()
        };
        for task in drained {
            task.cancel().await;
        }
        Ok(())
    }

    async fn next_fire(&self, id: ReminderId) -> Option<NaiveDateTime> {
        self.tasks.read().await.get(&id).map(|task| task.fire_at)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

    use super::*;
    use crate::clock::ManualClock;

    fn morning() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(7, 0, 0).unwrap())
    }

    fn payload(id: ReminderId) -> AlarmPayload {
        AlarmPayload {
            id,
            title: Some("Aspirin".to_string()),
            body: Some("Take 1 pill".to_string()),
            hour: 8,
            minute: 0,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn armed_timer_delivers_payload_after_delay() {
        let clock = Arc::new(ManualClock::new(morning()));
        let (facility, mut fired) = TokioAlarmFacility::new(clock);

        facility
            .arm(morning() + TimeDelta::hours(1), payload(1))
            .await
            .unwrap();

        let delivered = fired.recv().await.unwrap();
        assert_eq!(delivered, payload(1));
    }

    #[tokio::test(start_paused = true)]
    async fn a_fired_timer_consumes_its_binding() {
        let clock = Arc::new(ManualClock::new(morning()));
        let (facility, mut fired) = TokioAlarmFacility::new(clock);

        facility
            .arm(morning() + TimeDelta::hours(1), payload(1))
            .await
            .unwrap();
        fired.recv().await.unwrap();

        time::sleep(Duration::from_millis(1)).await;
        assert_eq!(facility.next_fire(1).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_replaces_the_previous_timer() {
        let clock = Arc::new(ManualClock::new(morning()));
        let (facility, mut fired) = TokioAlarmFacility::new(clock);

        facility
            .arm(morning() + TimeDelta::hours(2), payload(1))
            .await
            .unwrap();
        facility
            .arm(morning() + TimeDelta::hours(1), payload(1))
            .await
            .unwrap();

        assert_eq!(
            facility.next_fire(1).await,
            Some(morning() + TimeDelta::hours(1))
        );

        let delivered = fired.recv().await.unwrap();
        assert_eq!(delivered.id, 1);

        time::sleep(Duration::from_secs(3 * 3600)).await;
        assert!(
            fired.try_recv().is_err(),
            "the superseded timer must not fire"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_prevents_delivery() {
        let clock = Arc::new(ManualClock::new(morning()));
        let (facility, mut fired) = TokioAlarmFacility::new(clock);

        facility
            .arm(morning() + TimeDelta::hours(1), payload(1))
            .await
            .unwrap();
        facility.disarm(1).await.unwrap();

        assert_eq!(facility.next_fire(1).await, None);

        time::sleep(Duration::from_secs(2 * 3600)).await;
        assert!(fired.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn disarming_an_unknown_id_is_a_no_op() {
        let clock = Arc::new(ManualClock::new(morning()));
        let (facility, _fired) = TokioAlarmFacility::new(clock);

        assert!(facility.disarm(42).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn arming_a_past_instant_is_rejected() {
        let clock = Arc::new(ManualClock::new(morning()));
        let (facility, _fired) = TokioAlarmFacility::new(clock);

        let result = facility.arm(morning(), payload(1)).await;

        assert!(matches!(result, Err(AlarmError::PastInstant(_))));
        assert_eq!(facility.next_fire(1).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_all_clears_every_timer() {
        let clock = Arc::new(ManualClock::new(morning()));
        let (facility, mut fired) = TokioAlarmFacility::new(clock);

        facility
            .arm(morning() + TimeDelta::hours(1), payload(1))
            .await
            .unwrap();
        facility
            .arm(morning() + TimeDelta::hours(2), payload(2))
            .await
            .unwrap();
        facility.disarm_all().await.unwrap();

        assert_eq!(facility.next_fire(1).await, None);
        assert_eq!(facility.next_fire(2).await, None);

        time::sleep(Duration::from_secs(3 * 3600)).await;
        assert!(fired.try_recv().is_err());
    }
}
