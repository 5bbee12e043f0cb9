//! Per-user rest timers
//!
//! Each user has at most one rest timer. Keep-alive (re)arms it with the
//! given pause; when it runs out the user gets a `restTimerFinished`
//! notification and the timer is forgotten. Every arm bumps the timer's
//! generation; a firing timer only removes its entry while no later arm has
//! happened.

use super::notification::NotificationService;
use super::timeout::InactivityTimeoutManager;
use crate::error::ApiError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;
use training_tracker_shared::validation::validate_pause_time;
use training_tracker_shared::NotificationEvent;
use uuid::Uuid;

type TimerMap = Mutex<HashMap<Uuid, RestTimer>>;

/// A user's timer, the pause it was last armed with and its arm count
struct RestTimer {
    manager: InactivityTimeoutManager,
    pause_secs: Arc<AtomicU64>,
    generation: Arc<AtomicU64>,
}

#[derive(Clone)]
pub struct RestTimerService {
    timers: Arc<TimerMap>,
    notifications: NotificationService,
    max_pause_secs: u64,
}

impl RestTimerService {
    pub fn new(notifications: NotificationService, max_pause_secs: u64) -> Self {
        Self {
            timers: Arc::new(Mutex::new(HashMap::new())),
            notifications,
            max_pause_secs,
        }
    }

    fn new_timer(&self, user_id: Uuid, duration: Duration) -> RestTimer {
        let pause_secs = Arc::new(AtomicU64::new(duration.as_secs()));
        let generation = Arc::new(AtomicU64::new(0));
        let notifications = self.notifications.clone();
        let timers = Arc::downgrade(&self.timers);
        let fired_pause = Arc::clone(&pause_secs);
        let fired_generation = Arc::clone(&generation);

        let manager = InactivityTimeoutManager::new(format!("rest:{}", user_id), duration, move || {
            let notifications = notifications.clone();
            let timers = timers.clone();
            let pause_time_secs = fired_pause.load(Ordering::Relaxed);
            let generation = fired_generation.load(Ordering::SeqCst);
            async move {
                metrics::counter!("rest_timers_fired_total").increment(1);
                info!(%user_id, pause_time_secs, "Rest timer finished");
                notifications
                    .notify(user_id, NotificationEvent::RestTimerFinished { pause_time_secs })
                    .await;
                forget_fired(&timers, user_id, generation).await;
                Ok(())
            }
        });

        RestTimer {
            manager,
            pause_secs,
            generation,
        }
    }

    /// Start or restart the user's rest timer
    pub async fn start_timer(&self, user_id: Uuid, pause_time_secs: u64) -> Result<(), ApiError> {
        validate_pause_time(pause_time_secs, self.max_pause_secs).map_err(ApiError::Validation)?;
        let duration = Duration::from_secs(pause_time_secs);

        let mut timers = self.timers.lock().await;
        let timer = timers
            .entry(user_id)
            .or_insert_with(|| self.new_timer(user_id, duration));

        timer.pause_secs.store(pause_time_secs, Ordering::Relaxed);
        timer.generation.fetch_add(1, Ordering::SeqCst);
        timer.manager.set_duration(duration);
        timer.manager.start_timeout();
        info!(%user_id, pause_time_secs, "Rest timer started");
        Ok(())
    }

    /// Stop and forget the user's rest timer; returns whether one was armed
    pub async fn stop_timer(&self, user_id: Uuid) -> bool {
        let removed = self.timers.lock().await.remove(&user_id);
        match removed {
            Some(mut timer) => {
                let was_armed = timer.manager.is_armed();
                timer.manager.clear_timeout();
                info!(%user_id, "Rest timer stopped");
                was_armed
            }
            None => false,
        }
    }

    pub async fn is_running(&self, user_id: Uuid) -> bool {
        self.timers
            .lock()
            .await
            .get(&user_id)
            .is_some_and(|timer| timer.manager.is_armed())
    }
}

/// Drop a fired timer unless it was re-armed after firing
async fn forget_fired(timers: &Weak<TimerMap>, user_id: Uuid, generation: u64) {
    let Some(timers) = timers.upgrade() else {
        return;
    };
    let removed = {
        let mut timers = timers.lock().await;
        let current = timers
            .get(&user_id)
            .is_some_and(|timer| timer.generation.load(Ordering::SeqCst) == generation);
        if current {
            timers.remove(&user_id)
        } else {
            None
        }
    };
    // the removed manager belongs to the task running this callback; dropping
    // it here is the last step
    drop(removed);
}
