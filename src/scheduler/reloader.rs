//! Reload Scheduler Implementation
//!
//! The scheduler owns a single recurring timer task. Each tick, and each
//! manual trigger, runs the reload sequence: check whether the target is
//! active, deactivate it if so, wait the configured delay, then activate it.
//! The delay exists because hosts commonly tear components down
//! asynchronously; re-enabling too quickly can race the teardown.
//!
//! Triggers arriving while a sequence is still running are skipped by a
//! single-flight guard rather than racing the running sequence.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::host::{HostError, Notifier, TargetControl};
use crate::settings::ReloaderSettings;

/// What a single reload invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The full sequence ran and the target is active again.
    Completed,
    /// No target selected; nothing was done.
    SkippedNoTarget,
    /// Another reload sequence was already running.
    SkippedInFlight,
    /// A target-control call failed; the notice text posted to the user.
    Failed(String),
}

/// The active recurring timer registration.
struct ActiveTimer {
    handle: JoinHandle<()>,
    period: Duration,
}

/// Reload scheduler
pub struct ReloadScheduler<H: TargetControl + 'static> {
    host: Arc<H>,
    notifier: Arc<dyn Notifier>,
    settings: Arc<RwLock<ReloaderSettings>>,
    timer: Mutex<Option<ActiveTimer>>,
    in_flight: Arc<AtomicBool>,
}

impl<H: TargetControl + 'static> ReloadScheduler<H> {
    /// Create a scheduler reading its configuration through the shared
    /// settings handle (see `SettingsStore::shared`).
    pub fn new(
        host: Arc<H>,
        notifier: Arc<dyn Notifier>,
        settings: Arc<RwLock<ReloaderSettings>>,
    ) -> Self {
        Self {
            host,
            notifier,
            settings,
            timer: Mutex::new(None),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop any existing timer, then start a new one reflecting current
    /// settings. Idempotent: repeated calls leave exactly one live timer.
    ///
    /// No timer is started while the reloader is disabled or no target is
    /// selected.
    pub async fn restart(&self) {
        let snapshot = self.settings.read().await.clone();

        let mut timer = self.timer.lock();
        if let Some(active) = timer.take() {
            active.handle.abort();
        }

        if !snapshot.enabled || snapshot.target_id.is_empty() {
            if snapshot.debug_enabled {
                tracing::debug!(
                    enabled = snapshot.enabled,
                    target_id = %snapshot.target_id,
                    "reload timer not started"
                );
            }
            return;
        }

        let period = Duration::from_millis(snapshot.interval_minutes.saturating_mul(60_000));
        let host = Arc::clone(&self.host);
        let notifier = Arc::clone(&self.notifier);
        let settings = Arc::clone(&self.settings);
        let in_flight = Arc::clone(&self.in_flight);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // An interval fires immediately; consume that so the first
            // reload happens one full period after restart.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                // Fire and forget: the next tick is never delayed by a
                // sequence that is still running.
                tokio::spawn(run_sequence(
                    Arc::clone(&host),
                    Arc::clone(&notifier),
                    Arc::clone(&settings),
                    Arc::clone(&in_flight),
                ));
            }
        });

        *timer = Some(ActiveTimer { handle, period });

        if snapshot.debug_enabled {
            tracing::debug!(
                period_ms = period.as_millis() as u64,
                target_id = %snapshot.target_id,
                "reload timer started"
            );
        }
    }

    /// Cancel the recurring timer registration if one exists.
    ///
    /// Does not cancel a reload sequence that is already running; that
    /// sequence completes (or fails) on its own.
    pub async fn stop(&self) {
        let mut timer = self.timer.lock();
        if let Some(active) = timer.take() {
            active.handle.abort();
            tracing::debug!("reload timer stopped");
        }
    }

    /// Whether a recurring timer is currently registered.
    pub fn is_scheduled(&self) -> bool {
        self.timer.lock().is_some()
    }

    /// Period of the active timer, if one is registered.
    pub fn timer_period(&self) -> Option<Duration> {
        self.timer.lock().as_ref().map(|active| active.period)
    }

    /// Run the reload sequence once for the currently configured target.
    ///
    /// Manual trigger entry point; the timer runs the same sequence. Never
    /// returns an error: failures are posted as a user-visible notice and
    /// reported in the outcome.
    pub async fn reload(&self) -> ReloadOutcome {
        run_sequence(
            Arc::clone(&self.host),
            Arc::clone(&self.notifier),
            Arc::clone(&self.settings),
            Arc::clone(&self.in_flight),
        )
        .await
    }
}

impl<H: TargetControl + 'static> Drop for ReloadScheduler<H> {
    fn drop(&mut self) {
        if let Some(active) = self.timer.get_mut().take() {
            active.handle.abort();
        }
    }
}

/// Releases the single-flight guard on every exit path.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// One run of the reload sequence:
/// check status -> deactivate (if active) -> delay -> activate.
async fn run_sequence<H: TargetControl>(
    host: Arc<H>,
    notifier: Arc<dyn Notifier>,
    settings: Arc<RwLock<ReloaderSettings>>,
    in_flight: Arc<AtomicBool>,
) -> ReloadOutcome {
    let snapshot = settings.read().await.clone();

    if snapshot.target_id.is_empty() {
        if snapshot.debug_enabled {
            tracing::debug!("reload skipped: no target selected");
        }
        return ReloadOutcome::SkippedNoTarget;
    }

    if in_flight.swap(true, Ordering::SeqCst) {
        if snapshot.debug_enabled {
            tracing::debug!(target_id = %snapshot.target_id, "reload skipped: sequence already in flight");
        }
        return ReloadOutcome::SkippedInFlight;
    }
    let _guard = InFlightGuard(in_flight);

    let target = snapshot.target_id.as_str();
    let was_active = host.is_active(target).await;
    if snapshot.debug_enabled {
        tracing::debug!(target_id = target, was_active, "target status checked");
    }

    let result = async {
        if was_active {
            host.deactivate(target).await?;
            if snapshot.debug_enabled {
                tracing::debug!(target_id = target, "target deactivated");
            }
            // Skipped when the target was already off, so a plain
            // "ensure enabled" run does not pay the teardown delay.
            if snapshot.delay_seconds > 0.0 {
                tokio::time::sleep(Duration::from_secs_f64(snapshot.delay_seconds)).await;
            }
        }
        host.activate(target).await?;
        Ok::<(), HostError>(())
    }
    .await;

    match result {
        Ok(()) => {
            if snapshot.debug_enabled {
                tracing::debug!(target_id = target, "reload completed");
            }
            ReloadOutcome::Completed
        }
        Err(e) => {
            // No retry and no rollback; the target may be left disabled if
            // the enable step itself failed. The timer keeps firing.
            let message = format!("Failed to reload {}: {}", target, e);
            notifier.notify(&message);
            ReloadOutcome::Failed(message)
        }
    }
}
