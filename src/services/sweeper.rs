//! Periodic background sweep: session reminders and subscription expiry.
//!
//! The sweep is an explicit object with a start/stop lifecycle and an
//! injectable clock, so tests drive ticks without real delays and the
//! exactly-one-instance contract is visible instead of hidden global state.
//! Each tick is idempotent: already-reminded bookings are skipped via their
//! `reminder_sent` flag and expiry only moves Active subscriptions. A failing
//! record is logged and skipped; it never aborts the batch.
//!
//! Running more than one replica requires external leader election; this
//! module assumes a single process-wide instance.

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::db::FullRepository;

use super::clock::Clock;
use super::notifier::{notify_best_effort, NotificationEvent, Notifier};

/// What one sweep tick accomplished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub reminders_sent: usize,
    pub subscriptions_expired: usize,
}

/// Singleton background sweep task.
pub struct Sweeper {
    repo: Arc<dyn FullRepository>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    reminder_lead_minutes: i64,
    task: Mutex<Option<(watch::Sender<bool>, JoinHandle<()>)>>,
}

impl Sweeper {
    pub fn new(
        repo: Arc<dyn FullRepository>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        interval: Duration,
        reminder_lead_minutes: i64,
    ) -> Self {
        Self {
            repo,
            notifier,
            clock,
            interval,
            reminder_lead_minutes,
            task: Mutex::new(None),
        }
    }

    /// Spawn the periodic task. A second `start` while running is a no-op.
    pub fn start(self: &Arc<Self>) {
        let mut guard = self.task.lock();
        if guard.is_some() {
            return;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let sweeper = Arc::clone(self);
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let report = sweeper.run_once().await;
                        if report.reminders_sent > 0 || report.subscriptions_expired > 0 {
                            tracing::info!(
                                reminders = report.reminders_sent,
                                expired = report.subscriptions_expired,
                                "sweep tick completed"
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });

        *guard = Some((shutdown_tx, handle));
    }

    /// Stop the periodic task and wait for it to finish.
    pub async fn stop(&self) {
        let taken = self.task.lock().take();
        if let Some((shutdown_tx, handle)) = taken {
            let _ = shutdown_tx.send(true);
            let _ = handle.await;
        }
    }

    /// Execute one sweep tick. Exposed so tests can drive the sweep with a
    /// fixed clock instead of waiting on the interval.
    pub async fn run_once(&self) -> SweepReport {
        let mut report = SweepReport::default();
        let now = self.clock.now_utc();

        // Reminders for confirmed sessions starting within the lead window.
        let window_end = now + ChronoDuration::minutes(self.reminder_lead_minutes);
        match self.repo.bookings_needing_reminder(now, window_end).await {
            Ok(due) => {
                for booking in due {
                    let payload = serde_json::json!({
                        "booking_id": booking.id,
                        "date": booking.date,
                        "start_time": crate::models::format_minutes(booking.start_time),
                    });
                    notify_best_effort(
                        self.notifier.as_ref(),
                        booking.client_id,
                        NotificationEvent::SessionReminder,
                        payload.clone(),
                    )
                    .await;
                    notify_best_effort(
                        self.notifier.as_ref(),
                        booking.provider_id,
                        NotificationEvent::SessionReminder,
                        payload,
                    )
                    .await;

                    match self.repo.mark_reminder_sent(booking.id).await {
                        Ok(()) => report.reminders_sent += 1,
                        Err(e) => {
                            tracing::warn!(booking_id = %booking.id, error = %e,
                                "failed to mark reminder sent; will retry next tick");
                        }
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "reminder query failed; skipping this tick"),
        }

        // Expire subscriptions whose window has closed.
        match self
            .repo
            .expire_subscriptions_before(now.date_naive())
            .await
        {
            Ok(expired) => report.subscriptions_expired = expired,
            Err(e) => tracing::warn!(error = %e, "subscription expiry sweep failed"),
        }

        report
    }
}
