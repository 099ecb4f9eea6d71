//! Periodic delivery of due reminders.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use database::{reminder, Database};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::DEFAULT_REMINDER_INTERVAL;
use crate::error::OrchestratorError;
use crate::sender::MessageSender;

/// Text delivered for a due reminder.
pub fn reminder_text(message: &str) -> String {
    format!("🔔 Reminder: {}", message)
}

/// Outcome of one scan over the reminder queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Reminders that were due and taken off the queue.
    pub fired: usize,
    /// Reminders whose delivery succeeded.
    pub delivered: usize,
    /// Reminders whose delivery failed. These are not retried.
    pub failed: usize,
}

/// Fires due reminders on a fixed interval.
///
/// Each due reminder gets exactly one delivery attempt and is then removed
/// whether or not delivery succeeded. A crash between sending and removing
/// means the reminder is sent again on the next scan.
pub struct ReminderScheduler<S: MessageSender> {
    database: Database,
    sender: S,
    poll_interval: Duration,
}

impl<S: MessageSender> ReminderScheduler<S> {
    /// Create a scheduler with the default 30 second poll interval.
    pub fn new(database: Database, sender: S) -> Self {
        Self {
            database,
            sender,
            poll_interval: DEFAULT_REMINDER_INTERVAL,
        }
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Get the message sender.
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Fire every reminder due at or before `now`.
    pub async fn scan_once(&self, now: DateTime<Utc>) -> Result<ScanReport, OrchestratorError> {
        let pool = self.database.pool();
        let due = reminder::due_reminders(pool, now).await?;
        let mut report = ScanReport::default();

        for due_reminder in due {
            let text = reminder_text(&due_reminder.message);
            match self.sender.send_message(due_reminder.chat_id, &text).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(
                        reminder_id = due_reminder.id,
                        chat_id = due_reminder.chat_id,
                        "Reminder delivery failed, dropping: {}",
                        e
                    );
                    report.failed += 1;
                }
            }

            if let Err(e) = reminder::remove(pool, due_reminder.id).await {
                warn!(reminder_id = due_reminder.id, "Failed to remove fired reminder: {}", e);
            }
            report.fired += 1;
        }

        Ok(report)
    }

    /// Scan on every tick until the shutdown signal completes.
    pub async fn run_with_shutdown<F>(&self, shutdown_signal: F)
    where
        F: Future<Output = ()> + Send,
    {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(poll_interval = ?self.poll_interval, "Starting reminder scheduler");

        tokio::pin!(shutdown_signal);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown_signal => {
                    info!("Shutdown signal received, stopping reminder scheduler");
                    return;
                }

                _ = ticker.tick() => {
                    match self.scan_once(Utc::now()).await {
                        Ok(report) if report.fired > 0 => {
                            info!(
                                fired = report.fired,
                                failed = report.failed,
                                "Fired due reminders"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!("Reminder scan failed: {}", e);
                            continue;
                        }
                    }

                    match reminder::next_due_at(self.database.pool()).await {
                        Ok(Some(next)) => debug!("Next reminder due at {}", next),
                        Ok(None) => debug!("No reminders pending"),
                        Err(e) => debug!("Could not read next reminder: {}", e),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::TimeZone;
    use tokio::sync::oneshot;

    use crate::sender::RecordingSender;

    fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, 0).unwrap()
    }

    async fn setup(sender: RecordingSender) -> (ReminderScheduler<Arc<RecordingSender>>, Database, Arc<RecordingSender>) {
        let db = Database::in_memory().await.unwrap();
        let sender = Arc::new(sender);
        (ReminderScheduler::new(db.clone(), sender.clone()), db, sender)
    }

    #[test]
    fn test_reminder_text() {
        assert_eq!(reminder_text("buy milk"), "🔔 Reminder: buy milk");
    }

    #[tokio::test]
    async fn test_scan_fires_due_once() {
        let (scheduler, db, sender) = setup(RecordingSender::new()).await;
        reminder::schedule(db.pool(), 1, 2, "stretch", at(2030, 1, 1, 9, 0)).await.unwrap();
        reminder::schedule(db.pool(), 3, 2, "later", at(2030, 1, 1, 10, 0)).await.unwrap();

        let report = scheduler.scan_once(at(2030, 1, 1, 9, 0)).await.unwrap();
        assert_eq!(report, ScanReport { fired: 1, delivered: 1, failed: 0 });
        assert_eq!(sender.texts(), vec!["🔔 Reminder: stretch"]);
        assert_eq!(sender.sent()[0].chat_id, 1);

        let report = scheduler.scan_once(at(2030, 1, 1, 9, 0)).await.unwrap();
        assert_eq!(report, ScanReport::default());
        assert_eq!(sender.texts().len(), 1);
    }

    #[tokio::test]
    async fn test_scan_fires_in_due_order() {
        let (scheduler, db, sender) = setup(RecordingSender::new()).await;
        reminder::schedule(db.pool(), 1, 2, "second", at(2030, 1, 2, 0, 0)).await.unwrap();
        reminder::schedule(db.pool(), 1, 2, "first", at(2030, 1, 1, 0, 0)).await.unwrap();

        let report = scheduler.scan_once(at(2031, 1, 1, 0, 0)).await.unwrap();
        assert_eq!(report.fired, 2);
        assert_eq!(sender.texts(), vec!["🔔 Reminder: first", "🔔 Reminder: second"]);
    }

    #[tokio::test]
    async fn test_failed_delivery_still_removes() {
        let (scheduler, db, sender) = setup(RecordingSender::new().failing()).await;
        reminder::schedule(db.pool(), 1, 2, "lost", at(2030, 1, 1, 0, 0)).await.unwrap();

        let report = scheduler.scan_once(at(2030, 1, 1, 0, 0)).await.unwrap();
        assert_eq!(report, ScanReport { fired: 1, delivered: 0, failed: 1 });
        assert_eq!(sender.texts().len(), 1);

        assert!(reminder::due_reminders(db.pool(), at(2030, 1, 1, 0, 0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scan_on_closed_database_errors() {
        let (scheduler, db, _sender) = setup(RecordingSender::new()).await;
        db.close().await;

        assert!(matches!(
            scheduler.scan_once(Utc::now()).await,
            Err(OrchestratorError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_run_fires_and_stops() {
        let (scheduler, db, sender) = setup(RecordingSender::new()).await;
        reminder::schedule(db.pool(), 1, 2, "now", Utc::now()).await.unwrap();

        let scheduler = Arc::new(scheduler.with_poll_interval(Duration::from_millis(20)));
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let runner = scheduler.clone();
        let handle = tokio::spawn(async move {
            runner
                .run_with_shutdown(async {
                    let _ = stop_rx.await;
                })
                .await;
        });

        for _ in 0..100 {
            if !sender.texts().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        stop_tx.send(()).unwrap();
        handle.await.unwrap();

        assert_eq!(sender.texts(), vec!["🔔 Reminder: now"]);
    }
}
