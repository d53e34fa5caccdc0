//! Background task scheduler for reminder sweeps
//!
//! Item writes already trigger a sweep, but an item that nobody touches
//! still crosses into the reminder window as days pass. The scheduler
//! re-runs the sweep on a fixed interval so those reminders appear too.
//!
//! The schedule comes from `ServerConfig::sweep_schedule` (the CLI fills it
//! from `--sweep-interval-mins` / `LARDER_SWEEP_INTERVAL_MINS`).

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{error, info, warn};

use larder_core::{Database, ReminderEngine};

/// Configuration for scheduled reminder sweeps
#[derive(Debug, Clone)]
pub struct ReminderScheduleConfig {
    /// Interval between sweeps
    pub interval: Duration,
}

impl ReminderScheduleConfig {
    /// Build from a minute count, as given on the command line
    ///
    /// Returns None when the count is zero (timer disabled).
    pub fn from_minutes(minutes: u64) -> Option<Self> {
        if minutes == 0 {
            warn!("Reminder sweep interval is 0, scheduled sweeps disabled");
            return None;
        }
        Some(Self {
            interval: Duration::from_secs(minutes.saturating_mul(60)),
        })
    }
}

/// Start the reminder scheduler as a background task
///
/// The first tick is skipped; `serve_with_config` already sweeps at startup.
pub fn start_reminder_scheduler(db: Database, config: ReminderScheduleConfig) -> JoinHandle<()> {
    info!(
        "Starting reminder scheduler: every {} minutes",
        config.interval.as_secs() / 60
    );

    tokio::spawn(async move {
        let mut ticker = interval(config.interval);
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match ReminderEngine::new(&db).sweep() {
                Ok(report) => {
                    info!(
                        purged = report.purged,
                        matched = report.matched,
                        created = report.created,
                        failed = report.failed,
                        "Scheduled reminder sweep completed"
                    );
                }
                Err(e) => {
                    error!("Scheduled reminder sweep failed: {}", e);
                }
            }
        }
    })
}
