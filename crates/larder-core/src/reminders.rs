//! Expiration reminder engine
//!
//! A sweep keeps the reminder set in line with current inventory:
//! 1. Purge closed reminders older than the retention window
//! 2. Find items whose best-by date is within the warning threshold
//!    (already expired items included)
//! 3. Insert an open reminder per item unless an open reminder with the
//!    same message already exists
//!
//! Closed reminders never block re-creation. Sweeps are idempotent, so the
//! hourly timer and the per-mutation sweep may overlap freely.

use chrono::{DateTime, Days, Local, Months, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::Item;

/// Storage operations a sweep needs
pub trait ReminderStore {
    /// Delete closed reminders created strictly before `cutoff`
    fn purge_closed_reminders_before(&self, cutoff: DateTime<Utc>) -> Result<usize>;

    /// Items whose best-by date is on or before `cutoff`
    fn list_items_expiring_by(&self, cutoff: NaiveDate) -> Result<Vec<Item>>;

    /// Insert an open reminder unless an open one with the same item and
    /// message exists. Returns the new ID, or None when skipped.
    fn insert_reminder_if_absent(
        &self,
        item_id: i64,
        item_name: &str,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Option<i64>>;
}

impl ReminderStore for Database {
    fn purge_closed_reminders_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        Database::purge_closed_reminders_before(self, cutoff)
    }

    fn list_items_expiring_by(&self, cutoff: NaiveDate) -> Result<Vec<Item>> {
        Database::list_items_expiring_by(self, cutoff)
    }

    fn insert_reminder_if_absent(
        &self,
        item_id: i64,
        item_name: &str,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Option<i64>> {
        Database::insert_reminder_if_absent(self, item_id, item_name, message, created_at)
    }
}

/// Sweep thresholds
#[derive(Debug, Clone)]
struct ReminderConfig {
    /// Items within this many days of their best-by date get a reminder
    pub threshold_days: u64,
    /// Closed reminders older than this many months are purged
    pub closed_retention_months: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            threshold_days: 3,
            closed_retention_months: 1,
        }
    }
}

/// Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Closed reminders deleted by the purge
    pub purged: usize,
    /// Items inside the warning threshold
    pub matched: usize,
    /// New open reminders
    pub created: usize,
    /// Items that already had an identical open reminder
    pub already_open: usize,
    /// Inserts that failed (logged, not fatal to the sweep)
    pub failed: usize,
}

/// Reminder text for an item `days_left` days from its best-by date
///
/// The text is part of the dedup key, so it must be a pure function of the
/// day bucket.
pub fn expiry_message(days_left: i64, best_by: NaiveDate) -> String {
    match days_left {
        d if d < 0 => format!("ALERT: past due since {}", best_by),
        0 => "WARNING: expires today".to_string(),
        1 => "WARNING: expires in 1 day".to_string(),
        d => format!("WARNING: expires in {} days", d),
    }
}

/// Runs reminder sweeps against a store
pub struct ReminderEngine<'a, S: ReminderStore + ?Sized = Database> {
    store: &'a S,
    config: ReminderConfig,
}

impl<'a, S: ReminderStore + ?Sized> ReminderEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            config: ReminderConfig::default(),
        }
    }

    /// Sweep relative to the local wall clock
    pub fn sweep(&self) -> Result<SweepReport> {
        self.sweep_at(Local::now())
    }

    /// Sweep relative to `now`; "today" is `now`'s calendar date in its zone
    ///
    /// Fails only if the purge or the scan fails. Individual insert failures
    /// are counted in the report.
    pub fn sweep_at<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Result<SweepReport> {
        let today = now.date_naive();
        let now_utc = now.with_timezone(&Utc);

        let purge_cutoff = now_utc
            .checked_sub_months(Months::new(self.config.closed_retention_months))
            .ok_or_else(|| Error::InvalidData(format!("Purge cutoff out of range for {}", now_utc)))?;
        let scan_cutoff = today
            .checked_add_days(Days::new(self.config.threshold_days))
            .ok_or_else(|| Error::InvalidData(format!("Scan cutoff out of range for {}", today)))?;

        let mut report = SweepReport {
            purged: self.store.purge_closed_reminders_before(purge_cutoff)?,
            ..Default::default()
        };

        let items = self.store.list_items_expiring_by(scan_cutoff)?;
        report.matched = items.len();

        for item in &items {
            let days_left = item.days_until_best_by(today);
            let message = expiry_message(days_left, item.best_by_date);

            match self
                .store
                .insert_reminder_if_absent(item.id, &item.name, &message, now_utc)
            {
                Ok(Some(id)) => {
                    debug!(item_id = item.id, reminder_id = id, %message, "Reminder created");
                    report.created += 1;
                }
                Ok(None) => report.already_open += 1,
                Err(e) => {
                    warn!(item_id = item.id, error = %e, "Failed to create reminder");
                    report.failed += 1;
                }
            }
        }

        if report.created > 0 || report.purged > 0 || report.failed > 0 {
            info!(
                purged = report.purged,
                matched = report.matched,
                created = report.created,
                failed = report.failed,
                "Reminder sweep complete"
            );
        } else {
            debug!(matched = report.matched, "Reminder sweep found nothing new");
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, NewItem};
    use std::cell::RefCell;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn noon(s: &str) -> DateTime<Utc> {
        date(s).and_hms_opt(12, 0, 0).unwrap().and_utc()
    }

    fn new_item(name: &str, best_by: &str) -> NewItem {
        NewItem {
            name: name.to_string(),
            brand: None,
            location: Location::Fridge,
            purchase_date: date("2024-03-01"),
            best_by_date: date(best_by),
            price: 0.0,
            image_path: None,
            spoiled: false,
        }
    }

    #[test]
    fn test_expiry_message_buckets() {
        let best_by = date("2024-03-10");
        assert_eq!(
            expiry_message(-2, best_by),
            "ALERT: past due since 2024-03-10"
        );
        assert_eq!(expiry_message(0, best_by), "WARNING: expires today");
        assert_eq!(expiry_message(1, best_by), "WARNING: expires in 1 day");
        assert_eq!(expiry_message(3, best_by), "WARNING: expires in 3 days");
    }

    #[test]
    fn test_sweep_creates_one_reminder_per_bucket() {
        let db = Database::in_memory().unwrap();
        db.create_item(&new_item("Milk", "2024-03-08")).unwrap(); // past due
        db.create_item(&new_item("Eggs", "2024-03-10")).unwrap(); // today
        db.create_item(&new_item("Yogurt", "2024-03-13")).unwrap(); // 3 days
        db.create_item(&new_item("Cheese", "2024-03-14")).unwrap(); // 4 days, skipped

        let report = ReminderEngine::new(&db)
            .sweep_at(noon("2024-03-10"))
            .unwrap();
        assert_eq!(report.matched, 3);
        assert_eq!(report.created, 3);

        let reminders = db.list_reminders().unwrap();
        let mut messages: Vec<(String, String)> = reminders
            .active
            .iter()
            .map(|r| (r.item_name.clone(), r.message.clone()))
            .collect();
        messages.sort();
        assert_eq!(
            messages,
            vec![
                ("Eggs".to_string(), "WARNING: expires today".to_string()),
                (
                    "Milk".to_string(),
                    "ALERT: past due since 2024-03-08".to_string()
                ),
                ("Yogurt".to_string(), "WARNING: expires in 3 days".to_string()),
            ]
        );
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let db = Database::in_memory().unwrap();
        db.create_item(&new_item("Milk", "2024-03-11")).unwrap();

        let engine = ReminderEngine::new(&db);
        let first = engine.sweep_at(noon("2024-03-10")).unwrap();
        let second = engine.sweep_at(noon("2024-03-10")).unwrap();

        assert_eq!(first.created, 1);
        assert_eq!(second.created, 0);
        assert_eq!(second.already_open, 1);
        assert_eq!(db.list_reminders().unwrap().active.len(), 1);
    }

    #[test]
    fn test_new_bucket_adds_reminder() {
        let db = Database::in_memory().unwrap();
        db.create_item(&new_item("Milk", "2024-03-12")).unwrap();

        let engine = ReminderEngine::new(&db);
        engine.sweep_at(noon("2024-03-10")).unwrap();
        engine.sweep_at(noon("2024-03-11")).unwrap();

        let active = db.list_reminders().unwrap().active;
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].message, "WARNING: expires in 2 days");
        assert_eq!(active[1].message, "WARNING: expires in 1 day");
    }

    #[test]
    fn test_closed_reminder_does_not_block_recreation() {
        let db = Database::in_memory().unwrap();
        db.create_item(&new_item("Milk", "2024-03-08")).unwrap();

        let engine = ReminderEngine::new(&db);
        engine.sweep_at(noon("2024-03-10")).unwrap();
        let first = db.list_reminders().unwrap().active[0].clone();
        assert!(db.close_reminder(first.id).unwrap());

        let report = engine.sweep_at(noon("2024-03-10")).unwrap();
        assert_eq!(report.created, 1);

        let reminders = db.list_reminders().unwrap();
        assert_eq!(reminders.active.len(), 1);
        assert_eq!(reminders.closed.len(), 1);
        assert_eq!(reminders.active[0].message, first.message);
        assert_ne!(reminders.active[0].id, first.id);
    }

    #[test]
    fn test_purge_respects_one_month_boundary() {
        let db = Database::in_memory().unwrap();
        let item_id = db.create_item(&new_item("Jam", "2030-01-01")).unwrap();

        let now = noon("2024-03-10");
        let cutoff = now.checked_sub_months(Months::new(1)).unwrap();

        let at_boundary = db
            .insert_reminder_if_absent(item_id, "Jam", "at boundary", cutoff)
            .unwrap()
            .unwrap();
        let older = db
            .insert_reminder_if_absent(
                item_id,
                "Jam",
                "older",
                cutoff - chrono::Duration::seconds(1),
            )
            .unwrap()
            .unwrap();
        let still_open = db
            .insert_reminder_if_absent(item_id, "Jam", "open", noon("2023-01-01"))
            .unwrap()
            .unwrap();
        db.close_reminder(at_boundary).unwrap();
        db.close_reminder(older).unwrap();

        let report = ReminderEngine::new(&db).sweep_at(now).unwrap();
        assert_eq!(report.purged, 1);

        assert!(db.get_reminder(at_boundary).unwrap().is_some());
        assert!(db.get_reminder(older).unwrap().is_none());
        // Open reminders are never purged, however old
        assert!(db.get_reminder(still_open).unwrap().is_some());
    }

    /// Store double that fails inserts for one item
    struct FlakyStore {
        items: Vec<Item>,
        fail_item: i64,
        inserted: RefCell<Vec<(i64, String)>>,
        fail_scan: bool,
    }

    impl ReminderStore for FlakyStore {
        fn purge_closed_reminders_before(&self, _cutoff: DateTime<Utc>) -> Result<usize> {
            Ok(0)
        }

        fn list_items_expiring_by(&self, cutoff: NaiveDate) -> Result<Vec<Item>> {
            if self.fail_scan {
                return Err(Error::InvalidData("scan unavailable".to_string()));
            }
            Ok(self
                .items
                .iter()
                .filter(|i| i.best_by_date <= cutoff)
                .cloned()
                .collect())
        }

        fn insert_reminder_if_absent(
            &self,
            item_id: i64,
            _item_name: &str,
            message: &str,
            _created_at: DateTime<Utc>,
        ) -> Result<Option<i64>> {
            if item_id == self.fail_item {
                return Err(Error::InvalidData("insert rejected".to_string()));
            }
            let mut inserted = self.inserted.borrow_mut();
            inserted.push((item_id, message.to_string()));
            Ok(Some(inserted.len() as i64))
        }
    }

    fn stub_item(id: i64, best_by: &str) -> Item {
        Item {
            id,
            name: format!("item-{}", id),
            brand: None,
            location: Location::Pantry,
            purchase_date: date("2024-01-01"),
            best_by_date: date(best_by),
            price: 0.0,
            image_path: None,
            spoiled: false,
            created_at: noon("2024-01-01"),
        }
    }

    #[test]
    fn test_failed_insert_does_not_block_others() {
        let store = FlakyStore {
            items: vec![
                stub_item(1, "2024-03-09"),
                stub_item(2, "2024-03-10"),
                stub_item(3, "2024-03-11"),
            ],
            fail_item: 2,
            inserted: RefCell::new(vec![]),
            fail_scan: false,
        };

        let report = ReminderEngine::new(&store)
            .sweep_at(noon("2024-03-10"))
            .unwrap();

        assert_eq!(report.matched, 3);
        assert_eq!(report.created, 2);
        assert_eq!(report.failed, 1);
        let ids: Vec<i64> = store.inserted.borrow().iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_scan_failure_aborts_sweep() {
        let store = FlakyStore {
            items: vec![stub_item(1, "2024-03-09")],
            fail_item: 0,
            inserted: RefCell::new(vec![]),
            fail_scan: true,
        };

        let result = ReminderEngine::new(&store).sweep_at(noon("2024-03-10"));
        assert!(result.is_err());
        assert!(store.inserted.borrow().is_empty());
    }
}
