//! Side effects that follow a successful item write
//!
//! The item row is already committed when these run, so failures here are
//! logged and never turn the request into an error.

use tracing::{debug, warn};

use larder_core::{models::NewItem, Database, PriceHistory, RecordOutcome, ReminderEngine};

/// Record the item's price in the ledger, then refresh reminders
pub fn after_item_write(db: &Database, item: &NewItem) {
    match PriceHistory::new(db).record(
        &item.name,
        item.brand.as_deref(),
        item.price,
        item.purchase_date,
    ) {
        Ok(RecordOutcome::Recorded) => {}
        Ok(RecordOutcome::Skipped) => {
            debug!(name = %item.name, "Price not positive, ledger untouched");
        }
        Err(e) => warn!("Failed to record price for {}: {}", item.name, e),
    }

    match ReminderEngine::new(db).sweep() {
        Ok(report) => debug!(
            created = report.created,
            purged = report.purged,
            "Reminder sweep after item write"
        ),
        Err(e) => warn!("Reminder sweep after item write failed: {}", e),
    }
}
