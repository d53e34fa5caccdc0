//! Larder Core Library
//!
//! Shared functionality for the Larder household inventory tracker:
//! - Database access and migrations (items, reminders, price ledger)
//! - Reminder engine for best-by expiration sweeps
//! - Price ledger with per-day upserts and price-difference lookups
//! - Spending aggregation over the ledger and current inventory
//! - CSV/JSON export

pub mod brand;
pub mod db;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod reminders;
pub mod spending;

pub use brand::normalize_brand;
pub use db::Database;
pub use error::{Error, Result};
pub use export::{ExportFormat, ExportKind};
pub use ledger::{Boundary, PriceHistory, PriceLedger, RecordOutcome};
pub use reminders::{expiry_message, ReminderEngine, ReminderStore, SweepReport};
pub use spending::{SpendingAggregator, SpendingStore};
