//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, sweep) and shared utilities (open_db)
//! - `export` - CSV/JSON export of items and the price ledger
//! - `items` - Inventory listing
//! - `reminders` - Reminder listing, close, clear
//! - `reports` - Spending and price tracker reports
//! - `serve` - Web server command

pub mod core;
pub mod export;
pub mod items;
pub mod reminders;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use self::core::*;
pub use export::*;
pub use items::*;
pub use reminders::*;
pub use reports::*;
pub use serve::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
