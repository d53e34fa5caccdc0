//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod items;
pub mod prices;
pub mod reminders;
pub mod stats;

// Re-export all handlers for use in router
pub use items::*;
pub use prices::*;
pub use reminders::*;
pub use stats::*;
