//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_sweep` - Run one reminder sweep

use std::path::Path;

use anyhow::{Context, Result};
use larder_core::{db::Database, ReminderEngine};

/// Open (and migrate) the database at `db_path`
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Start web UI: larder serve");
    println!("  2. Add items from the browser, then check: larder reminders");

    Ok(())
}

pub fn cmd_sweep(db: &Database) -> Result<()> {
    println!("🔍 Sweeping for expiring items...");

    let report = ReminderEngine::new(db)
        .sweep()
        .context("Reminder sweep failed")?;
    tracing::debug!(?report, "Sweep report");

    println!();
    println!("✅ Sweep complete!");
    println!("   Closed reminders purged: {}", report.purged);
    println!("   Items expiring soon:     {}", report.matched);
    println!("   New reminders:           {}", report.created);
    println!("   Already reminded:        {}", report.already_open);
    if report.failed > 0 {
        println!("   ⚠️  Failed inserts:       {}", report.failed);
    }

    if report.created > 0 {
        println!();
        println!("Run 'larder reminders' to see them.");
    }

    Ok(())
}
