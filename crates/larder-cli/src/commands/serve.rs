//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use larder_server::{ReminderScheduleConfig, ServerConfig};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    uploads_dir: &Path,
    static_dir: Option<&Path>,
    sweep_interval_mins: u64,
    allowed_origins: Vec<String>,
) -> Result<()> {
    println!("🚀 Starting Larder web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!("   Uploads: {}", uploads_dir.display());
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    if sweep_interval_mins == 0 {
        println!("   ⏰ Reminder sweeps: on item changes only");
    } else {
        println!("   ⏰ Reminder sweeps: every {} min", sweep_interval_mins);
    }

    let allowed_origins: Vec<String> = allowed_origins
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();
    if !allowed_origins.is_empty() {
        println!("   🌐 CORS origins: {}", allowed_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    // Fatal before serving if the store can't be opened
    let db = open_db(db_path)?;

    std::fs::create_dir_all(uploads_dir).with_context(|| {
        format!(
            "Failed to create uploads directory: {}",
            uploads_dir.display()
        )
    })?;

    let config = ServerConfig {
        allowed_origins,
        uploads_dir: uploads_dir.to_path_buf(),
        sweep_schedule: ReminderScheduleConfig::from_minutes(sweep_interval_mins),
    };

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    larder_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
