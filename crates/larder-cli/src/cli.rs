//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Larder - Track what's in the pantry, fridge and freezer
#[derive(Parser)]
#[command(name = "larder")]
#[command(about = "Self-hosted household inventory and expiration tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, env = "LARDER_DB", default_value = "larder.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory for uploaded item images
        #[arg(long, env = "LARDER_UPLOADS_DIR", default_value = "uploads")]
        uploads_dir: PathBuf,

        /// Directory of static UI files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Minutes between timed reminder sweeps (0 disables the timer)
        #[arg(long, env = "LARDER_SWEEP_INTERVAL_MINS", default_value = "60")]
        sweep_interval_mins: u64,

        /// Allowed CORS origins, comma-separated (default: same-origin only)
        #[arg(long, env = "LARDER_ALLOWED_ORIGINS", value_delimiter = ',')]
        allowed_origins: Vec<String>,
    },

    /// Run one reminder sweep now
    Sweep,

    /// List items with days until best-by
    Items {
        /// Only items in this location (pantry, fridge, freezer)
        #[arg(short, long)]
        location: Option<String>,
    },

    /// List and manage expiration reminders
    Reminders {
        /// Include closed reminders
        #[arg(short, long)]
        all: bool,

        #[command(subcommand)]
        action: Option<RemindersAction>,
    },

    /// Show spending for a period
    Spending {
        /// Period: week, month, year, annual, all
        #[arg(short, long, default_value = "all")]
        period: String,
    },

    /// List tracked products or compare prices
    Prices {
        #[command(subcommand)]
        action: Option<PricesAction>,
    },

    /// Export items or the price ledger
    Export {
        /// What to export: items, prices
        #[arg(short, long, default_value = "items")]
        kind: String,

        /// Output format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum RemindersAction {
    /// Close a reminder
    Close {
        /// Reminder ID
        id: i64,
    },
    /// Delete all closed reminders
    Clear,
}

#[derive(Subcommand)]
pub enum PricesAction {
    /// Price change between two dates
    Diff {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Brand (omit for unbranded)
        #[arg(short, long)]
        brand: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,
    },
}
