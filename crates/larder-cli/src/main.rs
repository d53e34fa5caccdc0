//! Larder CLI - Household inventory and expiration tracker
//!
//! Usage:
//!   larder init                 Initialize database
//!   larder serve --port 3000    Start web server
//!   larder sweep                Refresh expiration reminders
//!   larder spending -p month    Show spending

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            uploads_dir,
            static_dir,
            sweep_interval_mins,
            allowed_origins,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                &uploads_dir,
                static_dir.as_deref(),
                sweep_interval_mins,
                allowed_origins,
            )
            .await
        }
        Commands::Sweep => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_sweep(&db)
        }
        Commands::Items { location } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_items(&db, location.as_deref())
        }
        Commands::Reminders { all, action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_reminders_list(&db, all),
                Some(RemindersAction::Close { id }) => commands::cmd_reminders_close(&db, id),
                Some(RemindersAction::Clear) => commands::cmd_reminders_clear(&db),
            }
        }
        Commands::Spending { period } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_spending(&db, &period)
        }
        Commands::Prices { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_prices_list(&db),
                Some(PricesAction::Diff {
                    name,
                    brand,
                    start,
                    end,
                }) => commands::cmd_prices_diff(&db, &name, brand.as_deref(), &start, &end),
            }
        }
        Commands::Export {
            kind,
            format,
            output,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_export(&db, &kind, &format, output)
        }
    }
}
