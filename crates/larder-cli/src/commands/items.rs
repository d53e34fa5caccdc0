//! Inventory listing

use anyhow::{Context, Result};
use chrono::Local;
use larder_core::{db::Database, models::Location};

use super::truncate;

pub fn cmd_items(db: &Database, location: Option<&str>) -> Result<()> {
    let items = match location {
        Some(loc) => {
            let location: Location = loc
                .parse()
                .map_err(anyhow::Error::msg)
                .context("Invalid --location (use pantry, fridge or freezer)")?;
            db.list_items_in(location)?
        }
        None => db.list_items()?,
    };

    if items.is_empty() {
        println!("No items found. Add some from the web UI: larder serve");
        return Ok(());
    }

    let today = Local::now().date_naive();

    println!();
    println!(
        "{:>5}  {:<24} {:<16} {:<8} {:>10}  {:>9}",
        "ID", "Name", "Brand", "Where", "Best by", "Days left"
    );
    println!("   ─────────────────────────────────────────────────────────────────────────────");

    for item in &items {
        let days = item.days_until_best_by(today);
        let marker = if days < 0 {
            "❌"
        } else if days <= 3 {
            "⚠️"
        } else {
            "  "
        };
        let spoiled = if item.spoiled { " (spoiled)" } else { "" };

        println!(
            "{:>5}  {:<24} {:<16} {:<8} {:>10}  {:>6} {}{}",
            item.id,
            truncate(&item.name, 24),
            truncate(item.brand.as_deref().unwrap_or("-"), 16),
            item.location.as_str(),
            item.best_by_date.format("%Y-%m-%d"),
            days,
            marker,
            spoiled
        );
    }

    println!();
    println!("   {} item(s)", items.len());

    Ok(())
}
