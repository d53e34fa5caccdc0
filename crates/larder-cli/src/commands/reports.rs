//! Report command implementations (spending, price tracker)

use anyhow::{Context, Result};
use chrono::NaiveDate;
use larder_core::{
    db::Database,
    models::{SpendingPeriod, SpendingReport},
    PriceHistory, SpendingAggregator,
};

pub fn cmd_spending(db: &Database, period: &str) -> Result<()> {
    let period: SpendingPeriod = period
        .parse()
        .map_err(anyhow::Error::msg)
        .context("Invalid --period (use week, month, year, annual or all)")?;

    let report = SpendingAggregator::new(db).aggregate(period)?;

    println!();
    println!("💰 Spending ({})", period);
    println!("   ─────────────────────────────────────────");

    match report {
        SpendingReport::Window(summary) => {
            println!("   Total (price log):  ${:>10.2}", summary.total_spent);
            println!();
            println!("   In inventory now:");
            println!("     Pantry:           ${:>10.2}", summary.pantry_spent);
            println!("     Fridge:           ${:>10.2}", summary.fridge_spent);
            println!("     Freezer:          ${:>10.2}", summary.freezer_spent);
        }
        SpendingReport::Annual(years) => {
            if years.is_empty() {
                println!("   No purchases recorded yet.");
            }
            for year in &years {
                println!("   {}:  ${:>10.2}", year.year, year.total_spent);
            }
        }
    }

    println!();
    Ok(())
}

pub fn cmd_prices_list(db: &Database) -> Result<()> {
    let products = db.list_tracked_products()?;

    if products.is_empty() {
        println!("No prices recorded yet. Prices are logged when items are saved.");
        return Ok(());
    }

    println!();
    println!("🏷️  Tracked products");
    println!("   ─────────────────────────────────────────");
    for product in &products {
        match &product.brand {
            Some(brand) => println!("   {} ({})", product.name, brand),
            None => println!("   {}", product.name),
        }
    }
    println!();
    println!("   Compare with: larder prices diff --name <name> --start <date> --end <date>");

    Ok(())
}

pub fn cmd_prices_diff(
    db: &Database,
    name: &str,
    brand: Option<&str>,
    start: &str,
    end: &str,
) -> Result<()> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .context("Invalid --start date format (use YYYY-MM-DD)")?;
    let end = NaiveDate::parse_from_str(end, "%Y-%m-%d")
        .context("Invalid --end date format (use YYYY-MM-DD)")?;

    let diff = PriceHistory::new(db).price_difference(name, brand, start, end)?;

    let icon = if diff.difference > 0.0 {
        "📈"
    } else if diff.difference < 0.0 {
        "📉"
    } else {
        "➖"
    };

    println!();
    match &diff.brand {
        Some(b) => println!("{} {} ({})", icon, diff.name, b),
        None => println!("{} {}", icon, diff.name),
    }
    println!("   {}: ${:.2}", diff.start_date, diff.start_price);
    println!("   {}: ${:.2}", diff.end_date, diff.end_price);
    println!("   Change: {:+.2}", diff.difference);
    println!();

    Ok(())
}
