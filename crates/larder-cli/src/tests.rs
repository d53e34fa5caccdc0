//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use chrono::{Duration, Local, NaiveDate};
use larder_core::db::Database;
use larder_core::models::{Location, NewItem};

use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Create an item whose best-by date is `days` from today
fn create_test_item(db: &Database, name: &str, days: i64) -> i64 {
    let today = Local::now().date_naive();
    db.create_item(&NewItem {
        name: name.to_string(),
        brand: None,
        location: Location::Pantry,
        purchase_date: today,
        best_by_date: today + Duration::days(days),
        price: 2.5,
        image_path: None,
        spoiled: false,
    })
    .unwrap()
}

// ========== Core Command Tests ==========

#[test]
fn test_open_db_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("larder.db");

    commands::cmd_init(&path).unwrap();
    assert!(path.exists());

    let db = commands::open_db(&path).unwrap();
    assert!(db.list_items().unwrap().is_empty());
}

#[test]
fn test_cmd_sweep_creates_reminders() {
    let db = setup_test_db();
    let soon = create_test_item(&db, "Milk", 2);
    create_test_item(&db, "Rice", 200);

    commands::cmd_sweep(&db).unwrap();

    let active = db.list_reminders().unwrap().active;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].item_id, Some(soon));

    // Second sweep is a no-op
    commands::cmd_sweep(&db).unwrap();
    assert_eq!(db.list_reminders().unwrap().active.len(), 1);
}

// ========== Items Command Tests ==========

#[test]
fn test_cmd_items() {
    let db = setup_test_db();
    assert!(commands::cmd_items(&db, None).is_ok());

    create_test_item(&db, "Flour", 90);
    assert!(commands::cmd_items(&db, None).is_ok());
    assert!(commands::cmd_items(&db, Some("pantry")).is_ok());
}

#[test]
fn test_cmd_items_invalid_location() {
    let db = setup_test_db();
    assert!(commands::cmd_items(&db, Some("garage")).is_err());
}

// ========== Reminders Command Tests ==========

#[test]
fn test_cmd_reminders_close_and_clear() {
    let db = setup_test_db();
    create_test_item(&db, "Milk", 0);
    commands::cmd_sweep(&db).unwrap();

    let id = db.list_reminders().unwrap().active[0].id;
    assert!(commands::cmd_reminders_list(&db, false).is_ok());

    commands::cmd_reminders_close(&db, id).unwrap();
    assert!(db.get_reminder(id).unwrap().unwrap().closed);
    assert!(commands::cmd_reminders_list(&db, true).is_ok());

    commands::cmd_reminders_clear(&db).unwrap();
    assert!(db.get_reminder(id).unwrap().is_none());
}

#[test]
fn test_cmd_reminders_close_missing() {
    let db = setup_test_db();
    assert!(commands::cmd_reminders_close(&db, 999).is_err());
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_spending_periods() {
    let db = setup_test_db();
    db.upsert_price("Milk", None, 3.0, date("2024-01-01")).unwrap();

    for period in ["week", "month", "year", "annual", "all"] {
        assert!(commands::cmd_spending(&db, period).is_ok(), "{}", period);
    }
    assert!(commands::cmd_spending(&db, "fortnight").is_err());
}

#[test]
fn test_cmd_prices() {
    let db = setup_test_db();
    assert!(commands::cmd_prices_list(&db).is_ok());

    db.upsert_price("Coffee", Some("Roastery"), 10.0, date("2024-01-01"))
        .unwrap();
    db.upsert_price("Coffee", Some("Roastery"), 12.0, date("2024-06-01"))
        .unwrap();
    assert!(commands::cmd_prices_list(&db).is_ok());

    assert!(commands::cmd_prices_diff(
        &db,
        "Coffee",
        Some("Roastery"),
        "2024-01-15",
        "2024-06-15"
    )
    .is_ok());

    // Nothing on or before the start date
    assert!(
        commands::cmd_prices_diff(&db, "Coffee", Some("Roastery"), "2023-01-01", "2024-06-15")
            .is_err()
    );
    assert!(
        commands::cmd_prices_diff(&db, "Coffee", Some("Roastery"), "01/15/2024", "2024-06-15")
            .is_err()
    );
}

// ========== Export Command Tests ==========

#[test]
fn test_cmd_export_to_file() {
    let db = setup_test_db();
    create_test_item(&db, "Beans", 100);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.json");

    commands::cmd_export(&db, "items", "json", Some(path.clone())).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json[0]["name"], "Beans");
}

#[test]
fn test_cmd_export_prices_csv() {
    let db = setup_test_db();
    db.upsert_price("Milk", None, 3.0, date("2024-01-01")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");

    commands::cmd_export(&db, "prices", "csv", Some(path.clone())).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("id,name,brand,price,recorded_on"));
    assert!(text.contains("Milk,,3.0,2024-01-01"));
}

#[test]
fn test_cmd_export_invalid_format() {
    let db = setup_test_db();
    assert!(commands::cmd_export(&db, "items", "xml", None).is_err());
    assert!(commands::cmd_export(&db, "receipts", "csv", None).is_err());
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer name", 10), "a much ...");
    assert_eq!(truncate("crème fraîche", 8), "crème...");
}
