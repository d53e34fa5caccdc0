//! Export of inventory and the price ledger
//!
//! Supports CSV (one row per record) and pretty-printed JSON arrays.

use std::io::Write;

use serde::Serialize;

use crate::db::Database;
use crate::error::Result;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {} (use csv or json)", s)),
        }
    }
}

/// What to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Items,
    Prices,
}

impl std::str::FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "items" => Ok(Self::Items),
            "prices" | "price_history" => Ok(Self::Prices),
            _ => Err(format!("Unknown export kind: {} (use items or prices)", s)),
        }
    }
}

fn write_records<T: Serialize, W: Write>(
    records: &[T],
    format: ExportFormat,
    writer: W,
) -> Result<usize> {
    match format {
        ExportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for record in records {
                csv_writer.serialize(record)?;
            }
            csv_writer.flush()?;
        }
        ExportFormat::Json => {
            serde_json::to_writer_pretty(writer, records)?;
        }
    }
    Ok(records.len())
}

impl Database {
    /// Write every item to `writer`, returning the number exported
    pub fn export_items<W: Write>(&self, format: ExportFormat, writer: W) -> Result<usize> {
        let items = self.list_items()?;
        write_records(&items, format, writer)
    }

    /// Write the full price ledger to `writer`, returning the number exported
    pub fn export_price_history<W: Write>(&self, format: ExportFormat, writer: W) -> Result<usize> {
        let entries = self.list_price_history()?;
        write_records(&entries, format, writer)
    }

    /// Export either dataset
    pub fn export<W: Write>(&self, kind: ExportKind, format: ExportFormat, writer: W) -> Result<usize> {
        match kind {
            ExportKind::Items => self.export_items(format, writer),
            ExportKind::Prices => self.export_price_history(format, writer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_prices_csv() {
        let db = Database::in_memory().unwrap();
        db.upsert_price("Milk", Some("Acme"), 3.5, date("2024-01-02"))
            .unwrap();
        db.upsert_price("Bread", None, 2.0, date("2024-01-01"))
            .unwrap();

        let mut out = Vec::new();
        let count = db
            .export_price_history(ExportFormat::Csv, &mut out)
            .unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,name,brand,price,recorded_on");
        assert!(lines[1].contains("Bread,,2.0,2024-01-01"));
        assert!(lines[2].contains("Milk,Acme,3.5,2024-01-02"));
    }

    #[test]
    fn test_export_items_json() {
        let db = Database::in_memory().unwrap();
        db.create_item(&crate::models::NewItem {
            name: "Peas".to_string(),
            brand: None,
            location: crate::models::Location::Freezer,
            purchase_date: date("2024-01-01"),
            best_by_date: date("2024-06-01"),
            price: 1.25,
            image_path: None,
            spoiled: false,
        })
        .unwrap();

        let mut out = Vec::new();
        db.export_items(ExportFormat::Json, &mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json[0]["name"], "Peas");
        assert_eq!(json[0]["location"], "Freezer");
        assert_eq!(json[0]["best_by_date"], "2024-06-01");
    }
}
