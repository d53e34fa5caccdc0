//! Price ledger operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_date, Database};
use crate::brand::{normalize_brand, BRAND_MATCHES_SQL};
use crate::error::Result;
use crate::models::{PriceEntry, TrackedProduct};

const PRICE_COLUMNS: &str = "id, name, brand, price, recorded_on";

fn row_to_price_entry(row: &Row) -> rusqlite::Result<PriceEntry> {
    let recorded_on_str: String = row.get(4)?;
    Ok(PriceEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        brand: row.get(2)?,
        price: row.get(3)?,
        recorded_on: parse_date(4, &recorded_on_str)?,
    })
}

impl Database {
    /// Insert or overwrite the ledger entry for (name, brand, day)
    pub fn upsert_price(
        &self,
        name: &str,
        brand: Option<&str>,
        price: f64,
        day: NaiveDate,
    ) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO price_history (name, brand, price, recorded_on)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(name, COALESCE(brand, ''), recorded_on)
            DO UPDATE SET price = excluded.price
            "#,
            params![
                name.trim(),
                normalize_brand(brand),
                price,
                day.to_string()
            ],
        )?;
        Ok(())
    }

    /// Latest ledger entry for a product recorded on or before `date`
    pub fn latest_price_on_or_before(
        &self,
        name: &str,
        brand: Option<&str>,
        date: NaiveDate,
    ) -> Result<Option<PriceEntry>> {
        let conn = self.conn()?;
        let entry = conn
            .query_row(
                &format!(
                    "SELECT {} FROM price_history WHERE name = ? AND {} AND recorded_on <= ? ORDER BY recorded_on DESC LIMIT 1",
                    PRICE_COLUMNS, BRAND_MATCHES_SQL
                ),
                params![name.trim(), normalize_brand(brand), date.to_string()],
                row_to_price_entry,
            )
            .optional()?;
        Ok(entry)
    }

    /// Full ledger history for one product, oldest first
    pub fn get_price_history(&self, name: &str, brand: Option<&str>) -> Result<Vec<PriceEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM price_history WHERE name = ? AND {} ORDER BY recorded_on ASC",
            PRICE_COLUMNS, BRAND_MATCHES_SQL
        ))?;
        let entries = stmt
            .query_map(params![name.trim(), normalize_brand(brand)], row_to_price_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Every ledger entry, ordered by day then product
    pub fn list_price_history(&self) -> Result<Vec<PriceEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM price_history ORDER BY recorded_on ASC, name ASC, brand ASC",
            PRICE_COLUMNS
        ))?;
        let entries = stmt
            .query_map([], row_to_price_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Distinct (name, brand) pairs in the ledger, by name then brand
    pub fn list_tracked_products(&self) -> Result<Vec<TrackedProduct>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT name, brand FROM price_history ORDER BY name ASC, brand ASC",
        )?;
        let products = stmt
            .query_map([], |row| {
                Ok(TrackedProduct {
                    name: row.get(0)?,
                    brand: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(products)
    }
}
