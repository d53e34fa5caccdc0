//! Inventory item operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_date, parse_datetime, Database};
use crate::brand::normalize_brand;
use crate::error::{Error, Result};
use crate::models::{Item, Location, NewItem};

const ITEM_COLUMNS: &str = "id, name, brand, location, purchase_date, best_by_date, price, image_path, spoiled, created_at";

fn row_to_item(row: &Row) -> rusqlite::Result<Item> {
    let location_str: String = row.get(3)?;
    let purchase_str: String = row.get(4)?;
    let best_by_str: String = row.get(5)?;
    let created_at_str: String = row.get(9)?;

    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        brand: row.get(2)?,
        location: location_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
        })?,
        purchase_date: parse_date(4, &purchase_str)?,
        best_by_date: parse_date(5, &best_by_str)?,
        price: row.get(6)?,
        image_path: row.get(7)?,
        spoiled: row.get(8)?,
        created_at: parse_datetime(&created_at_str),
    })
}

fn validate(item: &NewItem) -> Result<()> {
    if item.name.trim().is_empty() {
        return Err(Error::InvalidData("Item name is required".to_string()));
    }
    if !item.price.is_finite() || item.price < 0.0 {
        return Err(Error::InvalidData(format!(
            "Price must be a non-negative number, got {}",
            item.price
        )));
    }
    Ok(())
}

impl Database {
    /// Create an item, returning its ID
    pub fn create_item(&self, item: &NewItem) -> Result<i64> {
        validate(item)?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO items (name, brand, location, purchase_date, best_by_date, price, image_path, spoiled)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                item.name.trim(),
                normalize_brand(item.brand.as_deref()),
                item.location.as_str(),
                item.purchase_date.to_string(),
                item.best_by_date.to_string(),
                item.price,
                item.image_path,
                item.spoiled,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a single item by ID
    pub fn get_item(&self, id: i64) -> Result<Option<Item>> {
        let conn = self.conn()?;
        let item = conn
            .query_row(
                &format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS),
                params![id],
                row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    /// List all items, most recently created first
    pub fn list_items(&self) -> Result<Vec<Item>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items ORDER BY created_at DESC, id DESC",
            ITEM_COLUMNS
        ))?;

        let items = stmt
            .query_map([], row_to_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// List items in a location, most recently created first
    pub fn list_items_in(&self, location: Location) -> Result<Vec<Item>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items WHERE location = ? ORDER BY created_at DESC, id DESC",
            ITEM_COLUMNS
        ))?;

        let items = stmt
            .query_map(params![location.as_str()], row_to_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Items whose best-by date is on or before `cutoff` (includes expired items)
    pub fn list_items_expiring_by(&self, cutoff: NaiveDate) -> Result<Vec<Item>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items WHERE best_by_date <= ? ORDER BY best_by_date, id",
            ITEM_COLUMNS
        ))?;

        let items = stmt
            .query_map(params![cutoff.to_string()], row_to_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Replace an item's fields in place. Returns false if the item doesn't exist.
    pub fn update_item(&self, id: i64, item: &NewItem) -> Result<bool> {
        validate(item)?;
        let conn = self.conn()?;

        let updated = conn.execute(
            r#"
            UPDATE items
            SET name = ?1, brand = ?2, location = ?3, purchase_date = ?4,
                best_by_date = ?5, price = ?6, image_path = ?7, spoiled = ?8
            WHERE id = ?9
            "#,
            params![
                item.name.trim(),
                normalize_brand(item.brand.as_deref()),
                item.location.as_str(),
                item.purchase_date.to_string(),
                item.best_by_date.to_string(),
                item.price,
                item.image_path,
                item.spoiled,
                id,
            ],
        )?;

        Ok(updated > 0)
    }

    /// Delete an item and its reminders, returning the deleted row
    ///
    /// Price history is left untouched.
    pub fn delete_item(&self, id: i64) -> Result<Option<Item>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let item = tx
            .query_row(
                &format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS),
                params![id],
                row_to_item,
            )
            .optional()?;

        if item.is_some() {
            // Reminders go with the item even on a connection without foreign_keys
            tx.execute("DELETE FROM reminders WHERE item_id = ?", params![id])?;
            tx.execute("DELETE FROM items WHERE id = ?", params![id])?;
        }

        tx.commit()?;
        Ok(item)
    }
}
