//! Aggregate queries for spend analytics

use chrono::NaiveDate;
use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::{Location, YearlySpending};

impl Database {
    /// Sum of ledger prices recorded within [from, to]; `None` leaves a side open
    pub fn ledger_total(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(price), 0)
            FROM price_history
            WHERE (?1 IS NULL OR recorded_on >= ?1)
              AND (?2 IS NULL OR recorded_on <= ?2)
            "#,
            params![from.map(|d| d.to_string()), to.map(|d| d.to_string())],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Sum of current items' prices by location, filtered on purchase date
    ///
    /// Only items with a positive price count. Locations with no matching
    /// items are omitted.
    pub fn item_spending_by_location(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<(Location, f64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT location, COALESCE(SUM(price), 0)
            FROM items
            WHERE price > 0
              AND (?1 IS NULL OR purchase_date >= ?1)
              AND (?2 IS NULL OR purchase_date <= ?2)
            GROUP BY location
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![from.map(|d| d.to_string()), to.map(|d| d.to_string())],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)),
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|(loc, total)| loc.parse::<Location>().ok().map(|l| (l, total)))
            .collect())
    }

    /// Ledger totals per calendar year, most recent year first
    pub fn ledger_totals_by_year(&self) -> Result<Vec<YearlySpending>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT CAST(strftime('%Y', recorded_on) AS INTEGER) AS year,
                   COALESCE(SUM(price), 0)
            FROM price_history
            GROUP BY year
            ORDER BY year DESC
            "#,
        )?;

        let years = stmt
            .query_map([], |row| {
                Ok(YearlySpending {
                    year: row.get(0)?,
                    total_spent: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(years)
    }
}
