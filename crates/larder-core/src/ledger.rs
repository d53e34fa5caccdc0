//! Price history ledger
//!
//! Every item write with a real price records (name, brand, purchase day,
//! price). Repeated writes for the same key on the same day collapse into
//! one entry holding the latest price; writes on other days accumulate
//! history. The ledger has no link to items, so it survives edits and
//! deletes.

use chrono::NaiveDate;
use tracing::debug;

use crate::brand::normalize_brand;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{PriceDifference, PriceEntry};

/// Storage operations the ledger needs
pub trait PriceLedger {
    /// Insert or overwrite the entry for (name, brand, day)
    fn upsert_price(&self, name: &str, brand: Option<&str>, price: f64, day: NaiveDate)
        -> Result<()>;

    /// Latest entry for (name, brand) recorded on or before `date`
    fn latest_price_on_or_before(
        &self,
        name: &str,
        brand: Option<&str>,
        date: NaiveDate,
    ) -> Result<Option<PriceEntry>>;
}

impl PriceLedger for Database {
    fn upsert_price(
        &self,
        name: &str,
        brand: Option<&str>,
        price: f64,
        day: NaiveDate,
    ) -> Result<()> {
        Database::upsert_price(self, name, brand, price, day)
    }

    fn latest_price_on_or_before(
        &self,
        name: &str,
        brand: Option<&str>,
        date: NaiveDate,
    ) -> Result<Option<PriceEntry>> {
        Database::latest_price_on_or_before(self, name, brand, date)
    }
}

/// What `record` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    /// Zero or negative price; nothing written
    Skipped,
}

/// Which side of a price comparison a lookup was for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
}

impl Boundary {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// Price ledger operations over a store
pub struct PriceHistory<'a, L: PriceLedger + ?Sized = Database> {
    store: &'a L,
}

impl<'a, L: PriceLedger + ?Sized> PriceHistory<'a, L> {
    pub fn new(store: &'a L) -> Self {
        Self { store }
    }

    /// Record a purchase price for the given day
    ///
    /// Prices of zero or less are not purchases and are skipped.
    pub fn record(
        &self,
        name: &str,
        brand: Option<&str>,
        price: f64,
        day: NaiveDate,
    ) -> Result<RecordOutcome> {
        if price.is_nan() || price <= 0.0 {
            return Ok(RecordOutcome::Skipped);
        }
        let brand = normalize_brand(brand);
        self.store.upsert_price(name, brand.as_deref(), price, day)?;
        debug!(name, brand = ?brand, price, %day, "Price recorded");
        Ok(RecordOutcome::Recorded)
    }

    /// Compare the prices in effect at two dates
    ///
    /// Each boundary resolves to the latest entry on or before its date, so
    /// the returned dates may differ from the requested ones. A boundary with
    /// no earlier entry is `Error::NotFound`.
    pub fn price_difference(
        &self,
        name: &str,
        brand: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceDifference> {
        let brand = normalize_brand(brand);
        let start_entry = self.lookup(name, brand.as_deref(), start, Boundary::Start)?;
        let end_entry = self.lookup(name, brand.as_deref(), end, Boundary::End)?;

        Ok(PriceDifference {
            name: name.trim().to_string(),
            brand,
            start_date: start_entry.recorded_on,
            end_date: end_entry.recorded_on,
            start_price: start_entry.price,
            end_price: end_entry.price,
            difference: end_entry.price - start_entry.price,
        })
    }

    fn lookup(
        &self,
        name: &str,
        brand: Option<&str>,
        date: NaiveDate,
        boundary: Boundary,
    ) -> Result<PriceEntry> {
        self.store
            .latest_price_on_or_before(name, brand, date)?
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "No price recorded on or before {} date {}",
                    boundary.as_str(),
                    date
                ))
            })
    }
}
