//! Spend analytics over the price ledger and current inventory

use chrono::{Days, Local, Months, NaiveDate};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Location, SpendingPeriod, SpendingReport, SpendingSummary, YearlySpending};

/// Inclusive date range covered by a period ending on `today`
///
/// Returns `Ok(None)` for periods without a lower bound (`All`, `Annual`).
pub fn period_window(
    period: SpendingPeriod,
    today: NaiveDate,
) -> Result<Option<(NaiveDate, NaiveDate)>> {
    let start = match period {
        SpendingPeriod::Week => today.checked_sub_days(Days::new(7)),
        SpendingPeriod::Month => today.checked_sub_months(Months::new(1)),
        SpendingPeriod::Year => today.checked_sub_months(Months::new(12)),
        SpendingPeriod::Annual | SpendingPeriod::All => return Ok(None),
    };
    let start = start
        .ok_or_else(|| Error::InvalidData(format!("{} window out of range", period)))?;
    Ok(Some((start, today)))
}

/// Storage queries the aggregator needs
pub trait SpendingStore {
    /// Sum of ledger prices recorded within [from, to]
    fn ledger_total(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<f64>;

    /// Current items' spend per location, filtered on purchase date
    fn item_spending_by_location(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<(Location, f64)>>;

    /// Ledger totals per calendar year, most recent first
    fn ledger_totals_by_year(&self) -> Result<Vec<YearlySpending>>;
}

impl SpendingStore for Database {
    fn ledger_total(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<f64> {
        Database::ledger_total(self, from, to)
    }

    fn item_spending_by_location(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<(Location, f64)>> {
        Database::item_spending_by_location(self, from, to)
    }

    fn ledger_totals_by_year(&self) -> Result<Vec<YearlySpending>> {
        Database::ledger_totals_by_year(self)
    }
}

/// Read-only spending queries
pub struct SpendingAggregator<'a, S: SpendingStore + ?Sized = Database> {
    store: &'a S,
}

impl<'a, S: SpendingStore + ?Sized> SpendingAggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Aggregate relative to today's local date
    pub fn aggregate(&self, period: SpendingPeriod) -> Result<SpendingReport> {
        self.aggregate_at(period, Local::now().date_naive())
    }

    /// Aggregate relative to `today`
    ///
    /// `Annual` yields per-year ledger totals. Every other period yields the
    /// ledger total for the window plus a per-location breakdown of items
    /// currently held, filtered on purchase date.
    pub fn aggregate_at(&self, period: SpendingPeriod, today: NaiveDate) -> Result<SpendingReport> {
        if period == SpendingPeriod::Annual {
            return Ok(SpendingReport::Annual(self.store.ledger_totals_by_year()?));
        }

        let (from, to) = match period_window(period, today)? {
            Some((from, to)) => (Some(from), Some(to)),
            None => (None, None),
        };

        let mut summary = SpendingSummary {
            total_spent: self.store.ledger_total(from, to)?,
            ..Default::default()
        };

        for (location, spent) in self.store.item_spending_by_location(from, to)? {
            match location {
                Location::Pantry => summary.pantry_spent = spent,
                Location::Fridge => summary.fridge_spent = spent,
                Location::Freezer => summary.freezer_spent = spent,
            }
        }

        Ok(SpendingReport::Window(summary))
    }
}
