//! Domain models for Larder

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where an item is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Pantry,
    Fridge,
    Freezer,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pantry => "Pantry",
            Self::Fridge => "Fridge",
            Self::Freezer => "Freezer",
        }
    }
}

impl std::str::FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pantry" => Ok(Self::Pantry),
            "fridge" | "refrigerator" => Ok(Self::Fridge),
            "freezer" => Ok(Self::Freezer),
            _ => Err(format!("Unknown location: {}", s)),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An inventory item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub location: Location,
    pub purchase_date: NaiveDate,
    pub best_by_date: NaiveDate,
    pub price: f64,
    /// Relative public path, e.g. `/uploads/1700000000000-123456789.jpg`
    pub image_path: Option<String>,
    pub spoiled: bool,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Whole days from `today` until the best-by date (negative once expired)
    pub fn days_until_best_by(&self, today: NaiveDate) -> i64 {
        (self.best_by_date - today).num_days()
    }
}

/// Fields supplied when creating or updating an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub brand: Option<String>,
    pub location: Location,
    pub purchase_date: NaiveDate,
    pub best_by_date: NaiveDate,
    #[serde(default)]
    pub price: f64,
    pub image_path: Option<String>,
    #[serde(default)]
    pub spoiled: bool,
}

/// An expiration reminder generated by a sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub item_id: Option<i64>,
    /// Item name captured when the reminder was created
    pub item_name: String,
    pub message: String,
    pub closed: bool,
    pub created_at: DateTime<Utc>,
}

/// Reminders split by state, as served to the UI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderList {
    /// Open reminders, oldest first
    pub active: Vec<Reminder>,
    /// Closed reminders, newest first
    pub closed: Vec<Reminder>,
}

/// One row of the price ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceEntry {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub price: f64,
    pub recorded_on: NaiveDate,
}

/// A distinct (name, brand) pair present in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedProduct {
    pub name: String,
    pub brand: Option<String>,
}

/// Time window for spending aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendingPeriod {
    Week,
    Month,
    Year,
    /// Year-by-year totals instead of a single window
    Annual,
    #[default]
    All,
}

impl SpendingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::Annual => "annual",
            Self::All => "all",
        }
    }

    /// Parse a period, falling back to `All` for anything unrecognized
    pub fn parse_or_all(s: Option<&str>) -> Self {
        s.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl std::str::FromStr for SpendingPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "annual" => Ok(Self::Annual),
            "all" => Ok(Self::All),
            _ => Err(format!("Unknown spending period: {}", s)),
        }
    }
}

impl std::fmt::Display for SpendingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Windowed spending totals
///
/// `total_spent` comes from the price ledger; the per-location figures come
/// from items currently in inventory, so the two can disagree once items are
/// deleted or edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummary {
    pub total_spent: f64,
    pub pantry_spent: f64,
    pub fridge_spent: f64,
    pub freezer_spent: f64,
}

/// Ledger total for one calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySpending {
    pub year: i32,
    pub total_spent: f64,
}

/// Result of a spending query; the shape depends on the period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpendingReport {
    Window(SpendingSummary),
    Annual(Vec<YearlySpending>),
}

/// Price change for a product between two dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDifference {
    pub name: String,
    pub brand: Option<String>,
    /// Ledger day actually used for the start boundary
    pub start_date: NaiveDate,
    /// Ledger day actually used for the end boundary
    pub end_date: NaiveDate,
    pub start_price: f64,
    pub end_price: f64,
    /// `end_price - start_price`; positive means the price went up
    pub difference: f64,
}
