//! Price tracker handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{AppError, AppState};
use larder_core::{
    models::{PriceDifference, TrackedProduct},
    PriceHistory,
};

/// Query parameters for a price difference
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferenceQuery {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/price-tracker/unique-items - Distinct (name, brand) pairs in the ledger
pub async fn list_tracked_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TrackedProduct>>, AppError> {
    let products = state.db.list_tracked_products()?;
    Ok(Json(products))
}

/// GET /api/price-tracker/difference - Price change between two dates
///
/// 404 when either date has no ledger entry on or before it.
pub async fn get_price_difference(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DifferenceQuery>,
) -> Result<Json<PriceDifference>, AppError> {
    let name = params
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing name parameter"))?;
    let start = parse_query_date("startDate", params.start_date.as_deref())?;
    let end = parse_query_date("endDate", params.end_date.as_deref())?;

    let difference = PriceHistory::new(&state.db)
        .price_difference(name, params.brand.as_deref(), start, end)
        .map_err(AppError::from_core)?;

    Ok(Json(difference))
}

fn parse_query_date(param: &str, value: Option<&str>) -> Result<NaiveDate, AppError> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::bad_request(&format!("Missing {} parameter", param)))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::bad_request(&format!("Invalid {}: {} (expected YYYY-MM-DD)", param, raw))
    })
}
