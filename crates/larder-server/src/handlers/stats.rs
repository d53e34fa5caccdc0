//! Spending stats and health handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use larder_core::{
    models::{SpendingPeriod, SpendingReport},
    SpendingAggregator,
};

/// Query parameters for spending stats
#[derive(Debug, Deserialize)]
pub struct SpendingQuery {
    pub period: Option<String>,
}

/// GET /api/stats/spending - Spending for a period
///
/// `period` is one of week, month, year, annual, all. Missing or unknown
/// values mean all.
pub async fn get_spending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SpendingQuery>,
) -> Result<Json<SpendingReport>, AppError> {
    let period = SpendingPeriod::parse_or_all(params.period.as_deref());
    let report = SpendingAggregator::new(&state.db).aggregate(period)?;
    Ok(Json(report))
}

/// Health response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/health - Liveness check that touches the database
pub async fn get_health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, AppError> {
    state.db.conn()?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
