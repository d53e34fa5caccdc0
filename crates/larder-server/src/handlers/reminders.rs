//! Reminder handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{AppError, AppState, SuccessResponse};
use larder_core::models::ReminderList;

/// Response for clearing closed reminders
#[derive(Serialize)]
pub struct ClearResponse {
    pub deleted: usize,
}

/// GET /api/reminders - Active (oldest first) and closed (newest first)
pub async fn list_reminders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReminderList>, AppError> {
    let reminders = state.db.list_reminders()?;
    Ok(Json(reminders))
}

/// PUT /api/reminders/close/:id - Close a reminder
pub async fn close_reminder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.close_reminder(id)? {
        return Err(AppError::not_found("Reminder not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /api/reminders/active/:id - Delete an open reminder
///
/// Closed reminders are only removed by clear or the sweep's purge.
pub async fn delete_active_reminder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_open_reminder(id)? {
        return Err(AppError::not_found("Active reminder not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /api/reminders/closed/clear - Delete every closed reminder
pub async fn clear_closed_reminders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearResponse>, AppError> {
    let deleted = state.db.clear_closed_reminders()?;
    Ok(Json(ClearResponse { deleted }))
}
