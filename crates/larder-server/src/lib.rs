//! Larder Web Server
//!
//! Axum-based REST API for the Larder household inventory tracker.
//!
//! - Item CRUD with multipart image uploads
//! - Expiration reminders (sweep after every item write and on a timer)
//! - Spending stats and price tracking over the price ledger
//! - Restrictive CORS policy and security headers
//! - Sanitized error responses

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use larder_core::{Database, ReminderEngine};

mod handlers;
mod hooks;
mod scheduler;
mod uploads;

pub use scheduler::{start_reminder_scheduler, ReminderScheduleConfig};
pub use uploads::{UploadStore, UPLOADS_URL_PREFIX};

/// Maximum image upload size (5 MB)
pub const MAX_UPLOAD_SIZE: usize = 5 * 1024 * 1024;

/// Request body limit: one image plus the text fields of the item form
const MAX_REQUEST_SIZE: usize = MAX_UPLOAD_SIZE + 256 * 1024;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Directory where uploaded item images are written
    pub uploads_dir: PathBuf,
    /// Timer-driven reminder sweeps (None disables the timer)
    pub sweep_schedule: Option<ReminderScheduleConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            uploads_dir: PathBuf::from("uploads"),
            sweep_schedule: ReminderScheduleConfig::from_minutes(60),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Storage for uploaded item images
    pub uploads: UploadStore,
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        uploads: UploadStore::new(&config.uploads_dir),
        config: config.clone(),
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::get_health))
        // Items
        .route(
            "/items",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route(
            "/items/:id",
            put(handlers::update_item).delete(handlers::delete_item),
        )
        // Reminders
        .route("/reminders", get(handlers::list_reminders))
        .route("/reminders/close/:id", put(handlers::close_reminder))
        .route(
            "/reminders/active/:id",
            delete(handlers::delete_active_reminder),
        )
        .route(
            "/reminders/closed/clear",
            delete(handlers::clear_closed_reminders),
        )
        // Stats
        .route("/stats/spending", get(handlers::get_spending))
        // Price tracker
        .route(
            "/price-tracker/unique-items",
            get(handlers::list_tracked_products),
        )
        .route(
            "/price-tracker/difference",
            get(handlers::get_price_difference),
        );

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    };

    // Security headers
    // CSP: restrict scripts to same-origin, allow inline styles, allow blob: for image previews
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' blob: data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(&config.uploads_dir))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with custom configuration
///
/// Runs one reminder sweep before accepting requests, then starts the
/// timer-driven sweeps.
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    match ReminderEngine::new(&db).sweep() {
        Ok(report) => info!(
            created = report.created,
            purged = report.purged,
            "Startup reminder sweep complete"
        ),
        Err(e) => warn!("Startup reminder sweep failed: {}", e),
    }

    match config.sweep_schedule.clone() {
        Some(schedule) => {
            start_reminder_scheduler(db.clone(), schedule);
        }
        None => warn!("Timed reminder sweeps disabled; reminders refresh only on item writes"),
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error, keeping not-found and validation failures visible
    pub fn from_core(err: larder_core::Error) -> Self {
        match err {
            larder_core::Error::NotFound(msg) => Self::not_found(&msg),
            larder_core::Error::InvalidData(msg) => Self::bad_request(&msg),
            other => other.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
