// Market Cap Comparison - REST API (axum)
// Router lives in the library so it can be exercised without binding a port.

use crate::format::today;
use crate::market::Sources;
use crate::session::ComparisonState;
use crate::table::ReferenceEntry;
use crate::view::{render_html, ComparisonView};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub comparison: Arc<Mutex<ComparisonState>>,
    pub sources: Option<Arc<Sources>>,
    pub subject: String,
    pub subject_url: String,
}

impl AppState {
    pub fn new(state: ComparisonState, sources: Option<Sources>, subject: &str, subject_url: &str) -> Self {
        AppState {
            comparison: Arc::new(Mutex::new(state)),
            sources: sources.map(Arc::new),
            subject: subject.to_string(),
            subject_url: subject_url.to_string(),
        }
    }

    fn current_view(&self) -> Option<ComparisonView> {
        let state = self.comparison.lock().unwrap_or_else(|e| e.into_inner());
        state.view(today(), &self.subject, &self.subject_url)
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

fn view_response(view: Option<ComparisonView>) -> Response {
    match view {
        Some(view) => (StatusCode::OK, Json(ApiResponse::ok(view))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<ComparisonView>::fail("no comparison available")),
        )
            .into_response(),
    }
}

/// GET /api/comparison - Current comparison view
async fn get_comparison(State(state): State<AppState>) -> Response {
    view_response(state.current_view())
}

/// GET /api/table - All reference entries, ascending
async fn get_table(State(state): State<AppState>) -> impl IntoResponse {
    let comparison = state.comparison.lock().unwrap_or_else(|e| e.into_inner());
    let entries: Vec<ReferenceEntry> = comparison
        .table()
        .map(|t| t.entries().to_vec())
        .unwrap_or_default();

    Json(ApiResponse::ok(entries))
}

/// POST /api/refresh - Re-fetch both inputs and recompute
async fn refresh(State(state): State<AppState>) -> Response {
    let Some(sources) = state.sources.clone() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::<ComparisonView>::fail("no sources configured")),
        )
            .into_response();
    };

    // Fetch outside the lock, then swap the new inputs in
    let mut next = state
        .comparison
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone();

    if let Err(e) = sources.refresh_into(&mut next).await {
        log::error!("Refresh failed: {:#}", e);
        return (
            StatusCode::BAD_GATEWAY,
            Json(ApiResponse::<ComparisonView>::fail(format!("{:#}", e))),
        )
            .into_response();
    }

    *state.comparison.lock().unwrap_or_else(|e| e.into_inner()) = next;
    view_response(state.current_view())
}

/// GET / - Rendered comparison page
async fn serve_index(State(state): State<AppState>) -> impl IntoResponse {
    Html(render_html(state.current_view().as_ref()))
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/comparison", get(get_comparison))
        .route("/table", get(get_table))
        .route("/refresh", post(refresh))
        .with_state(state.clone());

    Router::new()
        .route("/", get(serve_index))
        .with_state(state)
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}
