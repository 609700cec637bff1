//! HTTP server for the dashboard and its JSON views.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::analyzers::threshold::Threshold;
use crate::analyzers::types::{ClassificationSummary, TransportAvailability};
use crate::dashboard::{RAW_PREVIEW_ROWS, render_dashboard, render_error_page};
use crate::dataset::Dataset;
use crate::error::DataUnavailable;
use crate::session::{DashboardViews, DatasetCache};

/// Shared server state. The cache lives as long as the server does.
#[derive(Clone)]
pub struct AppState {
    cache: Arc<DatasetCache>,
}

impl AppState {
    pub fn new(cache: DatasetCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    raw: bool,
    min_pct: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct ThresholdQuery {
    min_pct: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct RawQuery {
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TransportResponse {
    threshold_percent: u8,
    unfiltered: TransportAvailability,
    filtered: TransportAvailability,
    classification: ClassificationSummary,
}

fn threshold_from(min_pct: Option<u8>) -> Threshold {
    min_pct.map(Threshold::from_percent).unwrap_or_default()
}

fn unavailable_json(err: &DataUnavailable) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({
            "error": "data_unavailable",
            "message": err.to_string(),
        })),
    )
        .into_response()
}

fn html_page(status: StatusCode, page: askama::Result<String>) -> Response {
    match page {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(error = %e, "Template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering failed").into_response()
        }
    }
}

async fn load(state: &AppState) -> Result<Arc<Dataset>, DataUnavailable> {
    state.cache.get().await.inspect_err(|e| {
        warn!(error = %e, "Serving without dataset");
    })
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "roads-dashboard",
        "version": env!("CARGO_PKG_VERSION"),
        "dataset_loaded": state.cache.is_loaded(),
    }))
}

#[tracing::instrument(skip_all, fields(raw = query.raw, min_pct = ?query.min_pct))]
async fn dashboard(State(state): State<AppState>, Query(query): Query<DashboardQuery>) -> Response {
    let dataset = match load(&state).await {
        Ok(dataset) => dataset,
        Err(e) => {
            return html_page(
                StatusCode::SERVICE_UNAVAILABLE,
                render_error_page(&e.to_string()),
            );
        }
    };

    let views = DashboardViews::compute(&dataset, threshold_from(query.min_pct));
    html_page(StatusCode::OK, render_dashboard(&dataset, &views, query.raw))
}

async fn governorates(State(state): State<AppState>) -> Response {
    match load(&state).await {
        Ok(dataset) => {
            let views = DashboardViews::compute(&dataset, Threshold::default());
            Json(views.governorates).into_response()
        }
        Err(e) => unavailable_json(&e),
    }
}

async fn transport(State(state): State<AppState>, Query(query): Query<ThresholdQuery>) -> Response {
    match load(&state).await {
        Ok(dataset) => {
            let views = DashboardViews::compute(&dataset, threshold_from(query.min_pct));
            Json(TransportResponse {
                threshold_percent: views.threshold.percent(),
                unfiltered: views.transport,
                filtered: views.filtered,
                classification: views.classification,
            })
            .into_response()
        }
        Err(e) => unavailable_json(&e),
    }
}

async fn raw_rows(State(state): State<AppState>, Query(query): Query<RawQuery>) -> Response {
    match load(&state).await {
        Ok(dataset) => Json(dataset.preview(query.limit.unwrap_or(RAW_PREVIEW_ROWS))).into_response(),
        Err(e) => unavailable_json(&e),
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health))
        .route("/api/governorates", get(governorates))
        .route("/api/transport", get(transport))
        .route("/api/raw", get(raw_rows))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `0.0.0.0:port` and serves until the process is stopped.
pub async fn start_server(state: AppState, port: u16) -> Result<()> {
    let app = create_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "Dashboard running on http://localhost:{port}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_dataset;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const CSV: &str = "refArea,State of the main roads - good,State of the main roads - acceptable,State of the main roads - bad,Existence of dedicated bus stops - exists,The main means of public transport - vans,The main means of public transport - taxis,The main means of public transport - buses\n\
http://x/Akkar_Governorate,0,0,1,0,0.6,0.25,0.4\n\
http://x/Beirut_Governorate,1,0,0,1,0,1,1\n";

    fn loaded_state() -> AppState {
        let dataset = parse_dataset(CSV.as_bytes(), "inline").unwrap();
        AppState::new(DatasetCache::with_dataset(dataset))
    }

    async fn get_body(state: AppState, uri: &str) -> (StatusCode, String) {
        let response = create_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_body(loaded_state(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["dataset_loaded"], true);
    }

    #[tokio::test]
    async fn test_dashboard_page() {
        let (status, body) = get_body(loaded_state(), "/?min_pct=50&raw=true").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Road Quality and Transportation in Lebanon"));
        assert!(body.contains(r#"value="50""#));
        assert!(body.contains(r#"class="raw""#));
    }

    #[tokio::test]
    async fn test_transport_api_filters() {
        let (status, body) = get_body(loaded_state(), "/api/transport?min_pct=30").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["threshold_percent"], 30);

        let bad = &json["filtered"]["rows"][0];
        assert_eq!(bad["condition"], "Bad");
        assert_eq!(bad["buses"], 0.4);
        assert_eq!(bad["vans"], 0.6);
        assert_eq!(bad["taxis"], 0.0);
        assert_eq!(json["unfiltered"]["rows"][0]["taxis"], 0.25);

        // No acceptable towns: undefined, serialized as null.
        assert!(json["filtered"]["rows"][1]["buses"].is_null());
    }

    #[tokio::test]
    async fn test_governorates_api() {
        let (status, body) = get_body(loaded_state(), "/api/governorates").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["area_label"], "Akkar Governorate");
        assert_eq!(rows[1]["good"], 1.0);
    }

    #[tokio::test]
    async fn test_raw_api_limit() {
        let (_, body) = get_body(loaded_state(), "/api/raw?limit=1").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["rows"].as_array().unwrap().len(), 1);
        assert_eq!(json["total_rows"], 2);
    }

    #[tokio::test]
    async fn test_unavailable_dataset() {
        let state = AppState::new(DatasetCache::new("/no/such/file.csv"));

        let (status, body) = get_body(state.clone(), "/").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("Dataset unavailable"));
        assert!(!body.contains("<svg"));

        let (status, body) = get_body(state, "/api/governorates").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("data_unavailable"));
    }
}
