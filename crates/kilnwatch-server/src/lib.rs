//! HTTP dashboard API over a simulated plant.
//!
//! The plant is stepped by a tokio interval task for as long as the server
//! runs; handlers read it under the same lock. Responses carry `success` and an
//! optional `error`, mirroring the JSON shape the dashboard frontend expects.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use kilnwatch_core::{
    Alert, DashboardSnapshot, FocusArea, MetricView, OptimizationArea, OptimizationTicket,
    PerformanceSummary, PlantState, SeriesKind, SeriesRecord, derive_alerts, focus_areas,
    performance_summary, request_optimization,
};

/// Shared server state.
struct AppState {
    plant: Mutex<PlantState>,
    tick_period: Duration,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    tick: u64,
    metrics: usize,
    tick_ms: u64,
}

#[derive(Serialize)]
struct MetricResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    metric: Option<MetricView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct AlertsResponse {
    alerts: Vec<Alert>,
    total: usize,
}

#[derive(Serialize)]
struct FocusAreasResponse {
    tick: u64,
    focus_areas: Vec<FocusArea>,
}

#[derive(Deserialize)]
struct SeriesParams {
    /// Seed for reproducible output; fresh randomness when absent.
    seed: Option<u64>,
}

#[derive(Serialize)]
struct SeriesResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<SeriesKind>,
    records: Vec<SeriesRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct OptimizeResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    ticket: Option<OptimizationTicket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let plant = state.plant.lock().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        tick: plant.tick(),
        metrics: plant.metrics().len(),
        tick_ms: state.tick_period.as_millis() as u64,
    })
}

async fn handle_metrics(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    let plant = state.plant.lock().await;
    Json(DashboardSnapshot::capture(&plant))
}

async fn handle_metric(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> (StatusCode, Json<MetricResponse>) {
    let plant = state.plant.lock().await;
    match plant.metric(&name) {
        Some(m) => (
            StatusCode::OK,
            Json(MetricResponse {
                success: true,
                metric: Some(MetricView::from(m)),
                error: None,
            }),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(MetricResponse {
                success: false,
                metric: None,
                error: Some(format!(
                    "Unknown metric: {name}. Use /api/v1/metrics to list metrics."
                )),
            }),
        ),
    }
}

async fn handle_alerts(State(state): State<Arc<AppState>>) -> Json<AlertsResponse> {
    let plant = state.plant.lock().await;
    let alerts = derive_alerts(&plant);
    let total = alerts.len();
    Json(AlertsResponse { alerts, total })
}

async fn handle_focus_areas(State(state): State<Arc<AppState>>) -> Json<FocusAreasResponse> {
    let plant = state.plant.lock().await;
    Json(FocusAreasResponse {
        tick: plant.tick(),
        focus_areas: focus_areas(&plant),
    })
}

async fn handle_performance_summary(
    State(state): State<Arc<AppState>>,
) -> Json<PerformanceSummary> {
    let plant = state.plant.lock().await;
    Json(performance_summary(&plant))
}

async fn handle_series(
    Path(kind): Path<String>,
    Query(params): Query<SeriesParams>,
) -> (StatusCode, Json<SeriesResponse>) {
    let kind: SeriesKind = match kind.parse() {
        Ok(k) => k,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(SeriesResponse {
                    success: false,
                    kind: None,
                    records: Vec::new(),
                    error: Some(e.to_string()),
                }),
            );
        }
    };
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    (
        StatusCode::OK,
        Json(SeriesResponse {
            success: true,
            kind: Some(kind),
            records: kind.generate(&mut rng),
            error: None,
        }),
    )
}

async fn handle_optimize(Path(area): Path<String>) -> (StatusCode, Json<OptimizeResponse>) {
    match area.parse::<OptimizationArea>() {
        Ok(area) => (
            StatusCode::ACCEPTED,
            Json(OptimizeResponse {
                success: true,
                ticket: Some(request_optimization(area)),
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(OptimizeResponse {
                success: false,
                ticket: None,
                error: Some(e.to_string()),
            }),
        ),
    }
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let plant = state.plant.lock().await;
    let metric_names: Vec<&str> = plant.metrics().iter().map(|m| m.name()).collect();

    Json(serde_json::json!({
        "name": "Kilnwatch Server",
        "version": kilnwatch_core::VERSION,
        "metrics": metric_names,
        "tick_ms": state.tick_period.as_millis() as u64,
        "endpoints": {
            "/": "This API index",
            "/health": "Health check with current tick",
            "/api/v1/metrics": "Snapshot of every metric with progress and status",
            "/api/v1/metrics/{name}": "A single metric",
            "/api/v1/alerts": "Metrics at warning or critical, worst first",
            "/api/v1/focus-areas": "Areas with their metrics and recommendations, highest priority first",
            "/api/v1/performance-summary": "Overall score plus per-area score and trend",
            "/api/v1/series/{kind}": {
                "method": "GET",
                "kinds": SeriesKind::ALL.iter().map(|k| k.id()).collect::<Vec<_>>(),
                "params": { "seed": "Optional u64 for reproducible output" },
            },
            "/api/v1/optimize/{area}": {
                "method": "POST",
                "areas": OptimizationArea::ALL.iter().map(|a| a.id()).collect::<Vec<_>>(),
            },
        },
    }))
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/api/v1/metrics", get(handle_metrics))
        .route("/api/v1/metrics/{name}", get(handle_metric))
        .route("/api/v1/alerts", get(handle_alerts))
        .route("/api/v1/focus-areas", get(handle_focus_areas))
        .route("/api/v1/performance-summary", get(handle_performance_summary))
        .route("/api/v1/series/{kind}", get(handle_series))
        .route("/api/v1/optimize/{area}", post(handle_optimize))
        .with_state(state)
}

/// Step the plant once per period until aborted. The first step happens one
/// full period after start.
fn spawn_simulation(state: Arc<AppState>, mut rng: StdRng) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(state.tick_period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval.tick().await;
        loop {
            interval.tick().await;
            state.plant.lock().await.step(&mut rng);
        }
    })
}

/// Run the HTTP dashboard server until Ctrl-C.
pub async fn run_server(
    plant: PlantState,
    tick_period: Duration,
    seed: Option<u64>,
    host: &str,
    port: u16,
) -> std::io::Result<()> {
    let state = Arc::new(AppState {
        plant: Mutex::new(plant),
        tick_period,
    });
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let simulation = spawn_simulation(Arc::clone(&state), rng);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("listening on {addr}");

    let result = axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("shutdown requested");
        })
        .await;

    simulation.abort();
    result
}
