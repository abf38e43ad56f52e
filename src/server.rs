//! HTTP transport for the classification pipeline.
//!
//! This module provides an HTTP server that:
//! - Accepts raw sensor windows via POST /predict
//! - Runs them through the shared [`Pipeline`](crate::core::Pipeline)
//! - Reports the canonical label, or the pipeline error as a JSON body
//!
//! # Architecture
//!
//! ```text
//! Device ──→ POST /predict ──→ normalize ──→ window ──→ features ──→ classifier
//!                                                                     ↓
//!                                            {"predicted_label": 0..4}
//! ```

use crate::core::pipeline::{ErrorKind, PipelineError};
use crate::model::{Artifacts, Label};
use crate::stats::{SharedPredictionStats, StatsSnapshot};
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub host: String,
    /// Port to bind to (0 for random)
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// Shared server state
pub struct ServerState {
    /// Immutable scaler and classifier
    artifacts: Arc<Artifacts>,
    /// Usage counters
    stats: SharedPredictionStats,
}

impl ServerState {
    pub fn new(artifacts: Arc<Artifacts>, stats: SharedPredictionStats) -> Self {
        Self { artifacts, stats }
    }

    /// Run the pipeline on one request and update the counters.
    fn classify(&self, data: &[Vec<f64>]) -> Result<Label, PipelineError> {
        self.stats.record_request();

        match self.artifacts.pipeline().evaluate(data) {
            Ok(evaluation) => {
                self.stats.record_prediction(evaluation.label);
                self.stats
                    .record_defaulted_features(evaluation.features.defaulted().len() as u64);
                Ok(evaluation.label)
            }
            Err(e) => {
                self.stats.record_failure(e.kind());
                Err(e)
            }
        }
    }
}

/// Raw time series: rows are time steps, columns the 9 channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub data: Vec<Vec<f64>>,
}

/// Response from predict endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_label: u8,
    pub label: Label,
    pub request_id: Uuid,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

fn status_for(error: &PipelineError) -> StatusCode {
    match error.kind() {
        ErrorKind::ClientInput => StatusCode::BAD_REQUEST,
        ErrorKind::Processing => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /stats
async fn stats(State(state): State<Arc<ServerState>>) -> Json<StatsSnapshot> {
    Json(state.stats.stats())
}

/// POST /predict
///
/// Classifies the trailing window of the submitted series.
async fn predict(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("predict", %request_id, rows = request.data.len());

    let result = span.in_scope(|| {
        state.classify(&request.data).inspect_err(|e| {
            if e.kind() == ErrorKind::Processing {
                tracing::error!(code = e.code(), "Prediction failed: {}", e);
            } else {
                tracing::warn!(code = e.code(), "Rejected request: {}", e);
            }
        })
    });

    let label = result.map_err(|e| {
        let status = status_for(&e);
        (
            status,
            Json(ErrorResponse {
                error: e.to_string(),
                code: e.code().to_string(),
            }),
        )
    })?;

    Ok(Json(PredictResponse {
        predicted_label: label.id(),
        label,
        request_id,
    }))
}

/// Build the router over shared state.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/predict", post(predict))
        .layer(
            CorsLayer::new()
                .allow_origin([
                    HeaderValue::from_static("http://localhost"),
                    HeaderValue::from_static("http://127.0.0.1"),
                ])
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the HTTP server
pub async fn run(
    config: ServerConfig,
    artifacts: Arc<Artifacts>,
    stats: SharedPredictionStats,
) -> anyhow::Result<(SocketAddr, tokio::sync::oneshot::Sender<()>)> {
    let state = Arc::new(ServerState::new(artifacts, stats));
    let app = router(state);

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("Activity classifier listening on http://{}", actual_addr);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("Server shutdown signal received");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_addr, shutdown_tx))
}
