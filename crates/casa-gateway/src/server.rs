//! HTTP server exposing health, prediction and metrics endpoints.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use casa_core::types::{PredictionResult, RawPayload};
use casa_model::predictor::PredictionService;
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::metrics::MetricsRegistry;

/// State shared by every worker
#[derive(Debug, Clone)]
pub struct AppState {
    /// Prediction service over the loaded artifacts
    pub service: Arc<PredictionService>,
    /// Metrics registry
    pub metrics: Arc<MetricsRegistry>,
}

impl AppState {
    /// Create a new server state
    #[must_use]
    pub fn new(service: Arc<PredictionService>, metrics: Arc<MetricsRegistry>) -> Self {
        Self { service, metrics }
    }
}

/// Body of `POST /predict`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Loosely typed feature dictionary
    pub features: RawPayload,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status string
    pub status: &'static str,
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}

async fn predict(
    state: web::Data<AppState>,
    request: web::Json<PredictRequest>,
) -> Result<HttpResponse, ApiError> {
    let PredictRequest { features } = request.into_inner();
    state.metrics.record_request();

    tracing::info!("Received prediction request with {} features", features.len());
    tracing::debug!(
        "Input features: {}",
        serde_json::to_string(&features).unwrap_or_default()
    );

    let service = Arc::clone(&state.service);
    let outcome = web::block(move || service.estimate(&features)).await;

    let estimate = match outcome {
        Ok(Ok(estimate)) => estimate,
        Ok(Err(e)) => {
            tracing::error!("Prediction error: {}", e);
            state.metrics.record_failure();
            return Err(ApiError::PredictionFailed);
        }
        Err(e) => {
            tracing::error!("Prediction task failed: {}", e);
            state.metrics.record_failure();
            return Err(ApiError::PredictionFailed);
        }
    };

    tracing::info!("Prediction result: {}", estimate.value);
    state.metrics.record_prediction(&estimate);

    Ok(HttpResponse::Ok().json(PredictionResult::new(estimate.value)))
}

async fn metrics(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let body = state.metrics.encode().map_err(|_| ApiError::Metrics)?;
    Ok(HttpResponse::Ok()
        .content_type("application/openmetrics-text; version=1.0.0; charset=utf-8")
        .body(body))
}

/// JSON extractor settings; parse failures become 422 responses
#[must_use]
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| ApiError::InvalidRequest(err.to_string()).into())
}

/// Register all routes
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/predict", web::post().to(predict))
        .route("/metrics", web::get().to(metrics));
}

/// Permissive CORS: any origin (echoed back), method and header, with credentials
#[must_use]
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

/// Bind and run the HTTP server until shutdown
pub async fn run(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let data = web::Data::new(state);
    let json_limit = config.json_limit;

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(middleware::Logger::default())
            .app_data(data.clone())
            .app_data(json_config(json_limit))
            .configure(routes)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    tracing::info!("HTTP server listening on {}:{}", config.host, config.port);
    server.bind((config.host.as_str(), config.port))?.run().await
}
