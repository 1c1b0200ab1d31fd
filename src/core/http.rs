//! HTTP endpoint server using Axum

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::backtest::{self, BacktestResult};
use crate::config::{get_market_data_url, BacktestConfig};
use crate::error::{BacktestError, ConfigError, MarketDataError};
use crate::export::{brick_rows, CsvKind};
use crate::metrics::Metrics;
use crate::services::{DeltaRestClient, MarketDataProvider};

pub const SERVICE_NAME: &str = "brickcloud-backtest";

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub provider: Arc<dyn MarketDataProvider>,
    /// Read-only defaults every request body is overlaid on.
    pub defaults: Arc<BacktestConfig>,
}

impl AppState {
    pub fn new(
        metrics: Arc<Metrics>,
        provider: Arc<dyn MarketDataProvider>,
        defaults: BacktestConfig,
    ) -> Self {
        Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            provider,
            defaults: Arc::new(defaults),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

impl BacktestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BacktestError::Config(_) => StatusCode::BAD_REQUEST,
            BacktestError::MarketData(MarketDataError::Config(_))
            | BacktestError::MarketData(MarketDataError::NoCandles { .. }) => {
                StatusCode::BAD_REQUEST
            }
            BacktestError::MarketData(_) => StatusCode::BAD_GATEWAY,
            BacktestError::Export(_) | BacktestError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for BacktestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, status = %status, "backtest request failed");
        } else {
            warn!(error = %self, status = %status, "backtest request rejected");
        }
        (
            status,
            Json(json!({
                "success": false,
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": SERVICE_NAME
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

pub async fn get_config(State(state): State<AppState>) -> Json<BacktestConfig> {
    Json(state.defaults.as_ref().clone())
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// An empty body means "use the defaults".
fn parse_body(body: &Bytes) -> Result<Value, ConfigError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ConfigError::Malformed(e.to_string()))
}

/// Fetch bars for `config` and run the pipeline off the async runtime.
async fn execute(state: &AppState, config: &BacktestConfig) -> Result<BacktestResult, BacktestError> {
    config.validate()?;
    let (start, end) = config.time_range()?;

    info!(
        symbol = %config.symbol,
        resolution = %config.resolution,
        start,
        end,
        brick_size = config.brick_size,
        reversal_size = config.reversal_size,
        "backtest requested"
    );

    let bars = state
        .provider
        .get_candles(&config.symbol, &config.resolution, start, end)
        .await?;

    let run_config = config.clone();
    tokio::task::spawn_blocking(move || backtest::run(&bars, &run_config))
        .await
        .map_err(|e| BacktestError::Internal(e.to_string()))
}

/// Execute and record the outcome in the backtest metrics.
async fn execute_timed(
    state: &AppState,
    config: &BacktestConfig,
) -> Result<(BacktestResult, u64), BacktestError> {
    let started = Instant::now();
    let outcome = execute(state, config).await;
    let elapsed = started.elapsed();
    state
        .metrics
        .backtest_duration_seconds
        .observe(elapsed.as_secs_f64());

    match outcome {
        Ok(result) => {
            state.metrics.backtests_total.inc();
            info!(
                symbol = %config.symbol,
                bricks = result.summary.renko_bricks,
                trades = result.summary.trades,
                net_profit = result.summary.net_profit,
                elapsed_ms = elapsed.as_millis(),
                "backtest completed"
            );
            Ok((result, elapsed.as_millis() as u64))
        }
        Err(e) => {
            state.metrics.backtest_failures_total.inc();
            Err(e)
        }
    }
}

fn csv_files(
    kinds: &[CsvKind],
    result: &BacktestResult,
    config: &BacktestConfig,
) -> Result<Map<String, Value>, BacktestError> {
    let mut files = Map::new();
    for &kind in kinds {
        files.insert(
            kind.response_key(),
            json!({
                "filename": kind.filename(config),
                "content": kind.render(result)?,
            }),
        );
    }
    Ok(files)
}

/// Run a backtest with the request body overlaid on the defaults.
pub async fn run_backtest(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, BacktestError> {
    let config = state.defaults.overlay(&parse_body(&body)?)?;
    let (result, processing_time_ms) = execute_timed(&state, &config).await?;

    let mut summary = serde_json::to_value(&result.summary)
        .map_err(|e| BacktestError::Internal(e.to_string()))?;
    if let Value::Object(fields) = &mut summary {
        fields.insert("processing_time_ms".to_string(), json!(processing_time_ms));
    }

    let files = csv_files(&CsvKind::ALL, &result, &config)?;

    Ok(Json(json!({
        "success": true,
        "summary": summary,
        "config_used": config,
        "trades": result.trades,
        "logs": result.logs,
        "renko_data": brick_rows(&result.bricks, &result.lines),
        "csv_files": files,
    })))
}

/// Run a backtest and return only the requested CSV file(s).
pub async fn download_csv(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, BacktestError> {
    let body = parse_body(&body)?;
    let file_type = body
        .get("file_type")
        .and_then(Value::as_str)
        .unwrap_or("all")
        .to_string();
    let kinds: Vec<CsvKind> = if file_type.eq_ignore_ascii_case("all") {
        CsvKind::ALL.to_vec()
    } else {
        vec![file_type.parse().map_err(ConfigError::Malformed)?]
    };

    let config = state.defaults.overlay(&body)?;
    let (result, _) = execute_timed(&state, &config).await?;

    let mut response = Map::new();
    response.insert("success".to_string(), json!(true));
    response.insert("symbol".to_string(), json!(config.symbol));
    response.insert("start_date".to_string(), json!(config.start_date));
    response.insert("end_date".to_string(), json!(config.end_date));
    response.extend(csv_files(&kinds, &result, &config)?);

    Ok(Json(Value::Object(response)))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/config", get(get_config))
        .route("/backtest", post(run_backtest))
        .route("/backtest/download-csv", post(download_csv))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let market_data_url = get_market_data_url();
    let provider: Arc<dyn MarketDataProvider> = Arc::new(DeltaRestClient::new(&market_data_url)?);
    info!(url = %market_data_url, "market data client ready");

    let state = AppState::new(metrics, provider, BacktestConfig::default());
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
