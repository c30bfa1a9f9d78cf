use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Settings;
use crate::core::{
    CatalogItem, MAX_DURATION_YEARS, PlanRequest, ProjectionResult, RiskTier, catalog,
    compute_projection, pick_plans, to_number,
};

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("X-API-Key required")]
    MissingApiKey,
    #[error("Invalid API Key")]
    InvalidApiKey,
    #[error("{0}")]
    InvalidRisk(String),
    #[error("duration must be at most {} years", MAX_DURATION_YEARS)]
    DurationTooLong,
    #[error("{0}")]
    InvalidBody(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingApiKey => StatusCode::UNAUTHORIZED,
            ApiError::InvalidApiKey => StatusCode::FORBIDDEN,
            ApiError::InvalidRisk(_) | ApiError::DurationTooLong | ApiError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(self.status(), &self.to_string())
    }
}

/// JSON number, or text that is coerced leniently (`"80,000"` → 80000,
/// garbage → 0).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
}

impl LenientNumber {
    fn value(&self) -> f64 {
        match self {
            LenientNumber::Number(v) if v.is_finite() => *v,
            LenientNumber::Number(_) => 0.0,
            LenientNumber::Text(raw) => to_number(raw),
        }
    }
}

fn number_or_zero(value: &Option<LenientNumber>) -> f64 {
    value.as_ref().map_or(0.0, LenientNumber::value)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ComputePlanPayload {
    goal: Option<String>,
    target: Option<LenientNumber>,
    #[serde(alias = "durationYears")]
    duration: Option<LenientNumber>,
    #[serde(alias = "monthlyIncome")]
    income: Option<LenientNumber>,
    #[serde(alias = "monthlyExpenses")]
    expenses: Option<LenientNumber>,
    risk: Option<String>,
}

#[derive(Debug, Serialize)]
struct PlanResponse {
    #[serde(flatten)]
    result: ProjectionResult,
    plans: Vec<CatalogItem>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
    ts: i64,
}

#[derive(Debug, Serialize)]
struct CatalogResponse {
    items: &'static [CatalogItem],
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn plan_request_from_payload(payload: ComputePlanPayload) -> Result<PlanRequest, ApiError> {
    let risk = match payload.risk.as_deref() {
        None => RiskTier::default(),
        Some(raw) => raw.parse::<RiskTier>().map_err(ApiError::InvalidRisk)?,
    };
    let duration_years = number_or_zero(&payload.duration);
    if duration_years > MAX_DURATION_YEARS {
        return Err(ApiError::DurationTooLong);
    }

    Ok(PlanRequest {
        goal: payload.goal.unwrap_or_default(),
        target: number_or_zero(&payload.target),
        duration_years,
        monthly_income: number_or_zero(&payload.income),
        monthly_expenses: number_or_zero(&payload.expenses),
        risk,
    })
}

fn build_plan_response(request: &PlanRequest, computed_at: i64) -> PlanResponse {
    let result = compute_projection(request, computed_at);
    let plans = pick_plans(request.risk, result.monthly_savings);
    PlanResponse { result, plans }
}

/// Missing keys pass unless the deployment enforces them; a wrong key never
/// does.
fn authorize(settings: &Settings, headers: &HeaderMap) -> Result<(), ApiError> {
    match headers.get(API_KEY_HEADER) {
        None if settings.require_api_key => Err(ApiError::MissingApiKey),
        None => Ok(()),
        Some(value) if value.as_bytes() == settings.api_key.as_bytes() => Ok(()),
        Some(_) => Err(ApiError::InvalidApiKey),
    }
}

pub fn app_router(settings: Arc<Settings>) -> Router {
    let origins: Vec<HeaderValue> = settings
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/catalog", get(catalog_handler))
        .route("/api/compute-plan", post(compute_plan_handler))
        .fallback(not_found_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(settings)
}

pub async fn run_http_server(settings: Settings) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let port = settings.port;
    let env = settings.env.clone();
    let production = settings.is_production();
    let require_api_key = settings.require_api_key;
    let app = app_router(Arc::new(settings));

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, %env, "Finler API listening");
    if production && !require_api_key {
        warn!("REQUIRE_API_KEY is off in production; requests without a key are accepted");
    }
    info!("Local access: http://127.0.0.1:{port}/api/health");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(
        StatusCode::OK,
        HealthResponse {
            ok: true,
            ts: Utc::now().timestamp_millis(),
        },
    )
}

async fn catalog_handler() -> Response {
    json_response(StatusCode::OK, CatalogResponse { items: catalog() })
}

async fn compute_plan_handler(
    State(settings): State<Arc<Settings>>,
    headers: HeaderMap,
    payload: Result<Json<ComputePlanPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    // Authorize before looking at the body.
    if let Err(err) = authorize(&settings, &headers) {
        warn!(error = %err, "rejected compute-plan request");
        return Err(err);
    }

    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection, "unreadable compute-plan body");
        ApiError::InvalidBody(rejection.body_text())
    })?;
    let request = plan_request_from_payload(payload)?;
    let response = build_plan_response(&request, Utc::now().timestamp_millis());
    info!(
        goal = %request.goal,
        risk = %request.risk,
        plans = response.plans.len(),
        "computed plan"
    );
    Ok(json_response(StatusCode::OK, response))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn plan_request_from_json(json: &str) -> Result<PlanRequest, String> {
    let payload = serde_json::from_str::<ComputePlanPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    plan_request_from_payload(payload).map_err(|e| e.to_string())
}
