use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use showwatch_pipeline::RunOutcome;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct StatusData {
    status: &'static str,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    last_outcome: Option<RunOutcome>,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/trigger-scrape", post(trigger_scrape))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn root(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: StatusData {
            status: "running",
            message: "show watcher service is active",
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "healthy",
            last_outcome: state.last_outcome().await,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

/// Starts a run in the background and answers immediately.
async fn trigger_scrape(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    tracing::info!(request_id = %req_id.0, "manual scrape triggered");
    tokio::spawn(async move {
        state.run_once("http").await;
    });

    (
        StatusCode::ACCEPTED,
        Json(ApiResponse {
            data: StatusData {
                status: "accepted",
                message: "scrape job triggered",
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
