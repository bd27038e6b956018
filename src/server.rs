//! HTTP front end: `GET /kusa/{username}` answers with today's
//! contribution count for that user.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::kusa::ContributionSource;
use crate::stats;

/// Supplies the reference date for each request.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ContributionSource>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(source: Arc<dyn ContributionSource>) -> Self {
        Self {
            source,
            clock: Arc::new(|| Local::now().date_naive()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct KusaResponse {
    pub contribution_count: u32,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub struct ServerError(FetchError);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            FetchError::InvalidUsername(_) => StatusCode::BAD_REQUEST,
            _ => {
                tracing::error!("scrape failed: {}", self.0);
                StatusCode::BAD_GATEWAY
            }
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/kusa/{username}", get(kusa_handler).head(method_not_allowed))
        .with_state(state)
}

async fn kusa_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<KusaResponse>, ServerError> {
    let days = state
        .source
        .contributions(&username)
        .await
        .map_err(ServerError)?;
    let stats = stats::compute(&days, (state.clock)());

    tracing::debug!(user = username.as_str(), count = stats.latest_count, "served count");
    Ok(Json(KusaResponse {
        contribution_count: stats.latest_count,
    }))
}

// `get` would otherwise answer HEAD as well.
async fn method_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

/// Accepts `:8080` as shorthand for all interfaces.
pub fn bind_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    }
}
