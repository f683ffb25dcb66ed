//! # API REST
//!
//! REST API for the prontuário core.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Holding open records in memory and serializing appends per record
//! - REST-specific concerns (JSON serialization, CORS, error bodies)
//!
//! Business rules live in `prontuario-core` and `prontuario-schedule`; handlers only decode
//! requests, call into them and map the outcome to a status code.

#![warn(rust_2018_idioms)]

mod error;
mod records;
mod schedule;

pub use error::{ApiError, ErrorBody, ErrorDetail};

use axum::routing::{get, post};
use axum::{Json, Router};
use prontuario_core::{Clock, CoreConfig, Record, RecordStore};
use prontuario_schedule::ScheduleFilter;
use prontuario_uuid::EntryId;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;

/// Open records, each behind its own lock so appends to one record run one at a time.
type RecordMap = HashMap<EntryId, Arc<Mutex<Record>>>;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    clock: Arc<dyn Clock>,
    store: RecordStore,
    schedule: ScheduleFilter,
    records: Arc<RwLock<RecordMap>>,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: RecordStore::new(clock.clone()),
            schedule: ScheduleFilter::new(cfg.utc_offset()),
            cfg,
            clock,
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub(crate) async fn record_handle(&self, id: EntryId) -> Result<Arc<Mutex<Record>>, ApiError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("record {id}")))
    }
}

#[derive(Debug, Serialize)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Build the REST router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/records", post(records::create))
        .route("/records/:id", get(records::get))
        .route("/records/:id/:kind", post(records::append))
        .route("/validate/:kind", post(records::validate))
        .route("/metrics/bmi", get(records::bmi))
        .route("/schedule/day", post(schedule::day))
        .route("/schedule/upcoming", post(schedule::upcoming))
        .route("/schedule/marks", post(schedule::marks))
        .route("/schedule/toggle", post(schedule::toggle))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Prontuário is alive".into(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, Response};
    use chrono::{TimeZone, Utc};
    use http_body_util::BodyExt;
    use prontuario_core::FixedClock;

    pub fn app() -> Router {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
        ));
        router(AppState::new(Arc::new(CoreConfig::default()), clock))
    }

    pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_is_ok() {
        let response = app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = app().oneshot(get_request("/patients")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
