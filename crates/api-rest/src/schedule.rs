//! Calendar endpoints. The event list is supplied with every request; nothing is stored.

use crate::{ApiError, AppState};
use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use prontuario_core::Clock;
use prontuario_schedule::{toggle_completed, EventId, ScheduledEvent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DayReq {
    #[serde(default)]
    events: Vec<ScheduledEvent>,
    /// Defaults to today.
    day: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpcomingReq {
    #[serde(default)]
    events: Vec<ScheduledEvent>,
    today: Option<NaiveDate>,
    limit: Option<i64>,
    exclude_past: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MarksReq {
    #[serde(default)]
    events: Vec<ScheduledEvent>,
    year: i32,
    month: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct MarksRes {
    days: Vec<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToggleReq {
    #[serde(default)]
    events: Vec<ScheduledEvent>,
    id: EventId,
}

fn owned(events: Vec<&ScheduledEvent>) -> Vec<ScheduledEvent> {
    events.into_iter().cloned().collect()
}

pub(crate) async fn day(
    State(state): State<AppState>,
    Json(req): Json<DayReq>,
) -> Json<Vec<ScheduledEvent>> {
    let day = req
        .day
        .unwrap_or_else(|| state.schedule.today(state.clock.now()));
    Json(owned(state.schedule.select_for_day(&req.events, day)))
}

/// Upcoming events. Missing `limit` and `excludePast` fall back to the configured defaults; a
/// limit of zero or less yields an empty list.
pub(crate) async fn upcoming(
    State(state): State<AppState>,
    Json(req): Json<UpcomingReq>,
) -> Json<Vec<ScheduledEvent>> {
    let today = req
        .today
        .unwrap_or_else(|| state.schedule.today(state.clock.now()));
    let limit = match req.limit {
        Some(limit) => usize::try_from(limit).unwrap_or(0),
        None => state.cfg.upcoming_limit(),
    };
    let exclude_past = req.exclude_past.unwrap_or(state.cfg.exclude_past());

    Json(owned(state.schedule.select_upcoming(
        &req.events,
        today,
        limit,
        exclude_past,
    )))
}

pub(crate) async fn marks(
    State(state): State<AppState>,
    Json(req): Json<MarksReq>,
) -> Result<Json<MarksRes>, ApiError> {
    if !(1..=12).contains(&req.month) {
        return Err(ApiError::BadRequest(format!(
            "month must be between 1 and 12, got {}",
            req.month
        )));
    }
    let days = state
        .schedule
        .days_with_events(&req.events, req.year, req.month)
        .into_iter()
        .collect();
    Ok(Json(MarksRes { days }))
}

pub(crate) async fn toggle(Json(req): Json<ToggleReq>) -> Json<Vec<ScheduledEvent>> {
    Json(toggle_completed(&req.events, &req.id))
}
