//! Event Routes
//!
//! CRUD endpoints for the caller's calendar events.
//!
//! - GET /api/events - List events (filter by start, end, category)
//! - POST /api/events - Create an event
//! - GET /api/events/range - Events overlapping a window
//! - GET /api/events/:id - Get an event
//! - PUT /api/events/:id - Update an event
//! - DELETE /api/events/:id - Delete an event

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::api::dto::{
    CreateEventRequest, Envelope, EventListParams, EventRangeParams, UpdateEventRequest,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::CurrentUser;
use crate::api::state::AppState;
use crate::store::types::{Event, EventFilter, RecordId};

/// GET /api/events
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(params): Query<EventListParams>,
) -> ApiResult<Json<Envelope<Vec<Event>>>> {
    let filter = EventFilter {
        start: params.start,
        end: params.end,
        category: params.category,
    };
    let events = state.store.list_events(current.user.id, &filter)?;
    Ok(Json(Envelope::list(events)))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Event>>)> {
    validate_title(&req.title)?;
    validate_window(req.start, req.end)?;

    let event = state.store.insert_event(Event {
        id: 0, // assigned by the store
        user_id: current.user.id,
        title: req.title.trim().to_string(),
        description: req.description,
        start: req.start,
        end: req.end,
        all_day: req.all_day,
        location: req.location,
        category: req.category,
        created_at: state.clock.now(),
    })?;

    Ok((StatusCode::CREATED, Json(Envelope::new(event))))
}

/// GET /api/events/:id
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<Envelope<Event>>> {
    let event = state.store.get_event(current.user.id, id)?;
    Ok(Json(Envelope::new(event)))
}

/// PUT /api/events/:id
///
/// Patch-style update: absent fields keep their stored value, an explicit
/// `null` clears an optional field. The end-after-start invariant is
/// re-checked against the effective window.
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<RecordId>,
    Json(req): Json<UpdateEventRequest>,
) -> ApiResult<Json<Envelope<Event>>> {
    let mut event = state.store.get_event(current.user.id, id)?;

    if let Some(title) = req.title {
        validate_title(&title)?;
        event.title = title.trim().to_string();
    }
    if let Some(description) = req.description {
        event.description = description;
    }
    if let Some(start) = req.start {
        event.start = start;
    }
    if let Some(end) = req.end {
        event.end = end;
    }
    if let Some(all_day) = req.all_day {
        event.all_day = all_day;
    }
    if let Some(location) = req.location {
        event.location = location;
    }
    if let Some(category) = req.category {
        event.category = category;
    }

    validate_window(event.start, event.end)?;

    state.store.update_event(&event)?;
    Ok(Json(Envelope::new(event)))
}

/// GET /api/events/range?start=..&end=..
///
/// Events overlapping the window: starting within it, ending within it, or
/// spanning it entirely. Both bounds are required.
pub async fn events_in_range(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(params): Query<EventRangeParams>,
) -> ApiResult<Json<Envelope<Vec<Event>>>> {
    let (start, end) = match (params.start, params.end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(ApiError::Validation(
                "Please provide start and end dates".to_string(),
            ))
        }
    };
    validate_window(start, end)?;

    let events = state.store.events_overlapping(current.user.id, start, end)?;
    Ok(Json(Envelope::list(events)))
}

/// DELETE /api/events/:id
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    state.store.delete_event(current.user.id, id)?;
    Ok(Json(Envelope::new(serde_json::json!({}))))
}

fn validate_title(title: &str) -> ApiResult<()> {
    if title.trim().is_empty() {
        return Err(ApiError::Validation(
            "Please provide a title for the event".to_string(),
        ));
    }
    if title.len() > 100 {
        return Err(ApiError::Validation(
            "Title cannot be more than 100 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> ApiResult<()> {
    if end < start {
        return Err(ApiError::Validation(
            "End date must not be before start date".to_string(),
        ));
    }
    Ok(())
}
