//! Mood Routes
//!
//! CRUD endpoints for the caller's mood entries plus the mood statistics
//! report.
//!
//! - GET /api/moods - List entries (filter by startDate, endDate, mood)
//! - POST /api/moods - Create an entry
//! - GET /api/moods/:id - Get an entry
//! - PUT /api/moods/:id - Update an entry
//! - DELETE /api/moods/:id - Delete an entry
//! - GET /api/moods/stats - Per-symbol statistics and overall summary
//! - GET /api/moods/date/:date - Entries on a single calendar day

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::api::dto::{
    CreateMoodRequest, Envelope, MoodListParams, StatsRangeParams, UpdateMoodRequest,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::CurrentUser;
use crate::api::state::AppState;
use crate::stats::{compute_mood_stats, MoodStatsReport};
use crate::store::types::{DateRange, Mood, MoodFilter, MoodSymbol, RecordId};

const DEFAULT_INTENSITY: u8 = 3;

/// GET /api/moods
pub async fn list_moods(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(params): Query<MoodListParams>,
) -> ApiResult<Json<Envelope<Vec<Mood>>>> {
    let filter = MoodFilter {
        range: DateRange::new(params.start_date, params.end_date),
        mood: params.mood.as_deref().map(parse_symbol).transpose()?,
    };
    let moods = state.store.list_moods(current.user.id, &filter)?;
    Ok(Json(Envelope::list(moods)))
}

/// POST /api/moods
///
/// The entry date defaults to the server clock's current time when absent.
pub async fn create_mood(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(req): Json<CreateMoodRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Mood>>)> {
    let symbol = parse_symbol(&req.mood)?;
    let intensity = req.intensity.unwrap_or(DEFAULT_INTENSITY);
    validate_intensity(intensity)?;
    validate_note(req.note.as_deref())?;

    let mood = state.store.insert_mood(Mood {
        id: 0, // assigned by the store
        user_id: current.user.id,
        mood: symbol,
        intensity,
        note: req.note,
        date: req.date.unwrap_or_else(|| state.clock.now()),
        activities: req.activities,
    })?;

    Ok((StatusCode::CREATED, Json(Envelope::new(mood))))
}

/// GET /api/moods/:id
pub async fn get_mood(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<Envelope<Mood>>> {
    let mood = state.store.get_mood(current.user.id, id)?;
    Ok(Json(Envelope::new(mood)))
}

/// PUT /api/moods/:id
///
/// Patch-style update: absent fields keep their stored value, an explicit
/// `null` note clears it.
pub async fn update_mood(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<RecordId>,
    Json(req): Json<UpdateMoodRequest>,
) -> ApiResult<Json<Envelope<Mood>>> {
    let mut mood = state.store.get_mood(current.user.id, id)?;

    if let Some(symbol) = req.mood.as_deref() {
        mood.mood = parse_symbol(symbol)?;
    }
    if let Some(intensity) = req.intensity {
        validate_intensity(intensity)?;
        mood.intensity = intensity;
    }
    if let Some(note) = req.note {
        validate_note(note.as_deref())?;
        mood.note = note;
    }
    if let Some(date) = req.date {
        mood.date = date;
    }
    if let Some(activities) = req.activities {
        mood.activities = activities;
    }

    state.store.update_mood(&mood)?;
    Ok(Json(Envelope::new(mood)))
}

/// DELETE /api/moods/:id
pub async fn delete_mood(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    state.store.delete_mood(current.user.id, id)?;
    Ok(Json(Envelope::new(serde_json::json!({}))))
}

/// GET /api/moods/stats
///
/// Per-symbol grouping with activity rankings and date ranges, plus the
/// overall distribution and weighted average mood. The optional
/// startDate/endDate window is inclusive of the whole end calendar day.
pub async fn mood_stats(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(params): Query<StatsRangeParams>,
) -> ApiResult<Json<Envelope<MoodStatsReport>>> {
    let moods = state
        .store
        .list_moods(current.user.id, &MoodFilter::default())?;

    let range = DateRange::new(params.start_date, params.end_date);
    let report = compute_mood_stats(&moods, (!range.is_empty()).then_some(&range));

    Ok(Json(Envelope::new(report)))
}

/// GET /api/moods/date/:date
///
/// Entries on a single calendar day, newest first.
pub async fn moods_by_date(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(date): Path<NaiveDate>,
) -> ApiResult<Json<Envelope<Vec<Mood>>>> {
    let moods = state.store.moods_on_date(current.user.id, date)?;
    Ok(Json(Envelope::list(moods)))
}

fn parse_symbol(raw: &str) -> ApiResult<MoodSymbol> {
    raw.parse()
        .map_err(|_| ApiError::Validation(format!("Please select a valid mood, got '{}'", raw)))
}

fn validate_intensity(intensity: u8) -> ApiResult<()> {
    if !(1..=5).contains(&intensity) {
        return Err(ApiError::Validation(
            "Intensity must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

fn validate_note(note: Option<&str>) -> ApiResult<()> {
    if let Some(note) = note {
        if note.len() > 500 {
            return Err(ApiError::Validation(
                "Note cannot be more than 500 characters".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_parsing_accepts_the_closed_set_only() {
        assert_eq!(parse_symbol("😊").unwrap(), MoodSymbol::Happy);
        assert_eq!(parse_symbol("😡").unwrap(), MoodSymbol::Angry);
        assert!(parse_symbol("grinning").is_err());
    }

    #[test]
    fn intensity_bounds() {
        assert!(validate_intensity(1).is_ok());
        assert!(validate_intensity(5).is_ok());
        assert!(validate_intensity(0).is_err());
        assert!(validate_intensity(6).is_err());
    }

    #[test]
    fn note_length_bound() {
        assert!(validate_note(Some(&"x".repeat(500))).is_ok());
        assert!(validate_note(Some(&"x".repeat(501))).is_err());
    }
}
