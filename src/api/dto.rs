//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON using the camelCase
//! field names the original Clario clients expect.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::store::types::{Priority, Role, UserId};

/// Deserialize a patch field that distinguishes "absent" from "null"
///
/// `None` means the field was not sent (keep the stored value);
/// `Some(None)` means an explicit `null` (clear the field).
fn clearable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================
// RESPONSE ENVELOPE
// ============================================

/// Success envelope wrapping every response body: `{success, count?, data}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    /// Number of records, present on list responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wrap a single record or summary
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data,
        }
    }
}

impl<T> Envelope<Vec<T>> {
    /// Wrap a list, recording its length as `count`
    pub fn list(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            data,
        }
    }
}

// ============================================
// USER / AUTH DTOs
// ============================================

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response to register and login: the account plus a fresh bearer token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Admin request to create an account directly
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to the regular user role
    #[serde(default)]
    pub role: Option<Role>,
}

/// Update user request; absent fields keep their current value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub password: Option<String>,
}

// ============================================
// TASK DTOs
// ============================================

/// Create task request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Option<String>,
}

/// Update task request; absent fields keep their current value, an explicit
/// `null` on an optional field clears it
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "clearable")]
    pub category: Option<Option<String>>,
}

/// Query parameters for listing tasks
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListParams {
    #[serde(default)]
    pub completed: Option<bool>,
    /// Match tasks due on this calendar day
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<String>,
}

// ============================================
// EVENT DTOs
// ============================================

/// Create event request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Update event request; absent fields keep their current value, an explicit
/// `null` on an optional field clears it
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub all_day: Option<bool>,
    #[serde(default, deserialize_with = "clearable")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable")]
    pub category: Option<Option<String>>,
}

/// Query parameters for listing events
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListParams {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Query parameters for the event range endpoint
///
/// Both bounds are required; the handler rejects absent ones with a
/// validation error rather than leaning on the deserializer's message.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRangeParams {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

// ============================================
// MOOD DTOs
// ============================================

/// Create mood entry request
///
/// `date` defaults to the server clock's "now"; `intensity` defaults to 3.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMoodRequest {
    /// Mood symbol, one of the closed emoji set
    pub mood: String,
    #[serde(default)]
    pub intensity: Option<u8>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub activities: Vec<String>,
}

/// Update mood entry request; absent fields keep their current value, an
/// explicit `null` note clears it
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMoodRequest {
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub intensity: Option<u8>,
    #[serde(default, deserialize_with = "clearable")]
    pub note: Option<Option<String>>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub activities: Option<Vec<String>>,
}

/// Query parameters for listing mood entries
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodListParams {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Filter to a single mood symbol
    #[serde(default)]
    pub mood: Option<String>,
}

/// Query parameters for the mood statistics endpoint
///
/// `end_date` is inclusive of the whole calendar day.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRangeParams {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy
    pub status: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
