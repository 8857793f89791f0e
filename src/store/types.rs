//! Core data types for the Clario record store
//!
//! This module defines the records the application persists and the filters
//! the store accepts:
//! - `User` and `Role`: account identity
//! - `Task`, `Event`, `Mood`: owner-scoped productivity records
//! - `TaskFilter`, `EventFilter`, `MoodFilter`, `DateRange`: query filters

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier for a user account
pub type UserId = i64;

/// Identifier for an owned record (task, event, mood entry)
pub type RecordId = i64;

/// Access role for an account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account, sees only its own records
    User,
    /// Elevated account, may list and delete other users
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// A registered account
///
/// The password hash and any issued tokens live in the store but are never
/// part of this struct, so a `User` can be serialized outward as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique across all accounts
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Task priority level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Numeric weight used by the statistics engine: high=3, medium=2, low=1
    pub fn weight(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// An owner-scoped task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub priority: Priority,
    #[serde(default)]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An owner-scoped calendar event
///
/// Invariant: `end >= start`, enforced at the validation layer before the
/// record reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: RecordId,
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Closed set of mood symbols
///
/// Each symbol carries a fixed score used for the weighted overall mood:
/// happy/loved = 5, neutral = 3, sad/tired = 2, angry = 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MoodSymbol {
    #[serde(rename = "😊")]
    Happy,
    #[serde(rename = "😍")]
    Loved,
    #[serde(rename = "😐")]
    Neutral,
    #[serde(rename = "😢")]
    Sad,
    #[serde(rename = "😴")]
    Tired,
    #[serde(rename = "😡")]
    Angry,
}

impl MoodSymbol {
    /// Score for the weighted average-mood computation
    pub fn score(&self) -> u8 {
        match self {
            MoodSymbol::Happy | MoodSymbol::Loved => 5,
            MoodSymbol::Neutral => 3,
            MoodSymbol::Sad | MoodSymbol::Tired => 2,
            MoodSymbol::Angry => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodSymbol::Happy => "😊",
            MoodSymbol::Loved => "😍",
            MoodSymbol::Neutral => "😐",
            MoodSymbol::Sad => "😢",
            MoodSymbol::Tired => "😴",
            MoodSymbol::Angry => "😡",
        }
    }

    /// All symbols, for enumeration
    pub fn all() -> &'static [MoodSymbol] {
        &[
            MoodSymbol::Happy,
            MoodSymbol::Loved,
            MoodSymbol::Neutral,
            MoodSymbol::Sad,
            MoodSymbol::Tired,
            MoodSymbol::Angry,
        ]
    }
}

impl FromStr for MoodSymbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "😊" => Ok(MoodSymbol::Happy),
            "😍" => Ok(MoodSymbol::Loved),
            "😐" => Ok(MoodSymbol::Neutral),
            "😢" => Ok(MoodSymbol::Sad),
            "😴" => Ok(MoodSymbol::Tired),
            "😡" => Ok(MoodSymbol::Angry),
            other => Err(format!("unknown mood symbol: {}", other)),
        }
    }
}

impl std::fmt::Display for MoodSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An owner-scoped mood entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mood {
    pub id: RecordId,
    pub user_id: UserId,
    pub mood: MoodSymbol,
    /// Intensity in 1..=5
    pub intensity: u8,
    #[serde(default)]
    pub note: Option<String>,
    pub date: DateTime<Utc>,
    /// Free-text activity tags, zero or more
    #[serde(default)]
    pub activities: Vec<String>,
}

/// Calendar-day range filter with an inclusive end day
///
/// A record at `end 23:59:59` still matches when `end` is given as a bare
/// date: the upper bound is `end + 1 day` at midnight, exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Lower bound as an instant: midnight UTC of the start day
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// Exclusive upper bound as an instant: midnight UTC of the day after `end`
    pub fn end_instant_exclusive(&self) -> Option<DateTime<Utc>> {
        self.end
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// Whether the given instant falls inside the range
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if let Some(start) = self.start_instant() {
            if instant < start {
                return false;
            }
        }
        if let Some(end) = self.end_instant_exclusive() {
            if instant >= end {
                return false;
            }
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Filter for listing tasks
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    /// Match tasks due on this calendar day
    pub due_on: Option<NaiveDate>,
    pub category: Option<String>,
}

/// Filter for listing events
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Events starting at or after this instant
    pub start: Option<DateTime<Utc>>,
    /// Events ending at or before this instant
    pub end: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

/// Filter for listing mood entries
#[derive(Debug, Clone, Default)]
pub struct MoodFilter {
    pub range: DateRange,
    pub mood: Option<MoodSymbol>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn priority_weights() {
        assert_eq!(Priority::Low.weight(), 1);
        assert_eq!(Priority::Medium.weight(), 2);
        assert_eq!(Priority::High.weight(), 3);
    }

    #[test]
    fn mood_symbol_scores() {
        assert_eq!(MoodSymbol::Happy.score(), 5);
        assert_eq!(MoodSymbol::Loved.score(), 5);
        assert_eq!(MoodSymbol::Neutral.score(), 3);
        assert_eq!(MoodSymbol::Sad.score(), 2);
        assert_eq!(MoodSymbol::Tired.score(), 2);
        assert_eq!(MoodSymbol::Angry.score(), 1);
    }

    #[test]
    fn mood_symbol_round_trips_through_str() {
        for symbol in MoodSymbol::all() {
            assert_eq!(symbol.as_str().parse::<MoodSymbol>().unwrap(), *symbol);
        }
        assert!("🤖".parse::<MoodSymbol>().is_err());
    }

    #[test]
    fn date_range_end_day_is_inclusive() {
        let range = DateRange::new(None, Some(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()));

        let last_second = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap();
        assert!(range.contains(last_second));

        let next_midnight = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        assert!(!range.contains(next_midnight));
    }

    #[test]
    fn date_range_start_is_inclusive_midnight() {
        let range = DateRange::new(Some(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()), None);

        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap()));
    }

    #[test]
    fn empty_date_range_contains_everything() {
        let range = DateRange::default();
        assert!(range.is_empty());
        assert!(range.contains(Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap()));
    }
}
