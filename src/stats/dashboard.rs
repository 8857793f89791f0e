//! Dashboard digest
//!
//! Folds a caller's task snapshot, upcoming-event count, and most recent
//! mood entries into the single summary the dashboard renders. Computed
//! fresh per request, never stored.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::types::{Mood, MoodSymbol, Task};

/// Task counts folded by completion state
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
}

/// Projection of a mood entry carried on the dashboard
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecentMood {
    pub mood: MoodSymbol,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Most frequent mood among the recent entries
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MoodInsight {
    pub mood: MoodSymbol,
    pub count: u64,
}

/// Per-request dashboard summary
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDigest {
    pub tasks: TaskCounts,
    pub upcoming_events: u64,
    pub recent_moods: Vec<RecentMood>,
    /// Absent (not an error) when there are no recent moods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_insight: Option<MoodInsight>,
}

/// Build the dashboard digest
///
/// `upcoming_events` and `recent_moods` are passed through as supplied: the
/// caller has already filtered events to `start >= now` and capped the mood
/// entries at five, sorted newest first.
pub fn compute_dashboard(
    tasks: &[Task],
    upcoming_events: u64,
    recent_moods: &[Mood],
) -> DashboardDigest {
    let mut counts = TaskCounts::default();
    for task in tasks {
        counts.total += 1;
        if task.completed {
            counts.completed += 1;
        } else {
            counts.pending += 1;
        }
    }

    let mood_insight = most_frequent_mood(recent_moods);

    DashboardDigest {
        tasks: counts,
        upcoming_events,
        recent_moods: recent_moods
            .iter()
            .map(|m| RecentMood {
                mood: m.mood,
                date: m.date,
                note: m.note.clone(),
            })
            .collect(),
        mood_insight,
    }
}

/// Highest-frequency symbol, ties broken by first occurrence in sequence order
fn most_frequent_mood(moods: &[Mood]) -> Option<MoodInsight> {
    let mut counts: Vec<(MoodSymbol, u64)> = Vec::new();
    for mood in moods {
        match counts.iter_mut().find(|(s, _)| *s == mood.mood) {
            Some((_, n)) => *n += 1,
            None => counts.push((mood.mood, 1)),
        }
    }
    // Only a strictly greater count displaces the current best, so ties go
    // to the symbol seen first
    let mut best: Option<(MoodSymbol, u64)> = None;
    for (mood, count) in counts {
        if best.map_or(true, |(_, n)| count > n) {
            best = Some((mood, count));
        }
    }
    best.map(|(mood, count)| MoodInsight { mood, count })
}
