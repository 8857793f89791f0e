//! Mood statistics aggregation
//!
//! Groups a caller's mood entries by symbol and derives per-group and
//! overall summaries: counts, average intensity, top activities, date
//! ranges, a percentage distribution, and a weighted average mood score.
//!
//! Pure computation over an in-memory snapshot; the caller is responsible
//! for ownership scoping, this module only applies the optional date-range
//! filter.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::types::{DateRange, Mood, MoodSymbol};

/// How many activities to report per mood group
const TOP_ACTIVITY_LIMIT: usize = 3;

/// Aggregated statistics for one mood symbol
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodStat {
    pub mood: MoodSymbol,
    pub count: u64,
    /// Arithmetic mean of intensity, unrounded
    pub avg_intensity: f64,
    /// Up to three most frequent activities, ties broken by first occurrence
    pub top_activities: Vec<String>,
    pub date_range: ObservedRange,
    /// Flattened multiset of every activity in the group, in record order
    pub activities: Vec<String>,
}

/// Min and max timestamp observed in a group
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ObservedRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// One entry of the overall percentage distribution
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodDistributionEntry {
    pub mood: MoodSymbol,
    /// Integer percentage of the total, rounded half-up
    pub percentage: u32,
    pub count: u64,
}

/// Summary across all groups
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverallMoodSummary {
    pub total_moods: u64,
    pub mood_distribution: Vec<MoodDistributionEntry>,
    /// Weighted mean of the per-symbol scores; absent when there are no
    /// entries rather than propagating a NaN through serialization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_mood: Option<f64>,
}

/// Full mood statistics response: per-group stats plus the overall summary
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MoodStatsReport {
    pub stats: Vec<MoodStat>,
    pub overall: OverallMoodSummary,
}

/// Accumulator for one mood group while scanning records
struct GroupAccum {
    mood: MoodSymbol,
    count: u64,
    intensity_sum: u64,
    activities: Vec<String>,
    first_date: DateTime<Utc>,
    last_date: DateTime<Utc>,
}

/// Compute per-symbol mood statistics and the overall summary
///
/// Applies the inclusive date-range filter when `range` is present, groups
/// the surviving entries by symbol (first-occurrence order), then emits
/// groups sorted by count descending with a stable tie-break.
pub fn compute_mood_stats(moods: &[Mood], range: Option<&DateRange>) -> MoodStatsReport {
    let mut groups: Vec<GroupAccum> = Vec::new();

    for mood in moods {
        if let Some(range) = range {
            if !range.contains(mood.date) {
                continue;
            }
        }

        match groups.iter_mut().find(|g| g.mood == mood.mood) {
            Some(group) => {
                group.count += 1;
                group.intensity_sum += u64::from(mood.intensity);
                group.activities.extend(mood.activities.iter().cloned());
                group.first_date = group.first_date.min(mood.date);
                group.last_date = group.last_date.max(mood.date);
            }
            None => groups.push(GroupAccum {
                mood: mood.mood,
                count: 1,
                intensity_sum: u64::from(mood.intensity),
                activities: mood.activities.clone(),
                first_date: mood.date,
                last_date: mood.date,
            }),
        }
    }

    // Stable sort keeps grouping (first-occurrence) order among equal counts
    groups.sort_by(|a, b| b.count.cmp(&a.count));

    let stats: Vec<MoodStat> = groups
        .into_iter()
        .map(|group| MoodStat {
            mood: group.mood,
            count: group.count,
            avg_intensity: group.intensity_sum as f64 / group.count as f64,
            top_activities: top_activities(&group.activities),
            date_range: ObservedRange {
                start: group.first_date,
                end: group.last_date,
            },
            activities: group.activities,
        })
        .collect();

    let total_moods: u64 = stats.iter().map(|s| s.count).sum();

    let mood_distribution = stats
        .iter()
        .map(|stat| MoodDistributionEntry {
            mood: stat.mood,
            percentage: if total_moods == 0 {
                0
            } else {
                (stat.count as f64 / total_moods as f64 * 100.0).round() as u32
            },
            count: stat.count,
        })
        .collect();

    let average_mood = if total_moods == 0 {
        None
    } else {
        let weighted_sum: u64 = stats
            .iter()
            .map(|s| u64::from(s.mood.score()) * s.count)
            .sum();
        Some(weighted_sum as f64 / total_moods as f64)
    };

    MoodStatsReport {
        stats,
        overall: OverallMoodSummary {
            total_moods,
            mood_distribution,
            average_mood,
        },
    }
}

/// Top activities by frequency, ties broken by first distinct occurrence
fn top_activities(activities: &[String]) -> Vec<String> {
    // Insertion-ordered frequency counts; activity sets are small
    let mut counts: Vec<(&String, u64)> = Vec::new();
    for activity in activities {
        match counts.iter_mut().find(|(a, _)| *a == activity) {
            Some((_, n)) => *n += 1,
            None => counts.push((activity, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(TOP_ACTIVITY_LIMIT)
        .map(|(a, _)| a.clone())
        .collect()
}
