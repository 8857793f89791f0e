//! Statistics engine
//!
//! Pure, synchronous transformations from a caller's record snapshot into
//! aggregated summaries. No I/O, no locks, no caching: every call recomputes
//! from scratch over records the caller has already fetched and scoped.
//!
//! - [`mood::compute_mood_stats`]: per-symbol grouping, activity rankings,
//!   percentage distribution, weighted average mood
//! - [`task::compute_task_stats`]: per-completion-state breakdown
//! - [`dashboard::compute_dashboard`]: dashboard digest (task counts,
//!   upcoming events, recent moods, mood insight)
//!
//! All three are total over well-formed input: empty record sets produce
//! zero counts and absent optional fields, never errors.

pub mod dashboard;
pub mod mood;
pub mod task;

pub use dashboard::{compute_dashboard, DashboardDigest, MoodInsight, RecentMood, TaskCounts};
pub use mood::{
    compute_mood_stats, MoodDistributionEntry, MoodStat, MoodStatsReport, ObservedRange,
    OverallMoodSummary,
};
pub use task::{compute_task_stats, TaskStat};
