//! Task statistics aggregation
//!
//! Groups a caller's tasks by completion state and derives per-group counts,
//! priority-weighted averages, and due-date extremes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::types::Task;

/// Aggregated statistics for one completion state
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskStat {
    pub completed: bool,
    pub count: u64,
    /// Mean of the mapped priority weights (high=3, medium=2, low=1)
    pub avg_priority: f64,
    /// Earliest due date in the group; `null` when no task has one
    pub min_due_date: Option<DateTime<Utc>>,
    /// Latest due date in the group; `null` when no task has one
    pub max_due_date: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Bucket {
    count: u64,
    weight_sum: u64,
    min_due: Option<DateTime<Utc>>,
    max_due: Option<DateTime<Utc>>,
}

impl Bucket {
    fn add(&mut self, task: &Task) {
        self.count += 1;
        self.weight_sum += u64::from(task.priority.weight());
        if let Some(due) = task.due_date {
            self.min_due = Some(self.min_due.map_or(due, |d| d.min(due)));
            self.max_due = Some(self.max_due.map_or(due, |d| d.max(due)));
        }
    }

    fn into_stat(self, completed: bool) -> TaskStat {
        TaskStat {
            completed,
            count: self.count,
            avg_priority: self.weight_sum as f64 / self.count as f64,
            min_due_date: self.min_due,
            max_due_date: self.max_due,
        }
    }
}

/// Compute per-completion-state task statistics
///
/// Output holds exactly the completion states present in the input, pending
/// (`false`) before completed (`true`). Tasks without a due date are
/// excluded from the due-date extremes.
pub fn compute_task_stats(tasks: &[Task]) -> Vec<TaskStat> {
    let mut pending = Bucket::default();
    let mut completed = Bucket::default();

    for task in tasks {
        if task.completed {
            completed.add(task);
        } else {
            pending.add(task);
        }
    }

    let mut stats = Vec::with_capacity(2);
    if pending.count > 0 {
        stats.push(pending.into_stat(false));
    }
    if completed.count > 0 {
        stats.push(completed.into_stat(true));
    }
    stats
}
