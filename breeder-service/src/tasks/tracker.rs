//! In-memory status of delayed submissions
//!
//! Each entry moves `pending -> completed` or `pending -> failed` exactly
//! once. Entries are lost on restart and evicted some time after they finish.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::ids::BreederId;

/// Lifecycle state of a delayed submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Pending,
    Completed,
    Failed,
}

impl TaskState {
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Tracked state of one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    pub state: TaskState,
    /// Failure detail, set only for `Failed`
    pub error: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Status poll response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub task_id: BreederId,
    pub status: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskStatusResponse {
    pub fn new(task_id: BreederId, entry: TaskEntry) -> Self {
        Self {
            task_id,
            status: entry.state,
            error: entry.error,
        }
    }
}

/// Concurrent map from task id to status, shared between clones
#[derive(Debug, Clone, Default)]
pub struct TaskTracker {
    tasks: Arc<DashMap<BreederId, TaskEntry>>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `task_id` as pending.
    ///
    /// Returns `false` (and changes nothing) if the id is already tracked.
    pub fn register(&self, task_id: &BreederId) -> bool {
        match self.tasks.entry(task_id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                let now = Utc::now();
                slot.insert(TaskEntry {
                    state: TaskState::Pending,
                    error: None,
                    submitted_at: now,
                    updated_at: now,
                });
                true
            }
        }
    }

    /// Mark a pending task completed. Returns whether the transition happened.
    pub fn complete(&self, task_id: &BreederId) -> bool {
        self.finish(task_id, TaskState::Completed, None)
    }

    /// Mark a pending task failed. Returns whether the transition happened.
    pub fn fail(&self, task_id: &BreederId, error: impl Into<String>) -> bool {
        self.finish(task_id, TaskState::Failed, Some(error.into()))
    }

    fn finish(&self, task_id: &BreederId, state: TaskState, error: Option<String>) -> bool {
        match self.tasks.get_mut(task_id) {
            Some(mut entry) if entry.state == TaskState::Pending => {
                entry.state = state;
                entry.error = error;
                entry.updated_at = Utc::now();
                true
            }
            _ => false,
        }
    }

    /// Current entry for `task_id`, if tracked.
    pub fn get(&self, task_id: &BreederId) -> Option<TaskEntry> {
        self.tasks.get(task_id).map(|entry| entry.value().clone())
    }

    /// Drop finished entries last updated before `cutoff`; pending ones are kept.
    ///
    /// Returns the number of entries removed.
    pub fn evict_finished_before(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.tasks.len();
        self.tasks
            .retain(|_, entry| !(entry.state.is_finished() && entry.updated_at < cutoff));
        before.saturating_sub(self.tasks.len())
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Number of entries still pending
    pub fn pending_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|entry| entry.state == TaskState::Pending)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_register_starts_pending() {
        let tracker = TaskTracker::new();
        let id = BreederId::new();
        assert!(tracker.register(&id));

        let entry = tracker.get(&id).unwrap();
        assert_eq!(entry.state, TaskState::Pending);
        assert!(entry.error.is_none());
        assert_eq!(tracker.pending_count(), 1);
    }

    #[test]
    fn test_register_twice_keeps_first_entry() {
        let tracker = TaskTracker::new();
        let id = BreederId::new();
        tracker.register(&id);
        tracker.complete(&id);

        assert!(!tracker.register(&id));
        assert_eq!(tracker.get(&id).unwrap().state, TaskState::Completed);
    }

    #[test]
    fn test_transition_happens_once() {
        let tracker = TaskTracker::new();
        let id = BreederId::new();
        tracker.register(&id);

        assert!(tracker.complete(&id));
        assert!(!tracker.fail(&id, "too late"));
        assert!(!tracker.complete(&id));

        let entry = tracker.get(&id).unwrap();
        assert_eq!(entry.state, TaskState::Completed);
        assert!(entry.error.is_none());
    }

    #[test]
    fn test_fail_records_error() {
        let tracker = TaskTracker::new();
        let id = BreederId::new();
        tracker.register(&id);
        tracker.fail(&id, "store unavailable");

        let entry = tracker.get(&id).unwrap();
        assert_eq!(entry.state, TaskState::Failed);
        assert_eq!(entry.error.as_deref(), Some("store unavailable"));
    }

    #[test]
    fn test_unknown_task() {
        let tracker = TaskTracker::new();
        let id = BreederId::from("nope");
        assert!(tracker.get(&id).is_none());
        assert!(!tracker.complete(&id));
    }

    #[test]
    fn test_eviction_keeps_pending_entries() {
        let tracker = TaskTracker::new();
        let done = BreederId::new();
        let failed = BreederId::new();
        let waiting = BreederId::new();
        for id in [&done, &failed, &waiting] {
            tracker.register(id);
        }
        tracker.complete(&done);
        tracker.fail(&failed, "boom");

        let removed = tracker.evict_finished_before(Utc::now() + Duration::seconds(1));
        assert_eq!(removed, 2);
        assert!(tracker.get(&done).is_none());
        assert!(tracker.get(&failed).is_none());
        assert_eq!(tracker.get(&waiting).unwrap().state, TaskState::Pending);
    }

    #[test]
    fn test_eviction_respects_cutoff() {
        let tracker = TaskTracker::new();
        let id = BreederId::new();
        tracker.register(&id);
        tracker.complete(&id);

        assert_eq!(
            tracker.evict_finished_before(Utc::now() - Duration::minutes(10)),
            0
        );
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_status_response_serialization() {
        let response = TaskStatusResponse {
            task_id: BreederId::from("t-1"),
            status: TaskState::Pending,
            error: None,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, serde_json::json!({"task_id": "t-1", "status": "pending"}));
    }
}
