use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Generated task identifier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single to-do item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Records written before ids existed deserialize to `None`
    /// and are numbered when loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    pub name: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    pub fn new(id: TaskId, name: impl Into<String>) -> Self {
        Task {
            id: Some(id),
            name: name.into(),
            is_completed: false,
        }
    }

    pub fn has_id(&self, id: TaskId) -> bool {
        self.id == Some(id)
    }
}

/// Assign fresh ids to tasks that lack one and return the next free id.
/// When the stored ids leave no room above them, the whole list is renumbered.
pub fn assign_missing_ids(tasks: &mut [Task]) -> TaskId {
    let missing = tasks.iter().filter(|t| t.id.is_none()).count() as u64;
    let first_free = tasks
        .iter()
        .filter_map(|t| t.id)
        .max()
        .map_or(Some(1), |id| id.0.checked_add(1));

    let Some(mut next) = first_free.filter(|n| n.checked_add(missing).is_some()) else {
        tracing::warn!(count = tasks.len(), "Task ids exhausted; renumbering");
        return renumber_ids(tasks);
    };

    for task in tasks.iter_mut().filter(|t| t.id.is_none()) {
        task.id = Some(TaskId(next));
        next += 1;
    }

    TaskId(next)
}

/// Number tasks 1..=n in list order and return the next free id
pub fn renumber_ids(tasks: &mut [Task]) -> TaskId {
    for (i, task) in tasks.iter_mut().enumerate() {
        task.id = Some(TaskId(i as u64 + 1));
    }
    TaskId(tasks.len() as u64 + 1)
}

/// Completion filter applied to the task list on read
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Completed, Filter::Incomplete];

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Completed => "Completed",
            Filter::Incomplete => "Incomplete",
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => task.is_completed,
            Filter::Incomplete => !task.is_completed,
        }
    }

    pub fn next(&self) -> Filter {
        match self {
            Filter::All => Filter::Completed,
            Filter::Completed => Filter::Incomplete,
            Filter::Incomplete => Filter::All,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Filter::All => 0,
            Filter::Completed => 1,
            Filter::Incomplete => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient notification shown over the list
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Toast {
    pub fn success(message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Toast {
            kind: ToastKind::Success,
            message: message.into(),
            raised_at: now,
        }
    }

    pub fn error(message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Toast {
            kind: ToastKind::Error,
            message: message.into(),
            raised_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.raised_at >= ttl
    }
}
