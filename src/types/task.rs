//! Task records, their edit shape, and the tasks view filters.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::user::{merge_slot, pick};
use crate::overlay::{Entity, Patch};

/// A task as served by `GET /todos`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Owning user (not enforced).
    pub user_id: u64,
    /// Unique id.
    pub id: u64,
    /// Title text.
    pub title: String,
    /// Completion flag.
    pub completed: bool,
}

impl Entity for Task {
    type Patch = TaskPatch;

    fn id(&self) -> u64 {
        self.id
    }
}

/// Pending changes to a [`Task`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(mut self, value: u64) -> Self {
        self.user_id = Some(value);
        self
    }

    pub fn title(mut self, value: impl Into<String>) -> Self {
        self.title = Some(value.into());
        self
    }

    pub fn completed(mut self, value: bool) -> Self {
        self.completed = Some(value);
        self
    }
}

impl Patch for TaskPatch {
    type Target = Task;

    fn merge(&mut self, later: Self) {
        merge_slot(&mut self.user_id, later.user_id);
        merge_slot(&mut self.title, later.title);
        merge_slot(&mut self.completed, later.completed);
    }

    fn apply_to(&self, base: &Task) -> Task {
        Task {
            id: base.id,
            user_id: pick(&self.user_id, &base.user_id),
            title: pick(&self.title, &base.title),
            completed: pick(&self.completed, &base.completed),
        }
    }
}

/// Completion status filter for the tasks view.
///
/// # Examples
///
/// ```
/// use userboard::StatusFilter;
///
/// let status: StatusFilter = serde_json::from_str("\"not_completed\"").unwrap();
/// assert_eq!(status, StatusFilter::NotCompleted);
/// assert!(StatusFilter::All.matches(true));
/// assert!(!StatusFilter::Completed.matches(false));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// No status filtering.
    #[default]
    All,
    /// Only completed tasks.
    Completed,
    /// Only open tasks.
    NotCompleted,
}

impl StatusFilter {
    /// Returns `true` if a task with the given completion flag passes.
    pub fn matches(&self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Completed => completed,
            Self::NotCompleted => !completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Completed => write!(f, "completed"),
            Self::NotCompleted => write!(f, "not_completed"),
        }
    }
}

/// Filters applied to the canonical task list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    /// Completion status filter.
    pub status: StatusFilter,
    /// Case-insensitive title substring; blank matches everything.
    pub title: String,
    /// Exact owner match; `None` matches everything.
    pub user_id: Option<u64>,
}

impl Filters {
    /// Applies the set fields of `update`.
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(user_id) = update.user_id {
            self.user_id = user_id;
        }
    }
}

/// A partial change to [`Filters`].
///
/// `user_id` is doubly optional: `None` leaves the owner filter alone,
/// `Some(None)` clears it.
///
/// # Examples
///
/// ```
/// use userboard::{FilterUpdate, Filters, StatusFilter};
///
/// let mut filters = Filters::default();
/// filters.merge(FilterUpdate::new().status(StatusFilter::Completed).user(3));
/// filters.merge(FilterUpdate::new().title("buy"));
/// assert_eq!(filters.status, StatusFilter::Completed);
/// assert_eq!(filters.user_id, Some(3));
///
/// filters.merge(FilterUpdate::new().any_user());
/// assert_eq!(filters.user_id, None);
/// assert_eq!(filters.title, "buy");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub status: Option<StatusFilter>,
    pub title: Option<String>,
    pub user_id: Option<Option<u64>>,
}

impl FilterUpdate {
    /// Creates an update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = Some(status);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Restrict to tasks owned by `user_id`.
    pub fn user(mut self, user_id: u64) -> Self {
        self.user_id = Some(Some(user_id));
        self
    }

    /// Clear the owner filter.
    pub fn any_user(mut self) -> Self {
        self.user_id = Some(None);
        self
    }
}
