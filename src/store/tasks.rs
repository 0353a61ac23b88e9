//! Tasks store: the task list, its filters and pagination, and local edits.
//!
//! `filtered_tasks` is recomputed from `(tasks, filters)` after every
//! mutation of either, so it is never stale. Pending edits are not part of
//! the filter input; they are merged into the page at read time by
//! [`TasksStore::paginated_tasks`].

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::api::Api;
use crate::fetch::{apply_settled, dedup_fetch, FetchOutcome};
use crate::overlay::{Overlay, Patch};
use crate::registry::{CacheKey, InFlightRegistry};
use crate::types::{FilterUpdate, Filters, Task, TaskPatch};
use crate::view;

/// Snapshot of the tasks store.
#[derive(Debug, Clone, PartialEq)]
pub struct TasksState {
    /// Canonical task list from `GET /todos`.
    pub tasks: Vec<Task>,
    /// `tasks` after applying `filters`.
    pub filtered_tasks: Vec<Task>,
    /// Active filters.
    pub filters: Filters,
    /// 1-based page into `filtered_tasks`.
    pub current_page: usize,
    /// Tasks per page.
    pub page_size: usize,
    /// A fetch is running.
    pub loading: bool,
    /// Message of the last failure.
    pub error: Option<String>,
    /// Uncommitted task edits.
    pub edited: Overlay<Task>,
}

impl TasksState {
    /// Empty state with the given page size.
    pub fn new(page_size: usize) -> Self {
        Self {
            tasks: Vec::new(),
            filtered_tasks: Vec::new(),
            filters: Filters::default(),
            current_page: 1,
            page_size,
            loading: false,
            error: None,
            edited: Overlay::new(),
        }
    }

    /// Canonical record for `id`.
    pub fn canonical(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Display value for `id`.
    pub fn display(&self, id: u64) -> Option<Task> {
        self.canonical(id).map(|task| self.edited.merged(task))
    }

    /// Display values of the current page.
    pub fn page(&self) -> Vec<Task> {
        view::paginate(&self.filtered_tasks, self.current_page, self.page_size)
            .iter()
            .map(|task| self.edited.merged(task))
            .collect()
    }

    /// Page count of the filtered list.
    pub fn total_pages(&self) -> usize {
        view::total_pages(self.filtered_tasks.len(), self.page_size)
    }

    fn recompute(&mut self) {
        self.filtered_tasks = view::filter_tasks(&self.tasks, &self.filters);
    }

    /// Keeps `current_page` inside `1..=total_pages` (or 1 when empty).
    fn clamp_page(&mut self) {
        let last = self.total_pages().max(1);
        self.current_page = self.current_page.clamp(1, last);
    }
}

impl Default for TasksState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}

/// Tasks store handle. Cloning shares the same state.
#[derive(Clone)]
pub struct TasksStore {
    state: Arc<RwLock<TasksState>>,
    registry: Arc<InFlightRegistry>,
    api: Arc<dyn Api>,
}

impl fmt::Debug for TasksStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TasksStore")
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

impl TasksStore {
    /// Creates an empty store paging `page_size` tasks at a time.
    pub fn new(registry: Arc<InFlightRegistry>, api: Arc<dyn Api>, page_size: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(TasksState::new(page_size))),
            registry,
            api,
        }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> TasksState {
        self.state.read().clone()
    }

    /// Fetches the task list unless it is already loaded or loading.
    ///
    /// On success the list is replaced, filters are re-applied and the page
    /// resets to 1. On failure only `loading` and `error` change.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn fetch_tasks(&self) -> FetchOutcome {
        let weak = Arc::downgrade(&self.state);
        let api = Arc::clone(&self.api);
        let key = CacheKey::TasksList;

        dedup_fetch(
            &self.registry,
            key,
            || !self.state.read().tasks.is_empty(),
            || {
                let mut state = self.state.write();
                state.loading = true;
                state.error = None;
            },
            async move {
                let result = api.list_tasks().await;
                apply_settled(&weak, key, |state| match result {
                    Ok(tasks) => {
                        tracing::info!(key = %key, count = tasks.len(), "tasks loaded");
                        state.loading = false;
                        state.tasks = tasks;
                        state.recompute();
                        state.current_page = 1;
                    },
                    Err(err) => {
                        tracing::warn!(key = %key, category = err.category(), error = %err, "tasks request failed");
                        state.loading = false;
                        state.error = Some(err.to_string());
                    },
                });
            },
        )
    }

    /// Applies a partial filter change and returns to page 1.
    pub fn set_filters(&self, update: FilterUpdate) {
        let mut state = self.state.write();
        state.filters.merge(update);
        state.recompute();
        state.current_page = 1;
        tracing::debug!(
            status = %state.filters.status,
            title = %state.filters.title,
            user_id = ?state.filters.user_id,
            matching = state.filtered_tasks.len(),
            "task filters changed"
        );
    }

    /// Restores the default filters and returns to page 1.
    pub fn reset_filters(&self) {
        let mut state = self.state.write();
        state.filters = Filters::default();
        state.recompute();
        state.current_page = 1;
    }

    /// Moves to `page`; values below 1 are treated as 1.
    pub fn set_page(&self, page: usize) {
        self.state.write().current_page = page.max(1);
    }

    /// Flips `completed` on the canonical task `id`. Returns `false` when the
    /// task is not loaded.
    ///
    /// The current page is kept unless the filtered list shrank below it.
    pub fn toggle_task_status(&self, id: u64) -> bool {
        let mut state = self.state.write();
        let Some(task) = state.tasks.iter_mut().find(|task| task.id == id) else {
            tracing::debug!(task_id = id, "toggle ignored, task not loaded");
            return false;
        };
        task.completed = !task.completed;
        state.recompute();
        state.clamp_page();
        true
    }

    /// Records field changes for task `id`. Returns `false` when the task is
    /// not loaded.
    pub fn edit_task(&self, id: u64, changes: TaskPatch) -> bool {
        let mut state = self.state.write();
        if state.canonical(id).is_none() {
            tracing::debug!(task_id = id, "edit ignored, task not loaded");
            return false;
        }
        state.edited.edit(id, changes);
        true
    }

    /// Discards pending changes for task `id`.
    pub fn revert_task(&self, id: u64) -> bool {
        self.state.write().edited.revert(id).is_some()
    }

    /// Commits pending changes for task `id` into the canonical list.
    ///
    /// Task edits are local; nothing is sent to the server. Returns the
    /// committed task, or `None` when there was nothing to commit.
    pub fn submit_task(&self, id: u64) -> Option<Task> {
        let mut state = self.state.write();
        let patch = state.edited.revert(id)?;
        let slot = state.tasks.iter_mut().find(|task| task.id == id)?;
        *slot = patch.apply_to(slot);
        let committed = slot.clone();
        state.recompute();
        state.clamp_page();
        tracing::debug!(task_id = id, "task committed");
        Some(committed)
    }

    /// Display value of task `id`.
    pub fn task(&self, id: u64) -> Option<Task> {
        self.state.read().display(id)
    }

    /// Display values of the current page of filtered tasks.
    pub fn paginated_tasks(&self) -> Vec<Task> {
        self.state.read().page()
    }

    /// Page count of the filtered list.
    pub fn total_pages(&self) -> usize {
        self.state.read().total_pages()
    }

    /// Current 1-based page.
    pub fn current_page(&self) -> usize {
        self.state.read().current_page
    }

    /// Active filters.
    pub fn filters(&self) -> Filters {
        self.state.read().filters.clone()
    }

    /// Pending changes for task `id`, if any.
    pub fn overlay(&self, id: u64) -> Option<TaskPatch> {
        self.state.read().edited.get(id).cloned()
    }

    /// Returns `true` if task `id` has unsaved changes.
    pub fn is_dirty(&self, id: u64) -> bool {
        self.state.read().edited.is_dirty(id)
    }

    /// Whether a fetch is running.
    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// Message of the last failure.
    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }
}
