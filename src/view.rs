//! Derived view state: task filtering, pagination and owner lookup.
//!
//! Everything here is a pure, total function of its inputs. The tasks store
//! calls these after every mutation of tasks or filters; consumers may also
//! call them directly on snapshots.

use crate::types::{Filters, Task, User};

/// Returns the tasks that pass every active filter, in input order.
///
/// - status: exact match; [`StatusFilter::All`](crate::StatusFilter::All)
///   passes everything.
/// - title: case-insensitive substring of the trimmed filter text; blank
///   passes everything.
/// - user id: exact match; `None` passes everything.
///
/// # Examples
///
/// ```
/// use userboard::view::filter_tasks;
/// use userboard::{Filters, StatusFilter, Task};
///
/// let tasks = vec![
///     Task { id: 1, user_id: 1, title: "Buy milk".into(), completed: false },
///     Task { id: 2, user_id: 1, title: "Buy eggs".into(), completed: true },
/// ];
///
/// let done = Filters { status: StatusFilter::Completed, ..Filters::default() };
/// assert_eq!(filter_tasks(&tasks, &done).len(), 1);
///
/// let buy = Filters { title: "buy".into(), ..Filters::default() };
/// assert_eq!(filter_tasks(&tasks, &buy).len(), 2);
/// ```
pub fn filter_tasks(tasks: &[Task], filters: &Filters) -> Vec<Task> {
    let needle = filters.title.trim().to_lowercase();
    tasks
        .iter()
        .filter(|task| filters.status.matches(task.completed))
        .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
        .filter(|task| filters.user_id.is_none_or(|user_id| task.user_id == user_id))
        .cloned()
        .collect()
}

/// Returns page `page` (1-based) of `items`.
///
/// Pages past the end, page 0, and a page size of 0 all yield an empty
/// slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `len` items; 0 when `page_size` is 0.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        len.div_ceil(page_size)
    }
}

/// Name of the user with id `user_id`, if loaded.
pub fn owner_name(users: &[User], user_id: u64) -> Option<&str> {
    users
        .iter()
        .find(|user| user.id == user_id)
        .map(|user| user.name.as_str())
}
