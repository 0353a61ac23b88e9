//! Entity stores.
//!
//! Each store owns a canonical collection, an [`Overlay`](crate::overlay::Overlay)
//! of pending edits keyed by entity id, and `loading`/`error` status. State
//! lives behind a `parking_lot::RwLock`; every mutation is a short
//! synchronous critical section and only network calls suspend.
//!
//! Store handles are cheap to clone and share their state. Fetches are
//! deduplicated through the [`InFlightRegistry`](crate::InFlightRegistry)
//! the store was built with.
//!
//! | Store          | Fetch                     | Cache key             | Submit      |
//! |----------------|---------------------------|-----------------------|-------------|
//! | [`UsersStore`] | `fetch_users`             | `users-list`          | remote PUT  |
//! | [`UsersStore`] | `fetch_user(id)`          | `user-<id>`           |             |
//! | [`TasksStore`] | `fetch_tasks`             | `tasks-list`          | local       |
//! | [`PostsStore`] | `fetch_user_posts(id)`    | `user-posts-<id>`     | remote PUT  |

mod posts;
mod tasks;
mod users;

pub use posts::{PostsState, PostsStore};
pub use tasks::{TasksState, TasksStore};
pub use users::{UsersState, UsersStore};
