//! Client-side state layer for a users/tasks/posts board.
//!
//! `userboard` keeps the state behind a browser-style application that lists
//! users and tasks from a JSONPlaceholder-shaped REST API, shows per-user
//! details and posts, and lets the user edit records locally before
//! committing them.
//!
//! # Overview
//!
//! - Fetches are deduplicated: while a request for a [`CacheKey`] is in
//!   flight, further fetch intents for the same key join it instead of
//!   issuing another call. The [`InFlightRegistry`] holds the pending
//!   handles and every fetch clears its key when it settles.
//! - Edits are drafts: each store keeps an [`Overlay`](overlay::Overlay) of
//!   partial records over its canonical collection. Reads merge the two;
//!   `submit` commits and `revert` discards.
//! - The tasks view is derived: filtered and paginated task lists are pure
//!   functions (see [`view`]) recomputed after every change.
//! - Field validation lives in the `userboard-validation` crate and is
//!   re-exported here.
//!
//! # Module Organization
//!
//! - [`board`] - Composition root wiring one registry and API into the stores
//! - [`store`] - Users, tasks and posts stores
//! - [`registry`] / [`fetch`] - In-flight registry and the deduplicated fetch
//! - [`overlay`] - Edit overlays and the [`Entity`](overlay::Entity) /
//!   [`Patch`](overlay::Patch) traits
//! - [`view`] - Filtering, pagination and owner lookup
//! - [`api`] - The remote API trait and its `reqwest` client
//! - [`config`] / [`error`] - Configuration and the crate error type
//!
//! # Example
//!
//! ```no_run
//! use userboard::{Board, BoardConfig, FilterUpdate, StatusFilter, UserPatch};
//!
//! # async fn example() -> userboard::Result<()> {
//! let board = Board::from_config(BoardConfig::new())?;
//!
//! board.tasks().fetch_tasks().settled().await;
//! board.tasks().set_filters(FilterUpdate::new().status(StatusFilter::Completed));
//! println!("{} pages of completed tasks", board.tasks().total_pages());
//!
//! board.users().fetch_user(1).settled().await;
//! board.users().edit_user(1, UserPatch::new().email("new@example.com"));
//! board.users().submit_user(1).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod fetch;
#[cfg(feature = "logging")]
pub mod logging;
pub mod overlay;
pub mod registry;
pub mod store;
pub mod types;
pub mod view;

// Re-exports for ergonomic access
pub use api::Api;
#[cfg(feature = "http-client")]
pub use api::HttpApi;
pub use board::Board;
pub use config::BoardConfig;
pub use error::{Error, Result};
pub use fetch::FetchOutcome;
pub use registry::{CacheKey, InFlightRegistry, RequestHandle};
pub use store::{PostsState, PostsStore, TasksState, TasksStore, UsersState, UsersStore};
pub use types::*;
pub use userboard_validation::{validate_field, validate_fields, Field};
