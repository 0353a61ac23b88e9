//! In-flight request registry.
//!
//! The registry maps a [`CacheKey`] to the shared handle of the fetch that is
//! currently running for it. It is the sole source of truth for "is an
//! equivalent fetch already running": an entry is created when a fetch
//! starts and removed unconditionally when that fetch settles.
//!
//! Keys encode every varying request parameter (for example the target user
//! id), so one key never stands for two logically different requests.
//!
//! # Clearing
//!
//! There is no size bound and no expiry. A key that is never cleared would
//! suppress every later fetch for it, so fetches hold a [`ClearOnDrop`] guard
//! for their whole lifetime. The guard clears the key when the fetch
//! completes, fails, or unwinds.

use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, Shared};

/// Cloneable handle to a pending fetch. Awaiting it resolves once the fetch
/// has settled and its state update has been applied.
pub type RequestHandle = Shared<BoxFuture<'static, ()>>;

/// Identifies a logical fetch for deduplication.
///
/// # Examples
///
/// ```
/// use userboard::CacheKey;
///
/// assert_eq!(CacheKey::UsersList.to_string(), "users-list");
/// assert_eq!(CacheKey::User(5).to_string(), "user-5");
/// assert_eq!(CacheKey::TasksList.to_string(), "tasks-list");
/// assert_eq!(CacheKey::UserPosts(5).to_string(), "user-posts-5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// `GET /users`
    UsersList,
    /// `GET /users/{id}`
    User(u64),
    /// `GET /todos`
    TasksList,
    /// `GET /posts?userId={id}`
    UserPosts(u64),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsersList => write!(f, "users-list"),
            Self::User(id) => write!(f, "user-{id}"),
            Self::TasksList => write!(f, "tasks-list"),
            Self::UserPosts(user_id) => write!(f, "user-posts-{user_id}"),
        }
    }
}

/// Thread-safe map of cache keys to pending fetch handles.
#[derive(Default)]
pub struct InFlightRegistry {
    requests: DashMap<CacheKey, RequestHandle>,
}

impl fmt::Debug for InFlightRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InFlightRegistry")
            .field("in_flight", &self.keys())
            .finish()
    }
}

impl InFlightRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a fetch for `key` has started and not yet settled.
    pub fn is_in_flight(&self, key: &CacheKey) -> bool {
        self.requests.contains_key(key)
    }

    /// Returns the handle of the pending fetch for `key`, if any.
    pub fn get(&self, key: &CacheKey) -> Option<RequestHandle> {
        self.requests.get(key).map(|entry| entry.value().clone())
    }

    /// Registers `handle` under `key` unless the key is already in flight.
    ///
    /// The check and insert are atomic. On conflict the existing handle is
    /// returned and `handle` is not stored.
    pub fn register(&self, key: CacheKey, handle: RequestHandle) -> Result<(), RequestHandle> {
        self.register_with(key, handle, || {})
    }

    /// Like [`register`](Self::register), but runs `on_insert` before the
    /// entry becomes visible to other callers.
    ///
    /// `on_insert` runs only when `handle` is stored, while the key's shard
    /// is locked. It must not call back into the registry.
    pub fn register_with(
        &self,
        key: CacheKey,
        handle: RequestHandle,
        on_insert: impl FnOnce(),
    ) -> Result<(), RequestHandle> {
        match self.requests.entry(key) {
            Entry::Occupied(existing) => Err(existing.get().clone()),
            Entry::Vacant(slot) => {
                on_insert();
                slot.insert(handle);
                Ok(())
            },
        }
    }

    /// Removes the entry for `key`. Returns `true` if one was present.
    pub fn clear(&self, key: &CacheKey) -> bool {
        self.requests.remove(key).is_some()
    }

    /// Returns a guard that clears `key` when dropped.
    pub fn clear_on_drop(self: &Arc<Self>, key: CacheKey) -> ClearOnDrop {
        ClearOnDrop {
            registry: Arc::clone(self),
            key,
        }
    }

    /// Keys currently in flight, in no particular order.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.requests.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of fetches in flight.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns `true` if nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Clears a registry key when dropped.
#[must_use = "the key is cleared as soon as the guard is dropped"]
pub struct ClearOnDrop {
    registry: Arc<InFlightRegistry>,
    key: CacheKey,
}

impl fmt::Debug for ClearOnDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClearOnDrop").field("key", &self.key).finish()
    }
}

impl Drop for ClearOnDrop {
    fn drop(&mut self) {
        self.registry.clear(&self.key);
        tracing::trace!(key = %self.key, "in-flight entry cleared");
    }
}
