//! Users store: the user list, an id-indexed cache of individually fetched
//! users, the selected user, and the user edit overlay.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::api::Api;
use crate::error::{Error, Result};
use crate::fetch::{apply_settled, dedup_fetch, FetchOutcome};
use crate::overlay::{Overlay, Patch};
use crate::registry::{CacheKey, InFlightRegistry};
use crate::types::{User, UserPatch};

/// Snapshot of the users store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsersState {
    /// Canonical user list from `GET /users`.
    pub users: Vec<User>,
    /// Canonical users fetched individually, by id.
    pub by_id: HashMap<u64, User>,
    /// The user currently shown in the details view (canonical copy).
    pub selected_user: Option<User>,
    /// A fetch is running.
    pub loading: bool,
    /// Message of the last failure, cleared when the next fetch starts.
    pub error: Option<String>,
    /// Uncommitted user edits.
    pub edited: Overlay<User>,
}

impl UsersState {
    /// Canonical record for `id`, looked up in the list first and the id
    /// cache second.
    pub fn canonical(&self, id: u64) -> Option<&User> {
        self.users
            .iter()
            .find(|user| user.id == id)
            .or_else(|| self.by_id.get(&id))
    }

    /// Display value for `id`: canonical merged with pending edits.
    pub fn display(&self, id: u64) -> Option<User> {
        self.canonical(id).map(|user| self.edited.merged(user))
    }

    /// Display value of the selected user.
    pub fn selected_display(&self) -> Option<User> {
        self.selected_user
            .as_ref()
            .map(|user| self.edited.merged(user))
    }

    fn begin_request(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn request_failed(&mut self, err: &Error) {
        self.loading = false;
        self.error = Some(err.to_string());
    }

    /// Writes a server-confirmed record everywhere `id` is held canonically.
    fn replace(&mut self, id: u64, user: User) {
        if let Some(slot) = self.users.iter_mut().find(|u| u.id == id) {
            *slot = user.clone();
        }
        if let Some(slot) = self.by_id.get_mut(&id) {
            *slot = user.clone();
        }
        if let Some(slot) = self.selected_user.as_mut().filter(|u| u.id == id) {
            *slot = user;
        }
    }
}

/// Users store handle. Cloning shares the same state.
#[derive(Clone)]
pub struct UsersStore {
    state: Arc<RwLock<UsersState>>,
    registry: Arc<InFlightRegistry>,
    api: Arc<dyn Api>,
}

impl fmt::Debug for UsersStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsersStore")
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

impl UsersStore {
    /// Creates an empty store sharing `registry` and `api`.
    pub fn new(registry: Arc<InFlightRegistry>, api: Arc<dyn Api>) -> Self {
        Self {
            state: Arc::new(RwLock::new(UsersState::default())),
            registry,
            api,
        }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> UsersState {
        self.state.read().clone()
    }

    /// Fetches the user list unless it is already loaded or loading.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn fetch_users(&self) -> FetchOutcome {
        let weak = Arc::downgrade(&self.state);
        let api = Arc::clone(&self.api);
        let key = CacheKey::UsersList;

        dedup_fetch(
            &self.registry,
            key,
            || !self.state.read().users.is_empty(),
            || self.state.write().begin_request(),
            async move {
                let result = api.list_users().await;
                apply_settled(&weak, key, |state| match result {
                    Ok(users) => {
                        tracing::info!(key = %key, count = users.len(), "users loaded");
                        state.loading = false;
                        state.users = users;
                    },
                    Err(err) => {
                        tracing::warn!(key = %key, category = err.category(), error = %err, "users request failed");
                        state.request_failed(&err);
                    },
                });
            },
        )
    }

    /// Fetches a single user into the id cache and selects it.
    ///
    /// When the user is already cached it is selected without a network
    /// call.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn fetch_user(&self, id: u64) -> FetchOutcome {
        let weak = Arc::downgrade(&self.state);
        let api = Arc::clone(&self.api);
        let key = CacheKey::User(id);

        let outcome = dedup_fetch(
            &self.registry,
            key,
            || self.state.read().by_id.contains_key(&id),
            || self.state.write().begin_request(),
            async move {
                let result = api.get_user(id).await;
                apply_settled(&weak, key, |state| match result {
                    Ok(user) => {
                        tracing::info!(key = %key, "user loaded");
                        state.loading = false;
                        state.by_id.insert(user.id, user.clone());
                        state.selected_user = Some(user);
                    },
                    Err(err) => {
                        tracing::warn!(key = %key, category = err.category(), error = %err, "user request failed");
                        state.request_failed(&err);
                    },
                });
            },
        );

        if outcome.is_satisfied() {
            let mut state = self.state.write();
            state.selected_user = state.by_id.get(&id).cloned();
        }
        outcome
    }

    /// Records field changes for user `id`.
    ///
    /// Returns `false` (and records nothing) when `id` is not held
    /// canonically.
    pub fn edit_user(&self, id: u64, changes: UserPatch) -> bool {
        let mut state = self.state.write();
        if state.canonical(id).is_none() {
            tracing::debug!(user_id = id, "edit ignored, user not loaded");
            return false;
        }
        state.edited.edit(id, changes);
        true
    }

    /// Discards pending changes for user `id`. Returns `true` if there were
    /// any.
    pub fn revert_user(&self, id: u64) -> bool {
        self.state.write().edited.revert(id).is_some()
    }

    /// Sends the pending changes for user `id` to the server.
    ///
    /// Returns `Ok(None)` when there is nothing to submit. On success the
    /// server's representation replaces the canonical record and the edits
    /// are dropped. On failure the edits are kept, the store `error` is set,
    /// and the error is returned.
    pub async fn submit_user(&self, id: u64) -> Result<Option<User>> {
        let merged = {
            let mut state = self.state.write();
            let Some(patch) = state.edited.get(id).cloned() else {
                return Ok(None);
            };
            match state.canonical(id) {
                Some(base) => patch.apply_to(base),
                None => {
                    tracing::debug!(user_id = id, "submit dropped, user no longer loaded");
                    state.edited.revert(id);
                    return Ok(None);
                },
            }
        };

        match self.api.update_user(&merged).await {
            Ok(saved) => {
                tracing::info!(user_id = id, "user saved");
                let mut state = self.state.write();
                state.replace(id, saved.clone());
                state.edited.revert(id);
                Ok(Some(saved))
            },
            Err(err) => {
                tracing::warn!(user_id = id, category = err.category(), error = %err, "user update failed");
                self.state.write().error = Some(err.to_string());
                Err(err)
            },
        }
    }

    /// Clears the selection.
    pub fn clear_selected_user(&self) {
        self.state.write().selected_user = None;
    }

    /// Display value of user `id`.
    pub fn user(&self, id: u64) -> Option<User> {
        self.state.read().display(id)
    }

    /// Display value of the selected user.
    pub fn selected_user(&self) -> Option<User> {
        self.state.read().selected_display()
    }

    /// Returns `true` if user `id` has unsaved changes.
    pub fn is_dirty(&self, id: u64) -> bool {
        self.state.read().edited.is_dirty(id)
    }

    /// Pending changes for user `id`, if any.
    pub fn overlay(&self, id: u64) -> Option<UserPatch> {
        self.state.read().edited.get(id).cloned()
    }

    /// Canonical user list.
    pub fn users(&self) -> Vec<User> {
        self.state.read().users.clone()
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
