//! Posts store: the posts of one user, plus edit and delete.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::api::Api;
use crate::error::{Error, Result};
use crate::fetch::{apply_settled, dedup_fetch, FetchOutcome};
use crate::overlay::{Overlay, Patch};
use crate::registry::{CacheKey, InFlightRegistry};
use crate::types::{Post, PostPatch};

/// Snapshot of the posts store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostsState {
    /// Canonical posts of [`user_id`](Self::user_id).
    pub posts: Vec<Post>,
    /// Owner of the loaded posts; `None` until the first successful fetch.
    pub user_id: Option<u64>,
    /// A fetch is running.
    pub loading: bool,
    /// Message of the last failure.
    pub error: Option<String>,
    /// Uncommitted post edits.
    pub edited: Overlay<Post>,
}

impl PostsState {
    /// Canonical record for `id`.
    pub fn canonical(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Display value for `id`.
    pub fn display(&self, id: u64) -> Option<Post> {
        self.canonical(id).map(|post| self.edited.merged(post))
    }

    /// Display values of every loaded post, in canonical order.
    pub fn displayed_posts(&self) -> Vec<Post> {
        self.posts
            .iter()
            .map(|post| self.edited.merged(post))
            .collect()
    }

    fn request_failed(&mut self, err: &Error) {
        self.loading = false;
        self.error = Some(err.to_string());
    }
}

/// Posts store handle. Cloning shares the same state.
#[derive(Clone)]
pub struct PostsStore {
    state: Arc<RwLock<PostsState>>,
    registry: Arc<InFlightRegistry>,
    api: Arc<dyn Api>,
}

impl fmt::Debug for PostsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostsStore")
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

impl PostsStore {
    /// Creates an empty store sharing `registry` and `api`.
    pub fn new(registry: Arc<InFlightRegistry>, api: Arc<dyn Api>) -> Self {
        Self {
            state: Arc::new(RwLock::new(PostsState::default())),
            registry,
            api,
        }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> PostsState {
        self.state.read().clone()
    }

    /// Loads the posts of `user_id`, replacing whatever was loaded.
    ///
    /// Satisfied when the loaded posts already belong to `user_id`. A
    /// successful load drops every pending post edit.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn fetch_user_posts(&self, user_id: u64) -> FetchOutcome {
        let weak = Arc::downgrade(&self.state);
        let api = Arc::clone(&self.api);
        let key = CacheKey::UserPosts(user_id);

        dedup_fetch(
            &self.registry,
            key,
            || self.state.read().user_id == Some(user_id),
            || {
                let mut state = self.state.write();
                state.loading = true;
                state.error = None;
            },
            async move {
                let result = api.list_user_posts(user_id).await;
                apply_settled(&weak, key, |state| match result {
                    Ok(posts) => {
                        tracing::info!(key = %key, count = posts.len(), "posts loaded");
                        state.loading = false;
                        state.posts = posts;
                        state.user_id = Some(user_id);
                        state.edited.clear();
                    },
                    Err(err) => {
                        tracing::warn!(key = %key, category = err.category(), error = %err, "posts request failed");
                        state.request_failed(&err);
                    },
                });
            },
        )
    }

    /// Records field changes for post `id`. Returns `false` when the post is
    /// not loaded.
    pub fn edit_post(&self, id: u64, changes: PostPatch) -> bool {
        let mut state = self.state.write();
        if state.canonical(id).is_none() {
            tracing::debug!(post_id = id, "edit ignored, post not loaded");
            return false;
        }
        state.edited.edit(id, changes);
        true
    }

    /// Discards pending changes for post `id`.
    pub fn revert_post(&self, id: u64) -> bool {
        self.state.write().edited.revert(id).is_some()
    }

    /// Sends the pending changes for post `id` to the server.
    ///
    /// Same contract as [`UsersStore::submit_user`](super::UsersStore::submit_user).
    /// If the post is deleted while the update is pending, the response is
    /// discarded, the edits are dropped and `Ok(None)` is returned.
    pub async fn submit_post(&self, id: u64) -> Result<Option<Post>> {
        let merged = {
            let mut state = self.state.write();
            let Some(patch) = state.edited.get(id).cloned() else {
                return Ok(None);
            };
            match state.canonical(id) {
                Some(base) => patch.apply_to(base),
                None => {
                    tracing::debug!(post_id = id, "submit dropped, post no longer loaded");
                    state.edited.revert(id);
                    return Ok(None);
                },
            }
        };

        match self.api.update_post(&merged).await {
            Ok(saved) => {
                let mut state = self.state.write();
                state.edited.revert(id);
                let Some(slot) = state.posts.iter_mut().find(|post| post.id == id) else {
                    tracing::debug!(post_id = id, "post removed while saving, response dropped");
                    return Ok(None);
                };
                tracing::info!(post_id = id, "post saved");
                *slot = saved.clone();
                Ok(Some(saved))
            },
            Err(err) => {
                tracing::warn!(post_id = id, category = err.category(), error = %err, "post update failed");
                self.state.write().error = Some(err.to_string());
                Err(err)
            },
        }
    }

    /// Deletes post `id` on the server, then locally.
    ///
    /// Returns `Ok(false)` without a request when the post is not loaded. On
    /// failure nothing local changes except `error`.
    pub async fn delete_post(&self, id: u64) -> Result<bool> {
        if self.state.read().canonical(id).is_none() {
            tracing::debug!(post_id = id, "delete ignored, post not loaded");
            return Ok(false);
        }

        match self.api.delete_post(id).await {
            Ok(()) => {
                tracing::info!(post_id = id, "post deleted");
                let mut state = self.state.write();
                state.posts.retain(|post| post.id != id);
                state.edited.revert(id);
                Ok(true)
            },
            Err(err) => {
                tracing::warn!(post_id = id, category = err.category(), error = %err, "post delete failed");
                self.state.write().error = Some(err.to_string());
                Err(err)
            },
        }
    }

    /// Display value of post `id`.
    pub fn post(&self, id: u64) -> Option<Post> {
        self.state.read().display(id)
    }

    /// Display values of every loaded post.
    pub fn posts(&self) -> Vec<Post> {
        self.state.read().displayed_posts()
    }

    /// Pending changes for post `id`, if any.
    pub fn overlay(&self, id: u64) -> Option<PostPatch> {
        self.state.read().edited.get(id).cloned()
    }

    /// Returns `true` if post `id` has unsaved changes.
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
