//! The deduplicated fetch procedure shared by every entity fetch.
//!
//! Given a cache key and an "already satisfied" predicate:
//!
//! 1. If the key is in flight, return immediately with the existing handle.
//! 2. If the predicate holds against current state, return immediately
//!    without any network call.
//! 3. Otherwise register the key, mark the store as loading, and spawn the
//!    call. The spawned task applies the result and clears the key on every
//!    completion path.
//!
//! Spawned fetches run to completion: dropping the returned
//! [`FetchOutcome`] does not cancel them. A panic inside a fetch is caught
//! and logged; the key is cleared and every waiter settles normally, but no
//! state update is applied.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};

use futures::FutureExt;
use parking_lot::RwLock;

use crate::registry::{CacheKey, InFlightRegistry, RequestHandle};

/// What a fetch intent did.
#[derive(Clone)]
#[must_use = "await `settled()` to observe the fetch result"]
pub enum FetchOutcome {
    /// A new request was issued.
    Started(RequestHandle),
    /// An equivalent request was already running; nothing was issued.
    InFlight(RequestHandle),
    /// Current state already satisfies the request; nothing was issued.
    Satisfied,
}

impl std::fmt::Debug for FetchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Started(_) => f.write_str("Started"),
            Self::InFlight(_) => f.write_str("InFlight"),
            Self::Satisfied => f.write_str("Satisfied"),
        }
    }
}

impl FetchOutcome {
    /// Returns `true` if this call issued a network request.
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }

    /// Returns `true` if this call joined a request already in flight.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight(_))
    }

    /// Returns `true` if current state already satisfied the request.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }

    /// The handle of the request this outcome refers to, if any.
    pub fn handle(&self) -> Option<&RequestHandle> {
        match self {
            Self::Started(handle) | Self::InFlight(handle) => Some(handle),
            Self::Satisfied => None,
        }
    }

    /// Waits until the referenced request has settled and its state update
    /// has been applied. Returns immediately for [`FetchOutcome::Satisfied`].
    ///
    /// Never panics, even if the fetch itself panicked.
    pub async fn settled(self) {
        if let Self::Started(handle) | Self::InFlight(handle) = self {
            handle.await;
        }
    }
}

/// Runs the deduplicated fetch procedure.
///
/// `satisfied` and `begin` run synchronously on the caller's thread. `begin`
/// runs while `key` is being registered, before any joiner can see the
/// handle, so it must not touch the registry. `work` performs the call and
/// applies its result; it is only polled if this call wins registration of
/// `key`.
///
/// Must be called from within a Tokio runtime.
pub(crate) fn dedup_fetch<W>(
    registry: &Arc<InFlightRegistry>,
    key: CacheKey,
    satisfied: impl FnOnce() -> bool,
    begin: impl FnOnce(),
    work: W,
) -> FetchOutcome
where
    W: Future<Output = ()> + Send + 'static,
{
    if let Some(handle) = registry.get(&key) {
        tracing::debug!(key = %key, "fetch already in flight");
        return FetchOutcome::InFlight(handle);
    }

    if satisfied() {
        tracing::debug!(key = %key, "fetch skipped, state already satisfied");
        return FetchOutcome::Satisfied;
    }

    // The guard is created on first poll so a handle that loses the
    // registration race never clears the winner's entry.
    let guard_registry = Arc::clone(registry);
    let handle: RequestHandle = async move {
        let _guard = guard_registry.clear_on_drop(key);
        if AssertUnwindSafe(work).catch_unwind().await.is_err() {
            tracing::error!(key = %key, "fetch panicked, state left unchanged");
        }
    }
    .boxed()
    .shared();

    if let Err(existing) = registry.register_with(key, handle.clone(), begin) {
        tracing::debug!(key = %key, "lost registration race, joining in-flight fetch");
        return FetchOutcome::InFlight(existing);
    }

    tracing::info!(key = %key, "fetch started");
    tokio::spawn(handle.clone());
    FetchOutcome::Started(handle)
}

/// Applies a settled result to a store's state if the store still exists.
///
/// Stores hand spawned fetches a weak reference so a dropped store does not
/// outlive its consumers; the update is then skipped, while the registry key
/// is still cleared by the fetch's guard.
pub(crate) fn apply_settled<S>(state: &Weak<RwLock<S>>, key: CacheKey, apply: impl FnOnce(&mut S)) {
    match state.upgrade() {
        Some(state) => apply(&mut state.write()),
        None => tracing::debug!(key = %key, "store dropped before fetch settled"),
    }
}
