//! Draft edits layered over canonical records.
//!
//! An [`Overlay`] maps entity ids to partial shadow records ([`Patch`]es)
//! holding only the fields the user changed. The displayed value of an entity
//! is `canonical ⊕ patch`, computed at read time by [`Overlay::merged`];
//! canonical state is never touched until the store commits a submit.
//!
//! An id present in the overlay means "has unsaved local changes"; absence
//! means "clean".

use std::collections::BTreeMap;
use std::fmt;

/// A record with a stable identity assigned by the remote source.
pub trait Entity: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Partial shadow record type for this entity.
    type Patch: Patch<Target = Self>;

    /// The entity's unique id.
    fn id(&self) -> u64;
}

/// A partial record: every field is optional and only set fields apply.
pub trait Patch: Clone + Default + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// The record this patch applies to.
    type Target;

    /// Folds `later` into `self`. Fields set in `later` win.
    fn merge(&mut self, later: Self);

    /// Returns `base` with every set field of this patch applied.
    fn apply_to(&self, base: &Self::Target) -> Self::Target;
}

/// Uncommitted local edits keyed by entity id.
///
/// # Examples
///
/// ```
/// use userboard::overlay::Overlay;
/// use userboard::{Post, PostPatch};
///
/// let canonical = Post { id: 1, user_id: 1, title: "a".into(), body: "b".into() };
/// let mut overlay: Overlay<Post> = Overlay::new();
///
/// overlay.edit(1, PostPatch::new().title("first"));
/// overlay.edit(1, PostPatch::new().title("second").body("new body"));
///
/// let shown = overlay.merged(&canonical);
/// assert_eq!(shown.title, "second");
/// assert_eq!(shown.body, "new body");
/// assert_eq!(canonical.title, "a");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay<T: Entity> {
    edits: BTreeMap<u64, T::Patch>,
}

impl<T: Entity> Default for Overlay<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Overlay<T> {
    /// Creates an empty overlay.
    pub fn new() -> Self {
        Self {
            edits: BTreeMap::new(),
        }
    }

    /// Merges `changes` into the entry for `id`, creating it if absent.
    pub fn edit(&mut self, id: u64, changes: T::Patch) {
        self.edits.entry(id).or_default().merge(changes);
    }

    /// Drops the entry for `id`, returning the discarded changes.
    pub fn revert(&mut self, id: u64) -> Option<T::Patch> {
        self.edits.remove(&id)
    }

    /// Returns the accumulated changes for `id`.
    pub fn get(&self, id: u64) -> Option<&T::Patch> {
        self.edits.get(&id)
    }

    /// Returns `true` if `id` has unsaved changes.
    pub fn is_dirty(&self, id: u64) -> bool {
        self.edits.contains_key(&id)
    }

    /// Returns the display value of `canonical`: the record with its pending
    /// changes applied, or a clone when clean.
    pub fn merged(&self, canonical: &T) -> T {
        match self.edits.get(&canonical.id()) {
            Some(patch) => patch.apply_to(canonical),
            None => canonical.clone(),
        }
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.edits.clear();
    }

    /// Number of dirty ids.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Returns `true` if nothing is dirty.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}
