//! Post records and their partial edit shape.

use serde::{Deserialize, Serialize};

use super::user::{merge_slot, pick};
use crate::overlay::{Entity, Patch};

/// A post as served by `GET /posts?userId={id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Author.
    pub user_id: u64,
    /// Unique id.
    pub id: u64,
    /// Title text.
    pub title: String,
    /// Body text.
    pub body: String,
}

impl Entity for Post {
    type Patch = PostPatch;

    fn id(&self) -> u64 {
        self.id
    }
}

/// Pending changes to a [`Post`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl PostPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a single-field patch from a form field name; `None` for
    /// fields that are not editable.
    pub fn from_field(field: &str, value: impl Into<String>) -> Option<Self> {
        match field {
            "title" => Some(Self::new().title(value)),
            "body" => Some(Self::new().body(value)),
            _ => None,
        }
    }

    pub fn title(mut self, value: impl Into<String>) -> Self {
        self.title = Some(value.into());
        self
    }

    pub fn body(mut self, value: impl Into<String>) -> Self {
        self.body = Some(value.into());
        self
    }
}

impl Patch for PostPatch {
    type Target = Post;

    fn merge(&mut self, later: Self) {
        merge_slot(&mut self.title, later.title);
        merge_slot(&mut self.body, later.body);
    }

    fn apply_to(&self, base: &Post) -> Post {
        Post {
            user_id: base.user_id,
            id: base.id,
            title: pick(&self.title, &base.title),
            body: pick(&self.body, &base.body),
        }
    }
}
