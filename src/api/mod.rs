//! The remote REST API the stores depend on.
//!
//! The core does not own this API; [`Api`] only names the requests and
//! response shapes the stores use. [`HttpApi`] talks to a live
//! JSONPlaceholder-compatible server; tests substitute in-memory
//! implementations.

#[cfg(feature = "http-client")]
mod http;

#[cfg(feature = "http-client")]
pub use http::HttpApi;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Post, Task, User};

/// Remote collaborator for the entity stores.
///
/// Every method maps to a single REST call. Implementations report transport
/// failures and non-success statuses as [`Error`](crate::Error) values whose
/// `Display` form is what the stores surface to users.
#[async_trait]
pub trait Api: Send + Sync {
    /// `GET /users`
    async fn list_users(&self) -> Result<Vec<User>>;

    /// `GET /users/{id}`
    async fn get_user(&self, id: u64) -> Result<User>;

    /// `PUT /users/{id}`, returning the server's representation.
    async fn update_user(&self, user: &User) -> Result<User>;

    /// `GET /posts?userId={user_id}`
    async fn list_user_posts(&self, user_id: u64) -> Result<Vec<Post>>;

    /// `PUT /posts/{id}`, returning the server's representation.
    async fn update_post(&self, post: &Post) -> Result<Post>;

    /// `DELETE /posts/{id}`
    async fn delete_post(&self, id: u64) -> Result<()>;

    /// `GET /todos`
    async fn list_tasks(&self) -> Result<Vec<Task>>;
}
