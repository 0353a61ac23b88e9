//! Entity shapes served by the remote API and their partial edit shapes.
//!
//! All types use the remote's camelCase field names on the wire.

pub mod post;
pub mod task;
pub mod user;

pub use post::{Post, PostPatch};
pub use task::{FilterUpdate, Filters, StatusFilter, Task, TaskPatch};
pub use user::{Address, AddressPatch, Company, Geo, User, UserPatch};
