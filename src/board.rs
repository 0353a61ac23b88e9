//! The composition root: one registry and one API client shared by the three
//! entity stores.

use std::sync::Arc;

use crate::api::Api;
use crate::config::BoardConfig;
use crate::registry::InFlightRegistry;
use crate::store::{PostsStore, TasksStore, UsersStore};
use crate::view;

/// A configured set of stores.
///
/// Boards are explicit values: create as many as needed (one per test, for
/// example). Cloning shares the stores.
///
/// # Examples
///
/// ```no_run
/// use userboard::{Board, BoardConfig};
///
/// # async fn example() -> userboard::Result<()> {
/// let board = Board::from_config(BoardConfig::from_env())?;
///
/// board.users().fetch_users().settled().await;
/// board.tasks().fetch_tasks().settled().await;
///
/// for task in board.tasks().paginated_tasks() {
///     let owner = board.task_owner_name(task.user_id).unwrap_or_default();
///     println!("[{}] {} ({owner})", if task.completed { "x" } else { " " }, task.title);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Board {
    config: BoardConfig,
    registry: Arc<InFlightRegistry>,
    users: UsersStore,
    tasks: TasksStore,
    posts: PostsStore,
}

impl Board {
    /// Builds a board over `api` with the default configuration.
    pub fn new(api: Arc<dyn Api>) -> Self {
        Self::with_config(api, BoardConfig::default())
    }

    /// Builds a board over `api`, taking the page size from `config`.
    pub fn with_config(api: Arc<dyn Api>, config: BoardConfig) -> Self {
        let registry = Arc::new(InFlightRegistry::new());
        Self {
            users: UsersStore::new(Arc::clone(&registry), Arc::clone(&api)),
            tasks: TasksStore::new(Arc::clone(&registry), Arc::clone(&api), config.page_size),
            posts: PostsStore::new(Arc::clone(&registry), api),
            registry,
            config,
        }
    }

    /// Validates `config` and builds a board talking HTTP to its base URL.
    #[cfg(feature = "http-client")]
    pub fn from_config(config: BoardConfig) -> crate::Result<Self> {
        config.validate()?;
        let api = crate::api::HttpApi::new(&config)?;
        tracing::info!(base_url = %api.base_url(), page_size = config.page_size, "board configured");
        Ok(Self::with_config(Arc::new(api), config))
    }

    /// The users store.
    pub fn users(&self) -> &UsersStore {
        &self.users
    }

    /// The tasks store.
    pub fn tasks(&self) -> &TasksStore {
        &self.tasks
    }

    /// The posts store.
    pub fn posts(&self) -> &PostsStore {
        &self.posts
    }

    /// The registry shared by every store.
    pub fn registry(&self) -> &Arc<InFlightRegistry> {
        &self.registry
    }

    /// The configuration this board was built with.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Name of the owner of a task, if that user is loaded.
    pub fn task_owner_name(&self, user_id: u64) -> Option<String> {
        let users = self.users.users();
        view::owner_name(&users, user_id).map(str::to_owned)
    }
}
