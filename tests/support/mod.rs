//! Shared fixtures: an in-memory [`Api`] with call counters, scriptable
//! failures, and an optional gate that holds calls until released.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use userboard::{Api, Error, Post, Result, Task, User};

pub const LIST_USERS: &str = "list_users";
pub const GET_USER: &str = "get_user";
pub const UPDATE_USER: &str = "update_user";
pub const LIST_USER_POSTS: &str = "list_user_posts";
pub const UPDATE_POST: &str = "update_post";
pub const DELETE_POST: &str = "delete_post";
pub const LIST_TASKS: &str = "list_tasks";

#[derive(Default)]
pub struct FakeApi {
    users: Mutex<Vec<User>>,
    posts: Mutex<Vec<Post>>,
    tasks: Mutex<Vec<Task>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failures: Mutex<HashMap<&'static str, Error>>,
    user_update_response: Mutex<Option<User>>,
    gate: Option<Semaphore>,
    gated_methods: Vec<&'static str>,
}

impl FakeApi {
    /// Answers immediately from the standard fixtures.
    pub fn new() -> Self {
        Self {
            users: Mutex::new(users()),
            posts: Mutex::new(posts()),
            tasks: Mutex::new(tasks(25)),
            ..Self::default()
        }
    }

    /// Like [`new`](Self::new), but every call waits for [`release`](Self::release).
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    /// Like [`gated`](Self::gated), but only calls to `methods` wait.
    pub fn gated_on(methods: &[&'static str]) -> Self {
        Self {
            gated_methods: methods.to_vec(),
            ..Self::gated()
        }
    }

    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        *self.tasks.lock() = tasks;
        self
    }

    /// Lets `n` held calls proceed.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Makes every call to `method` fail with `err` until [`recover`](Self::recover).
    pub fn fail(&self, method: &'static str, err: Error) {
        self.failures.lock().insert(method, err);
    }

    pub fn recover(&self, method: &'static str) {
        self.failures.lock().remove(method);
    }

    /// Makes `update_user` answer with `user` instead of echoing the request.
    pub fn respond_to_user_update_with(&self, user: User) {
        *self.user_update_response.lock() = Some(user);
    }

    /// Number of calls made to `method` so far.
    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().get(method).copied().unwrap_or(0)
    }

    async fn enter(&self, method: &'static str) -> Result<()> {
        *self.calls.lock().entry(method).or_insert(0) += 1;
        let held = self.gated_methods.is_empty() || self.gated_methods.contains(&method);
        if let Some(gate) = self.gate.as_ref().filter(|_| held) {
            gate.acquire().await.expect("gate closed").forget();
        }
        match self.failures.lock().get(method) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Api for FakeApi {
    async fn list_users(&self) -> Result<Vec<User>> {
        self.enter(LIST_USERS).await?;
        Ok(self.users.lock().clone())
    }

    async fn get_user(&self, id: u64) -> Result<User> {
        self.enter(GET_USER).await?;
        self.users
            .lock()
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or_else(|| Error::http_status(404))
    }

    async fn update_user(&self, user: &User) -> Result<User> {
        self.enter(UPDATE_USER).await?;
        Ok(self
            .user_update_response
            .lock()
            .clone()
            .unwrap_or_else(|| user.clone()))
    }

    async fn list_user_posts(&self, user_id: u64) -> Result<Vec<Post>> {
        self.enter(LIST_USER_POSTS).await?;
        Ok(self
            .posts
            .lock()
            .iter()
            .filter(|post| post.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_post(&self, post: &Post) -> Result<Post> {
        self.enter(UPDATE_POST).await?;
        Ok(post.clone())
    }

    async fn delete_post(&self, id: u64) -> Result<()> {
        self.enter(DELETE_POST).await?;
        self.posts.lock().retain(|post| post.id != id);
        Ok(())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.enter(LIST_TASKS).await?;
        Ok(self.tasks.lock().clone())
    }
}

pub fn users() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "Leanne Graham".to_string(),
            username: "Bret".to_string(),
            email: "Sincere@april.biz".to_string(),
            phone: "1-770-736-8031 x56442".to_string(),
            website: Some("hildegard.org".to_string()),
            ..User::default()
        },
        User {
            id: 2,
            name: "Ervin Howell".to_string(),
            username: "Antonette".to_string(),
            email: "Shanna@melissa.tv".to_string(),
            phone: "010-692-6593 x09125".to_string(),
            website: Some("anastasia.net".to_string()),
            ..User::default()
        },
    ]
}

pub fn posts() -> Vec<Post> {
    let post = |id: u64, user_id: u64| Post {
        id,
        user_id,
        title: format!("post {id}"),
        body: format!("body of post {id}"),
    };
    vec![post(1, 1), post(2, 1), post(3, 1), post(11, 2), post(12, 2)]
}

/// `n` tasks alternating between users 1 and 2; every third is completed.
pub fn tasks(n: u64) -> Vec<Task> {
    (1..=n)
        .map(|id| Task {
            id,
            user_id: if id % 2 == 1 { 1 } else { 2 },
            title: format!("task {id}"),
            completed: id % 3 == 0,
        })
        .collect()
}

/// Builds a board over `api`, keeping a typed handle to the fake.
pub fn board(api: &Arc<FakeApi>) -> userboard::Board {
    userboard::Board::new(Arc::clone(api) as Arc<dyn Api>)
}

/// Yields until `done` holds, failing after a bounded number of turns.
pub async fn eventually(mut done: impl FnMut() -> bool) {
    for _ in 0..100 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
