//! `reqwest`-backed implementation of [`Api`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use super::Api;
use crate::config::BoardConfig;
use crate::error::{Error, Result};
use crate::types::{Post, Task, User};

/// HTTP client for a JSONPlaceholder-compatible REST API.
///
/// # Examples
///
/// ```
/// use userboard::{BoardConfig, HttpApi};
///
/// let api = HttpApi::new(&BoardConfig::new().with_base_url("http://localhost:3000")).unwrap();
/// assert_eq!(api.base_url().as_str(), "http://localhost:3000/");
/// ```
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpApi {
    /// Builds a client from the base URL and timeout in `config`.
    pub fn new(config: &BoardConfig) -> Result<Self> {
        let base_url = config.api_root()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// Wraps an existing client.
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// The API root every endpoint path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    async fn put_json<B, T>(&self, url: Url, body: &B) -> Result<T>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!(%url, "PUT");
        let response = self.client.put(url).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let response = check_status(response)?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::debug!(status = status.as_u16(), url = %response.url(), "non-success response");
        Err(Error::http_status(status.as_u16()))
    }
}

#[async_trait]
impl Api for HttpApi {
    async fn list_users(&self) -> Result<Vec<User>> {
        self.get_json(self.endpoint("users")?).await
    }

    async fn get_user(&self, id: u64) -> Result<User> {
        self.get_json(self.endpoint(&format!("users/{id}"))?).await
    }

    async fn update_user(&self, user: &User) -> Result<User> {
        self.put_json(self.endpoint(&format!("users/{}", user.id))?, user)
            .await
    }

    async fn list_user_posts(&self, user_id: u64) -> Result<Vec<Post>> {
        let mut url = self.endpoint("posts")?;
        url.query_pairs_mut()
            .append_pair("userId", &user_id.to_string());
        self.get_json(url).await
    }

    async fn update_post(&self, post: &Post) -> Result<Post> {
        self.put_json(self.endpoint(&format!("posts/{}", post.id))?, post)
            .await
    }

    async fn delete_post(&self, id: u64) -> Result<()> {
        let url = self.endpoint(&format!("posts/{id}"))?;
        tracing::debug!(%url, "DELETE");
        let response = self.client.delete(url).send().await?;
        check_status(response)?;
        Ok(())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.get_json(self.endpoint("todos")?).await
    }
}
