mod fixture;

pub use fixture::FixtureSource;

use crate::errors::{AppError, AppResult};
use crate::models::{Todo, User};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Read-only access to the remote collections used to seed a fresh cache.
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn fetch_todos(&self) -> AppResult<Vec<Todo>>;
    async fn fetch_users(&self) -> AppResult<Vec<User>>;
}

/// JSON-over-HTTP source. No retries and no request timeout: a failed
/// fetch is reported once and the caller decides what to do.
pub struct HttpSeedSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSeedSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_collection<T: DeserializeOwned>(&self, path: &str) -> AppResult<Vec<T>> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, "fetching remote collection");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Remote(format!("HTTP {} from {}", status, url)));
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|error| AppError::Remote(format!("invalid payload from {}: {}", url, error)))
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch_todos(&self) -> AppResult<Vec<Todo>> {
        self.get_collection("todos").await
    }

    async fn fetch_users(&self) -> AppResult<Vec<User>> {
        self.get_collection("users").await
    }
}
