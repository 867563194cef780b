use std::sync::Arc;

use storage::KeyValueStore;
use tracing::warn;

pub const TOKEN_KEY: &str = "token";
pub const CURRENT_PAGE_KEY: &str = "currentPage";

#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY)
            .await
            .filter(|token| !token.trim().is_empty())
    }

    pub async fn store_token(&self, token: &str) {
        self.write(TOKEN_KEY, token).await;
    }

    pub async fn clear_token(&self) {
        if let Err(err) = self.store.remove(TOKEN_KEY).await {
            warn!("failed to clear persisted token: {err:#}");
        }
    }

    /// Last viewed page, 1-indexed. Missing, malformed and non-positive values read as `None`.
    pub async fn current_page(&self) -> Option<u32> {
        self.read(CURRENT_PAGE_KEY)
            .await
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|page| *page > 0)
    }

    pub async fn store_current_page(&self, page: u32) {
        self.write(CURRENT_PAGE_KEY, &page.to_string()).await;
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key, "failed to read persisted value: {err:#}");
                None
            }
        }
    }

    async fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value).await {
            warn!(key, "failed to persist value: {err:#}");
        }
    }
}

#[cfg(test)]
#[path = "tests/persistence_tests.rs"]
mod tests;
