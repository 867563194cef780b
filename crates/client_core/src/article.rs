use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::domain::Article;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    error::{ClientError, ClientResult},
    transport::Transport,
};

const LOAD_FAILED: &str = "Error loading article";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleCacheEntry {
    pub data: Option<Article>,
    pub loading: bool,
    pub error: Option<String>,
    pub deleting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleCommand {
    FetchBySlug(String),
    Clear,
}

pub struct ArticleCache {
    transport: Arc<dyn Transport>,
    state: watch::Sender<ArticleCacheEntry>,
    latest_request: AtomicU64,
}

impl ArticleCache {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (state, _) = watch::channel(ArticleCacheEntry::default());
        Self {
            transport,
            state,
            latest_request: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> ArticleCacheEntry {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ArticleCacheEntry> {
        self.state.subscribe()
    }

    pub async fn apply(&self, command: ArticleCommand, token: Option<&str>) -> ClientResult<()> {
        match command {
            ArticleCommand::FetchBySlug(slug) => self.fetch_by_slug(&slug, token).await.map(|_| ()),
            ArticleCommand::Clear => {
                self.clear();
                Ok(())
            }
        }
    }

    /// Fetches `slug` into the cache.
    ///
    /// Nothing is requested unless both `slug` and `token` are non-empty; that
    /// case returns `Ok(None)`, as does a response superseded by a later fetch or
    /// a [`clear`](Self::clear).
    pub async fn fetch_by_slug(
        &self,
        slug: &str,
        token: Option<&str>,
    ) -> ClientResult<Option<Article>> {
        let slug = slug.trim();
        let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
            debug!(slug, "skipping article fetch without a session token");
            return Ok(None);
        };
        if slug.is_empty() {
            debug!("skipping article fetch without a slug");
            return Ok(None);
        }

        let request_id = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = self.transport.get_article_by_slug(slug, token).await;
        let is_latest = || self.latest_request.load(Ordering::SeqCst) == request_id;

        match result {
            Ok(article) => {
                let applied = self.state.send_if_modified(|s| {
                    if !is_latest() {
                        return false;
                    }
                    s.loading = false;
                    s.data = Some(article.clone());
                    true
                });
                if !applied {
                    debug!(slug, "discarding superseded article response");
                    return Ok(None);
                }
                info!(slug, "article loaded");
                Ok(Some(article))
            }
            Err(err) => {
                let err = ClientError::from_transport(err, LOAD_FAILED);
                let applied = self.state.send_if_modified(|s| {
                    if !is_latest() {
                        return false;
                    }
                    s.loading = false;
                    s.data = None;
                    s.error = Some(err.to_string());
                    true
                });
                if applied {
                    warn!(slug, "failed to load article: {err}");
                    Err(err)
                } else {
                    debug!(slug, "discarding superseded article failure");
                    Ok(None)
                }
            }
        }
    }

    /// Empties the cache and invalidates any fetch still in flight.
    pub fn clear(&self) {
        self.latest_request.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(ArticleCacheEntry::default());
    }
}

#[cfg(test)]
#[path = "tests/article_tests.rs"]
mod tests;
