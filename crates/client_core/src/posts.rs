use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::{domain::Article, protocol::ListArticlesQuery};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    error::{ClientError, ClientResult},
    persistence::Persistence,
    transport::Transport,
};

pub const DEFAULT_PAGE_SIZE: u32 = 5;
const LOAD_FAILED: &str = "Error loading articles";

/// Item offset of a 1-indexed page. Page 0 is treated as page 1.
pub fn page_offset(page: u32, limit: u32) -> u64 {
    u64::from(page.max(1) - 1) * u64::from(limit)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListState {
    /// Server order; kept from the last successful fetch while a new one is in flight or failed.
    pub articles: Vec<Article>,
    pub loading: bool,
    pub error: Option<String>,
    pub articles_count: u64,
    pub offset: u64,
    pub limit: u32,
}

impl PostListState {
    fn new(limit: u32) -> Self {
        Self {
            articles: Vec::new(),
            loading: false,
            error: None,
            articles_count: 0,
            offset: 0,
            limit,
        }
    }

    pub fn current_page(&self) -> u32 {
        let page = self.offset / u64::from(self.limit) + 1;
        u32::try_from(page).unwrap_or(u32::MAX)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            current: self.current_page(),
            total_pages: self.articles_count.div_ceil(u64::from(self.limit)),
            page_size: self.limit,
            total: self.articles_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub total_pages: u64,
    pub page_size: u32,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostListCommand {
    Mount,
    ChangePage(u32),
}

pub struct PostListStore {
    transport: Arc<dyn Transport>,
    persistence: Persistence,
    state: watch::Sender<PostListState>,
    latest_request: AtomicU64,
}

impl PostListStore {
    pub fn new(transport: Arc<dyn Transport>, persistence: Persistence, limit: u32) -> Self {
        let (state, _) = watch::channel(PostListState::new(limit.max(1)));
        Self {
            transport,
            persistence,
            state,
            latest_request: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> PostListState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PostListState> {
        self.state.subscribe()
    }

    pub fn limit(&self) -> u32 {
        self.state.borrow().limit
    }

    pub async fn apply(&self, command: PostListCommand, token: Option<&str>) -> ClientResult<()> {
        match command {
            PostListCommand::Mount => self.mount(token).await,
            PostListCommand::ChangePage(page) => self.change_page(page, token).await,
        }
    }

    /// Restores the persisted page and issues exactly one fetch for it.
    pub async fn mount(&self, token: Option<&str>) -> ClientResult<()> {
        let page = self.persistence.current_page().await.unwrap_or(1);
        let limit = self.limit();
        let offset = page_offset(page, limit);
        debug!(page, offset, "restoring post list page");
        self.state.send_modify(|s| s.offset = offset);
        self.fetch_page(offset, limit, token).await
    }

    /// Moves to `page` and issues exactly one fetch for it.
    pub async fn change_page(&self, page: u32, token: Option<&str>) -> ClientResult<()> {
        let offset = self.set_page(page).await;
        self.fetch_page(offset, self.limit(), token).await
    }

    /// Stores the offset for `page` and persists the page number. Returns the offset.
    pub async fn set_page(&self, page: u32) -> u64 {
        let page = page.max(1);
        let offset = page_offset(page, self.limit());
        self.persistence.store_current_page(page).await;
        self.state.send_modify(|s| s.offset = offset);
        offset
    }

    /// Loads one page. Only the most recently issued request may update the state.
    pub async fn fetch_page(&self, offset: u64, limit: u32, token: Option<&str>) -> ClientResult<()> {
        let request_id = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = self
            .transport
            .get_posts(ListArticlesQuery { offset, limit }, token)
            .await;
        let is_latest = || self.latest_request.load(Ordering::SeqCst) == request_id;

        match result {
            Ok(page) => {
                let applied = self.state.send_if_modified(|s| {
                    if !is_latest() {
                        return false;
                    }
                    s.articles = page.articles;
                    s.articles_count = page.articles_count;
                    s.loading = false;
                    true
                });
                if applied {
                    info!(offset, limit, "loaded article page");
                } else {
                    debug!(offset, request_id, "discarding superseded article page");
                }
                Ok(())
            }
            Err(err) => {
                let err = ClientError::from_transport(err, LOAD_FAILED);
                let applied = self.state.send_if_modified(|s| {
                    if !is_latest() {
                        return false;
                    }
                    s.loading = false;
                    s.error = Some(err.to_string());
                    true
                });
                if applied {
                    warn!(offset, limit, "failed to load article page: {err}");
                    Err(err)
                } else {
                    debug!(offset, request_id, "discarding superseded article page failure");
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/posts_tests.rs"]
mod tests;
