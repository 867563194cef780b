use std::sync::Arc;

use storage::KeyValueStore;
use tracing::debug;

use crate::{
    article::ArticleCache,
    bootstrap::SessionBootstrap,
    command::{Command, Outcome},
    draft::FormDraftStore,
    error::ClientResult,
    persistence::Persistence,
    posts::PostListStore,
    session::SessionStore,
    transport::Transport,
};

/// Every client-side store, constructed once at process start and shared by reference.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionStore>,
    pub posts: Arc<PostListStore>,
    pub article: Arc<ArticleCache>,
    pub draft: Arc<FormDraftStore>,
    pub bootstrap: Arc<SessionBootstrap>,
}

impl AppState {
    pub fn new(
        transport: Arc<dyn Transport>,
        storage: Arc<dyn KeyValueStore>,
        page_size: u32,
    ) -> Self {
        let persistence = Persistence::new(storage);
        let session = Arc::new(SessionStore::new(
            Arc::clone(&transport),
            persistence.clone(),
        ));
        Self {
            posts: Arc::new(PostListStore::new(
                Arc::clone(&transport),
                persistence,
                page_size,
            )),
            article: Arc::new(ArticleCache::new(Arc::clone(&transport))),
            draft: Arc::new(FormDraftStore::new(transport)),
            bootstrap: Arc::new(SessionBootstrap::new(Arc::clone(&session))),
            session,
        }
    }

    pub async fn dispatch(&self, command: Command) -> ClientResult<Outcome> {
        debug!(command = command.name(), "dispatching command");
        let token = self.session.token();
        match command {
            Command::Session(command) => {
                self.session.apply(command).await?;
                Ok(Outcome::Applied)
            }
            Command::PostList(command) => {
                self.posts.apply(command, token.as_deref()).await?;
                Ok(Outcome::Applied)
            }
            Command::Article(command) => {
                self.article.apply(command, token.as_deref()).await?;
                Ok(Outcome::Applied)
            }
            Command::Draft(command) => Ok(match self.draft.apply(command, token.as_deref()).await? {
                Some(article) => Outcome::Submitted(article),
                None => Outcome::Applied,
            }),
        }
    }
}

#[cfg(test)]
#[path = "tests/app_state_tests.rs"]
mod tests;
