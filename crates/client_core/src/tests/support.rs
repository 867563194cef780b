use std::{collections::VecDeque, sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{
    domain::{Article, ArticleFields, LoginCredentials, ProfileUpdate, Registration, UserProfile},
    protocol::{ArticlesPage, ListArticlesQuery},
};
use storage::MemoryStore;
use tokio::sync::Mutex;

use crate::{
    app_state::AppState,
    transport::{Transport, TransportError, TransportResult},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Login { email: String },
    Register { username: String },
    CurrentUser { token: String },
    UpdateUser { token: String },
    Article { slug: String, token: String },
    Submit {
        fields: ArticleFields,
        slug: Option<String>,
        token: Option<String>,
    },
    Posts {
        offset: u64,
        limit: u32,
        token: Option<String>,
    },
}

type ScriptedPage = (Duration, TransportResult<ArticlesPage>);

pub(crate) struct FakeTransport {
    calls: Mutex<Vec<Call>>,
    login: TransportResult<UserProfile>,
    register: TransportResult<UserProfile>,
    current_user: TransportResult<UserProfile>,
    update_user: TransportResult<UserProfile>,
    article: TransportResult<Article>,
    article_delays: Mutex<VecDeque<Duration>>,
    submit: TransportResult<Article>,
    posts: TransportResult<ArticlesPage>,
    scripted_posts: Mutex<VecDeque<ScriptedPage>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            login: Ok(profile("alice", "tok-alice")),
            register: Ok(profile("bob", "tok-bob")),
            current_user: Ok(profile("alice", "tok-alice")),
            update_user: Ok(UserProfile {
                bio: Some("updated bio".into()),
                ..profile("alice", "tok-alice")
            }),
            article: Ok(article("hello", "Hello", "Greeting", "Body", &["intro"])),
            article_delays: Mutex::new(VecDeque::new()),
            submit: Ok(article("hello", "Hello", "Greeting", "Body", &["intro"])),
            posts: Ok(ArticlesPage::default()),
            scripted_posts: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn with_login(mut self, result: TransportResult<UserProfile>) -> Self {
        self.login = result;
        self
    }

    pub(crate) fn with_register(mut self, result: TransportResult<UserProfile>) -> Self {
        self.register = result;
        self
    }

    pub(crate) fn with_current_user(mut self, result: TransportResult<UserProfile>) -> Self {
        self.current_user = result;
        self
    }

    pub(crate) fn with_update_user(mut self, result: TransportResult<UserProfile>) -> Self {
        self.update_user = result;
        self
    }

    pub(crate) fn with_article(mut self, result: TransportResult<Article>) -> Self {
        self.article = result;
        self
    }

    /// Delays applied to successive article fetches, in call order.
    pub(crate) fn with_article_delays(mut self, delays: &[Duration]) -> Self {
        self.article_delays.get_mut().extend(delays.iter().copied());
        self
    }

    pub(crate) fn with_submit(mut self, result: TransportResult<Article>) -> Self {
        self.submit = result;
        self
    }

    pub(crate) fn with_posts(mut self, result: TransportResult<ArticlesPage>) -> Self {
        self.posts = result;
        self
    }

    /// Responses consumed by successive list calls before falling back to `with_posts`.
    pub(crate) fn script_posts(mut self, delay: Duration, result: TransportResult<ArticlesPage>) -> Self {
        self.scripted_posts.get_mut().push_back((delay, result));
        self
    }

    pub(crate) async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: Call) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn login_user(&self, credentials: &LoginCredentials) -> TransportResult<UserProfile> {
        self.record(Call::Login {
            email: credentials.email.clone(),
        })
        .await;
        self.login.clone()
    }

    async fn register_user(&self, registration: &Registration) -> TransportResult<UserProfile> {
        self.record(Call::Register {
            username: registration.username.clone(),
        })
        .await;
        self.register.clone()
    }

    async fn get_current_user(&self, token: &str) -> TransportResult<UserProfile> {
        self.record(Call::CurrentUser {
            token: token.to_string(),
        })
        .await;
        self.current_user.clone()
    }

    async fn update_user(
        &self,
        _fields: &ProfileUpdate,
        token: &str,
    ) -> TransportResult<UserProfile> {
        self.record(Call::UpdateUser {
            token: token.to_string(),
        })
        .await;
        self.update_user.clone()
    }

    async fn get_article_by_slug(&self, slug: &str, token: &str) -> TransportResult<Article> {
        self.record(Call::Article {
            slug: slug.to_string(),
            token: token.to_string(),
        })
        .await;
        let delay = self.article_delays.lock().await.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.article.clone().map(|mut article| {
            article.slug = slug.to_string();
            article
        })
    }

    async fn submit_article(
        &self,
        article: &ArticleFields,
        slug: Option<&str>,
        token: Option<&str>,
    ) -> TransportResult<Article> {
        self.record(Call::Submit {
            fields: article.clone(),
            slug: slug.map(str::to_string),
            token: token.map(str::to_string),
        })
        .await;
        self.submit.clone()
    }

    async fn get_posts(
        &self,
        query: ListArticlesQuery,
        token: Option<&str>,
    ) -> TransportResult<ArticlesPage> {
        self.record(Call::Posts {
            offset: query.offset,
            limit: query.limit,
            token: token.map(str::to_string),
        })
        .await;
        let scripted = self.scripted_posts.lock().await.pop_front();
        match scripted {
            Some((delay, result)) => {
                tokio::time::sleep(delay).await;
                result
            }
            None => self.posts.clone(),
        }
    }
}

pub(crate) fn profile(username: &str, token: &str) -> UserProfile {
    UserProfile {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        bio: None,
        image: None,
        token: token.to_string(),
    }
}

pub(crate) fn article(slug: &str, title: &str, description: &str, body: &str, tags: &[&str]) -> Article {
    Article {
        slug: slug.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        body: body.to_string(),
        tag_list: tags.iter().map(|t| t.to_string()).collect(),
        created_at: None,
        updated_at: None,
        favorited: false,
        favorites_count: 0,
        author: None,
    }
}

pub(crate) fn page_of(count: usize, total: u64) -> ArticlesPage {
    ArticlesPage {
        articles: (0..count)
            .map(|i| article(&format!("post-{i}"), &format!("Post {i}"), "d", "b", &[]))
            .collect(),
        articles_count: total,
    }
}

pub(crate) fn network_error(message: &str) -> TransportError {
    TransportError::new(Some(500), message)
}

pub(crate) struct Harness {
    pub app: AppState,
    pub transport: Arc<FakeTransport>,
    pub storage: Arc<MemoryStore>,
}

pub(crate) fn harness(transport: FakeTransport, entries: &[(&str, &str)], page_size: u32) -> Harness {
    let transport = Arc::new(transport);
    let storage = Arc::new(MemoryStore::with_entries(entries.iter().copied()));
    let app = AppState::new(transport.clone(), storage.clone(), page_size);
    Harness {
        app,
        transport,
        storage,
    }
}
