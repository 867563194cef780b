use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Article, ArticleFields, LoginCredentials, ProfileUpdate, Registration, UserProfile},
    error::ApiError,
    protocol::{ArticleEnvelope, ArticlesPage, ListArticlesQuery, UserEnvelope},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub type TransportResult<T> = std::result::Result<T, TransportError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or("request failed"))]
pub struct TransportError {
    pub status: Option<u16>,
    pub message: Option<String>,
}

impl TransportError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: Some(StatusCode::UNAUTHORIZED.as_u16()),
            message: None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(StatusCode::UNAUTHORIZED.as_u16())
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            message: Some(err.to_string()),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn login_user(&self, credentials: &LoginCredentials) -> TransportResult<UserProfile>;
    async fn register_user(&self, registration: &Registration) -> TransportResult<UserProfile>;
    async fn get_current_user(&self, token: &str) -> TransportResult<UserProfile>;
    async fn update_user(&self, fields: &ProfileUpdate, token: &str)
        -> TransportResult<UserProfile>;
    async fn get_article_by_slug(&self, slug: &str, token: &str) -> TransportResult<Article>;
    /// Creates the article when `slug` is `None`, otherwise updates it.
    async fn submit_article(
        &self,
        article: &ArticleFields,
        slug: Option<&str>,
        token: Option<&str>,
    ) -> TransportResult<Article>;
    async fn get_posts(
        &self,
        query: ListArticlesQuery,
        token: Option<&str>,
    ) -> TransportResult<ArticlesPage>;
}

pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(&format!("{trimmed}/"))?;
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> TransportResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| TransportError::new(None, format!("invalid endpoint '{path}': {err}")))
    }

    fn article_endpoint(&self, slug: &str) -> TransportResult<Url> {
        let mut url = self.endpoint("articles")?;
        url.path_segments_mut()
            .map_err(|_| TransportError::new(None, "base url cannot carry a path"))?
            .pop_if_empty()
            .push(slug);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> TransportResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .ok()
                .and_then(ApiError::into_message);
            warn!(status = status.as_u16(), "blog api request failed");
            return Err(TransportError {
                status: Some(status.as_u16()),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

fn with_token(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header(AUTHORIZATION, format!("Token {token}")),
        None => request,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn login_user(&self, credentials: &LoginCredentials) -> TransportResult<UserProfile> {
        debug!("POST users/login");
        let body: UserEnvelope<UserProfile> = self
            .send(
                self.http
                    .post(self.endpoint("users/login")?)
                    .json(&UserEnvelope { user: credentials }),
            )
            .await?;
        Ok(body.user)
    }

    async fn register_user(&self, registration: &Registration) -> TransportResult<UserProfile> {
        debug!("POST users");
        let body: UserEnvelope<UserProfile> = self
            .send(
                self.http
                    .post(self.endpoint("users")?)
                    .json(&UserEnvelope { user: registration }),
            )
            .await?;
        Ok(body.user)
    }

    async fn get_current_user(&self, token: &str) -> TransportResult<UserProfile> {
        debug!("GET user");
        let body: UserEnvelope<UserProfile> = self
            .send(with_token(self.http.get(self.endpoint("user")?), Some(token)))
            .await?;
        Ok(body.user)
    }

    async fn update_user(
        &self,
        fields: &ProfileUpdate,
        token: &str,
    ) -> TransportResult<UserProfile> {
        debug!("PUT user");
        let body: UserEnvelope<UserProfile> = self
            .send(
                with_token(self.http.put(self.endpoint("user")?), Some(token))
                    .json(&UserEnvelope { user: fields }),
            )
            .await?;
        Ok(body.user)
    }

    async fn get_article_by_slug(&self, slug: &str, token: &str) -> TransportResult<Article> {
        debug!(slug, "GET article");
        let body: ArticleEnvelope<Article> = self
            .send(with_token(
                self.http.get(self.article_endpoint(slug)?),
                Some(token),
            ))
            .await?;
        Ok(body.article)
    }

    async fn submit_article(
        &self,
        article: &ArticleFields,
        slug: Option<&str>,
        token: Option<&str>,
    ) -> TransportResult<Article> {
        let request = match slug {
            Some(slug) => {
                debug!(slug, "PUT article");
                self.http.put(self.article_endpoint(slug)?)
            }
            None => {
                debug!("POST articles");
                self.http.post(self.endpoint("articles")?)
            }
        };
        let body: ArticleEnvelope<Article> = self
            .send(with_token(request, token).json(&ArticleEnvelope { article }))
            .await?;
        Ok(body.article)
    }

    async fn get_posts(
        &self,
        query: ListArticlesQuery,
        token: Option<&str>,
    ) -> TransportResult<ArticlesPage> {
        debug!(offset = query.offset, limit = query.limit, "GET articles");
        self.send(with_token(
            self.http.get(self.endpoint("articles")?).query(&query),
            token,
        ))
        .await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
