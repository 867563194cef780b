use std::sync::Arc;

use shared::domain::{Article, ArticleFields};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    error::{ClientError, ClientResult, ValidationError},
    transport::Transport,
};

const SUBMIT_FAILED: &str = "Error submitting article";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub title: String,
    pub description: String,
    pub body: String,
    /// Committed tags: trimmed, no blanks.
    pub tag_list: Vec<String>,
}

impl FormDraft {
    /// Trims the text fields and rejects the first one left empty.
    pub fn validate(&self) -> Result<ArticleFields, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        let body = self.body.trim();
        if body.is_empty() {
            return Err(ValidationError::EmptyBody);
        }

        Ok(ArticleFields {
            title: title.to_string(),
            description: description.to_string(),
            body: body.to_string(),
            tag_list: self.tag_list.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Description,
    Body,
}

/// Fields to overwrite; `None` leaves the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub tag_list: Option<Vec<String>>,
}

impl DraftPatch {
    pub fn field(field: DraftField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            DraftField::Title => Self {
                title: value,
                ..Self::default()
            },
            DraftField::Description => Self {
                description: value,
                ..Self::default()
            },
            DraftField::Body => Self {
                body: value,
                ..Self::default()
            },
        }
    }

    pub fn tags(tag_list: Vec<String>) -> Self {
        Self {
            tag_list: Some(tag_list),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraftState {
    pub draft: FormDraft,
    pub submitting: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftCommand {
    SetFields(DraftPatch),
    Reset,
    Submit {
        draft: FormDraft,
        slug: Option<String>,
    },
}

pub struct FormDraftStore {
    transport: Arc<dyn Transport>,
    state: watch::Sender<FormDraftState>,
}

impl FormDraftStore {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (state, _) = watch::channel(FormDraftState::default());
        Self { transport, state }
    }

    pub fn snapshot(&self) -> FormDraftState {
        self.state.borrow().clone()
    }

    pub fn draft(&self) -> FormDraft {
        self.state.borrow().draft.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormDraftState> {
        self.state.subscribe()
    }

    /// Returns the submitted article for `Submit`, `None` otherwise.
    pub async fn apply(
        &self,
        command: DraftCommand,
        token: Option<&str>,
    ) -> ClientResult<Option<Article>> {
        match command {
            DraftCommand::SetFields(patch) => {
                self.set_fields(patch);
                Ok(None)
            }
            DraftCommand::Reset => {
                self.reset();
                Ok(None)
            }
            DraftCommand::Submit { draft, slug } => self
                .submit(&draft, slug.as_deref(), token)
                .await
                .map(Some),
        }
    }

    pub fn set_fields(&self, patch: DraftPatch) {
        self.state.send_modify(|s| {
            let draft = &mut s.draft;
            if let Some(title) = patch.title {
                draft.title = title;
            }
            if let Some(description) = patch.description {
                draft.description = description;
            }
            if let Some(body) = patch.body {
                draft.body = body;
            }
            if let Some(tag_list) = patch.tag_list {
                draft.tag_list = tag_list;
            }
        });
    }

    pub fn reset(&self) {
        self.state.send_replace(FormDraftState::default());
    }

    /// Validates `draft` and creates (no `slug`) or updates (`slug`) the article.
    ///
    /// Validation failures return before any request and leave the store
    /// untouched. Transport failures are recorded in `error`; the draft itself
    /// is never cleared here so the user can retry.
    pub async fn submit(
        &self,
        draft: &FormDraft,
        slug: Option<&str>,
        token: Option<&str>,
    ) -> ClientResult<Article> {
        let fields = draft.validate()?;

        self.state.send_modify(|s| {
            s.submitting = true;
            s.error = None;
        });

        match self.transport.submit_article(&fields, slug, token).await {
            Ok(article) => {
                info!(slug = %article.slug, updated = slug.is_some(), "article submitted");
                self.state.send_modify(|s| s.submitting = false);
                Ok(article)
            }
            Err(err) => {
                let err = ClientError::from_transport(err, SUBMIT_FAILED);
                warn!(slug = ?slug, "article submission failed: {err}");
                self.state.send_modify(|s| {
                    s.submitting = false;
                    s.error = Some(err.to_string());
                });
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/draft_tests.rs"]
mod tests;
