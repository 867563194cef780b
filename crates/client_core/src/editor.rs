use std::sync::Arc;

use shared::domain::Article;

use crate::{
    app_state::AppState,
    article::ArticleCache,
    draft::{DraftField, DraftPatch, FormDraftStore},
    error::{ClientResult, ValidationError},
    session::SessionStore,
    tags::TagEditor,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorView {
    RedirectHome,
    Loading,
    LoadFailed(String),
    Editing,
}

/// One create/edit view. Dropping it resets the draft and clears the cached article.
pub struct ArticleEditor {
    session: Arc<SessionStore>,
    article: Arc<ArticleCache>,
    draft: Arc<FormDraftStore>,
    slug: Option<String>,
    tags: TagEditor,
    validation_error: Option<ValidationError>,
}

impl ArticleEditor {
    /// Opens the editor; with a slug, the existing article is fetched and used as the seed.
    pub async fn open(app: &AppState, slug: Option<String>) -> Self {
        let mut editor = Self {
            session: Arc::clone(&app.session),
            article: Arc::clone(&app.article),
            draft: Arc::clone(&app.draft),
            slug: slug
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            tags: TagEditor::new(),
            validation_error: None,
        };

        editor.reload().await;
        editor
    }

    /// Fetches the article being edited again with the current session token and reseeds from it.
    ///
    /// Without a token nothing is fetched, so call this once the session has
    /// authenticated if the editor was opened before that.
    pub async fn reload(&mut self) -> bool {
        let Some(slug) = self.slug.clone() else {
            return false;
        };
        let token = self.session.token();
        // Failures are kept in the cache entry and surfaced through `view`.
        let _ = self.article.fetch_by_slug(&slug, token.as_deref()).await;
        self.sync_from_cache()
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    pub fn is_edit(&self) -> bool {
        self.slug.is_some()
    }

    pub fn view(&self) -> EditorView {
        let session = self.session.snapshot();
        if session.is_initialized && !session.is_authenticated {
            return EditorView::RedirectHome;
        }
        if self.slug.is_some() {
            let entry = self.article.snapshot();
            if entry.loading {
                return EditorView::Loading;
            }
            if let Some(error) = entry.error {
                return EditorView::LoadFailed(error);
            }
        }
        EditorView::Editing
    }

    /// Seeds from the cached article, if there is one.
    pub fn sync_from_cache(&mut self) -> bool {
        match self.article.snapshot().data {
            Some(article) => {
                self.seed_from(&article);
                true
            }
            None => false,
        }
    }

    /// Copies `article` into the draft store and rebuilds the tag list.
    pub fn seed_from(&mut self, article: &Article) {
        let committed: Vec<String> = article
            .tag_list
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();

        self.draft.set_fields(DraftPatch {
            title: Some(article.title.trim().to_string()),
            description: Some(article.description.trim().to_string()),
            body: Some(article.body.trim().to_string()),
            tag_list: Some(committed),
        });
        self.tags = TagEditor::seeded(article.tag_list.iter().cloned());
    }

    pub fn set_field(&self, field: DraftField, value: impl Into<String>) {
        self.draft.set_fields(DraftPatch::field(field, value));
    }

    pub fn tags(&self) -> &TagEditor {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut TagEditor {
        &mut self.tags
    }

    pub fn validation_error(&self) -> Option<ValidationError> {
        self.validation_error
    }

    /// Validates, commits the tag list into the draft and submits it.
    ///
    /// On success the caller navigates away; on failure everything typed so far
    /// stays in place.
    pub async fn submit(&mut self) -> ClientResult<Article> {
        self.validation_error = None;

        let mut draft = self.draft.draft();
        if let Err(err) = draft.validate() {
            self.validation_error = Some(err);
            return Err(err.into());
        }

        let committed = self.tags.committed();
        self.draft.set_fields(DraftPatch::tags(committed.clone()));
        draft.tag_list = committed;

        let token = self.session.token();
        self.draft
            .submit(&draft, self.slug.as_deref(), token.as_deref())
            .await
    }
}

impl Drop for ArticleEditor {
    fn drop(&mut self) {
        self.draft.reset();
        self.article.clear();
    }
}

#[cfg(test)]
#[path = "tests/editor_tests.rs"]
mod tests;
