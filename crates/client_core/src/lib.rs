pub mod app_state;
pub mod article;
pub mod bootstrap;
pub mod command;
pub mod draft;
pub mod editor;
pub mod error;
pub mod persistence;
pub mod posts;
pub mod session;
pub mod tags;
pub mod transport;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

pub use app_state::AppState;
pub use article::{ArticleCache, ArticleCacheEntry, ArticleCommand};
pub use bootstrap::{GateView, SessionBootstrap};
pub use command::{Command, Outcome};
pub use draft::{DraftCommand, DraftField, DraftPatch, FormDraft, FormDraftState, FormDraftStore};
pub use editor::{ArticleEditor, EditorView};
pub use error::{ClientError, ClientResult, ValidationError};
pub use persistence::Persistence;
pub use posts::{Pagination, PostListCommand, PostListState, PostListStore, DEFAULT_PAGE_SIZE};
pub use session::{SessionCommand, SessionPhase, SessionState, SessionStore};
pub use tags::{TagDraftEntry, TagEditor, TagId};
pub use transport::{HttpTransport, Transport, TransportError, TransportResult};
