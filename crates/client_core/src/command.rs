use shared::domain::Article;

use crate::{
    article::ArticleCommand, draft::DraftCommand, posts::PostListCommand,
    session::SessionCommand,
};

#[derive(Debug, Clone)]
pub enum Command {
    Session(SessionCommand),
    PostList(PostListCommand),
    Article(ArticleCommand),
    Draft(DraftCommand),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Session(SessionCommand::Bootstrap) => "session.bootstrap",
            Command::Session(SessionCommand::Login(_)) => "session.login",
            Command::Session(SessionCommand::Register(_)) => "session.register",
            Command::Session(SessionCommand::UpdateProfile(_)) => "session.update_profile",
            Command::Session(SessionCommand::Logout) => "session.logout",
            Command::PostList(PostListCommand::Mount) => "posts.mount",
            Command::PostList(PostListCommand::ChangePage(_)) => "posts.change_page",
            Command::Article(ArticleCommand::FetchBySlug(_)) => "article.fetch_by_slug",
            Command::Article(ArticleCommand::Clear) => "article.clear",
            Command::Draft(DraftCommand::SetFields(_)) => "draft.set_fields",
            Command::Draft(DraftCommand::Reset) => "draft.reset",
            Command::Draft(DraftCommand::Submit { .. }) => "draft.submit",
        }
    }
}

impl From<SessionCommand> for Command {
    fn from(value: SessionCommand) -> Self {
        Command::Session(value)
    }
}

impl From<PostListCommand> for Command {
    fn from(value: PostListCommand) -> Self {
        Command::PostList(value)
    }
}

impl From<ArticleCommand> for Command {
    fn from(value: ArticleCommand) -> Self {
        Command::Article(value)
    }
}

impl From<DraftCommand> for Command {
    fn from(value: DraftCommand) -> Self {
        Command::Draft(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Submitted(Article),
}
