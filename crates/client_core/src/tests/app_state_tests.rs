use super::*;
use crate::{
    article::ArticleCommand,
    draft::{DraftCommand, FormDraft},
    persistence::{CURRENT_PAGE_KEY, TOKEN_KEY},
    posts::PostListCommand,
    session::SessionCommand,
    test_support::{harness, page_of, Call, FakeTransport},
};
use shared::domain::LoginCredentials;

#[tokio::test]
async fn first_page_of_forty_two_articles_reports_three_pages() {
    let h = harness(FakeTransport::new().with_posts(Ok(page_of(5, 42))), &[], 20);

    h.app
        .dispatch(PostListCommand::Mount.into())
        .await
        .expect("mount");

    let pagination = h.app.posts.snapshot().pagination();
    assert_eq!(pagination.current, 1);
    assert_eq!(pagination.total_pages, 3);
}

#[tokio::test]
async fn dispatch_forwards_session_token_to_post_list() {
    let h = harness(FakeTransport::new(), &[(TOKEN_KEY, "tok-alice"), (CURRENT_PAGE_KEY, "2")], 5);

    h.app
        .dispatch(SessionCommand::Bootstrap.into())
        .await
        .expect("bootstrap");
    h.app
        .dispatch(PostListCommand::Mount.into())
        .await
        .expect("mount");

    assert_eq!(
        h.transport.calls().await.last(),
        Some(&Call::Posts {
            offset: 5,
            limit: 5,
            token: Some("tok-alice".into())
        })
    );
}

#[tokio::test]
async fn dispatch_submit_returns_saved_article() {
    let h = harness(FakeTransport::new(), &[], 5);
    h.app
        .dispatch(
            SessionCommand::Login(LoginCredentials {
                email: "alice@example.com".into(),
                password: "pw".into(),
            })
            .into(),
        )
        .await
        .expect("login");

    let outcome = h
        .app
        .dispatch(
            DraftCommand::Submit {
                draft: FormDraft {
                    title: "T".into(),
                    description: "D".into(),
                    body: "B".into(),
                    tag_list: Vec::new(),
                },
                slug: None,
            }
            .into(),
        )
        .await
        .expect("submit");

    assert!(matches!(outcome, Outcome::Submitted(article) if article.slug == "hello"));
}

#[tokio::test]
async fn dispatch_article_fetch_requires_session() {
    let h = harness(FakeTransport::new(), &[], 5);

    let outcome = h
        .app
        .dispatch(ArticleCommand::FetchBySlug("hello".into()).into())
        .await
        .expect("skip");

    assert_eq!(outcome, Outcome::Applied);
    assert!(h.transport.calls().await.is_empty());
}

#[tokio::test]
async fn logout_command_clears_session() {
    let h = harness(FakeTransport::new(), &[(TOKEN_KEY, "tok-alice")], 5);
    h.app.bootstrap.mount().await;

    h.app
        .dispatch(Command::Session(SessionCommand::Logout))
        .await
        .expect("logout");

    assert!(!h.app.session.snapshot().is_authenticated);
}

#[test]
fn command_names_are_namespaced_by_store() {
    assert_eq!(Command::from(PostListCommand::ChangePage(2)).name(), "posts.change_page");
    assert_eq!(Command::from(DraftCommand::Reset).name(), "draft.reset");
    assert_eq!(Command::from(ArticleCommand::Clear).name(), "article.clear");
}
