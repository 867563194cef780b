use super::*;
use crate::test_support::{article, harness, network_error, Call, FakeTransport};

fn filled() -> FormDraft {
    FormDraft {
        title: "  Title ".into(),
        description: " Short ".into(),
        body: "\nBody text\n".into(),
        tag_list: vec!["rust".into(), "rust".into()],
    }
}

#[test]
fn validate_trims_and_passes_tags_through() {
    let fields = filled().validate().expect("valid");
    assert_eq!(fields.title, "Title");
    assert_eq!(fields.description, "Short");
    assert_eq!(fields.body, "Body text");
    assert_eq!(fields.tag_list, vec!["rust".to_string(), "rust".to_string()]);
}

#[test]
fn each_blank_field_has_its_own_message() {
    let cases = [
        (
            FormDraft {
                title: " ".into(),
                ..filled()
            },
            ValidationError::EmptyTitle,
        ),
        (
            FormDraft {
                description: "\t".into(),
                ..filled()
            },
            ValidationError::EmptyDescription,
        ),
        (
            FormDraft {
                body: String::new(),
                ..filled()
            },
            ValidationError::EmptyBody,
        ),
    ];

    let mut messages = Vec::new();
    for (draft, expected) in cases {
        assert_eq!(draft.validate(), Err(expected));
        messages.push(expected.to_string());
    }
    messages.dedup();
    assert_eq!(messages.len(), 3);
}

#[test]
fn set_fields_merges_only_given_fields() {
    let store = FormDraftStore::new(std::sync::Arc::new(FakeTransport::new()));
    store.set_fields(DraftPatch::field(DraftField::Title, "A"));
    store.set_fields(DraftPatch::field(DraftField::Body, "C"));
    store.set_fields(DraftPatch::tags(vec!["x".into()]));

    let draft = store.draft();
    assert_eq!(draft.title, "A");
    assert_eq!(draft.description, "");
    assert_eq!(draft.body, "C");
    assert_eq!(draft.tag_list, vec!["x".to_string()]);
}

#[test]
fn reset_empties_everything() {
    let store = FormDraftStore::new(std::sync::Arc::new(FakeTransport::new()));
    store.set_fields(DraftPatch::field(DraftField::Title, "A"));

    store.reset();

    assert_eq!(store.snapshot(), FormDraftState::default());
}

#[tokio::test]
async fn blank_fields_never_reach_the_network() {
    let h = harness(FakeTransport::new(), &[], 5);
    for draft in [
        FormDraft {
            title: " ".into(),
            ..filled()
        },
        FormDraft {
            description: " ".into(),
            ..filled()
        },
        FormDraft {
            body: " ".into(),
            ..filled()
        },
    ] {
        let err = h
            .app
            .draft
            .submit(&draft, None, Some("tok"))
            .await
            .expect_err("invalid");
        assert!(matches!(err, ClientError::Validation(_)));
    }

    assert!(h.transport.calls().await.is_empty());
    assert_eq!(h.app.draft.snapshot().error, None);
}

#[tokio::test]
async fn submit_without_slug_creates() {
    let h = harness(FakeTransport::new(), &[], 5);

    h.app
        .draft
        .submit(&filled(), None, Some("tok"))
        .await
        .expect("submit");

    assert_eq!(
        h.transport.calls().await,
        vec![Call::Submit {
            fields: filled().validate().expect("valid"),
            slug: None,
            token: Some("tok".into()),
        }]
    );
    assert!(!h.app.draft.snapshot().submitting);
}

#[tokio::test]
async fn submit_with_slug_updates() {
    let transport = FakeTransport::new().with_submit(Ok(article("old-post", "T", "D", "B", &[])));
    let h = harness(transport, &[], 5);

    let saved = h
        .app
        .draft
        .submit(&filled(), Some("old-post"), Some("tok"))
        .await
        .expect("submit");

    assert_eq!(saved.slug, "old-post");
    assert!(matches!(
        h.transport.calls().await.as_slice(),
        [Call::Submit { slug: Some(slug), .. }] if slug == "old-post"
    ));
}

#[tokio::test]
async fn failed_submit_keeps_draft_for_retry() {
    let transport = FakeTransport::new().with_submit(Err(network_error("title has already been taken")));
    let h = harness(transport, &[], 5);
    h.app.draft.set_fields(DraftPatch {
        title: Some("Title".into()),
        description: Some("Short".into()),
        body: Some("Body".into()),
        tag_list: None,
    });
    let draft = h.app.draft.draft();

    let err = h
        .app
        .draft
        .submit(&draft, None, Some("tok"))
        .await
        .expect_err("server rejects");

    assert_eq!(err.to_string(), "title has already been taken");
    let state = h.app.draft.snapshot();
    assert_eq!(state.draft, draft);
    assert_eq!(state.error.as_deref(), Some("title has already been taken"));
    assert!(!state.submitting);
}
