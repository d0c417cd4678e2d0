use std::{collections::HashMap, sync::Mutex};

use super::*;
use crate::{
    derive::ProceedingFilter,
    fixtures::{at, day, proceeding, writ, FakeApi},
};
use shared::domain::{ProceedingKind, WritType};

fn seeded() -> FakeApi {
    let mut draft = proceeding("draft-w2", "W2", 3, Some("2024-06-10"));
    draft.draft = true;
    let mut drafts = HashMap::new();
    drafts.insert(WritId::new("W2"), Ok(draft));
    drafts.insert(WritId::new("W3"), Err("lookup exploded".to_string()));

    FakeApi {
        writs: vec![
            writ("W1", WritType::Quashing),
            writ("W2", WritType::Bail),
            writ("W3", WritType::Direction),
        ],
        proceedings: vec![
            proceeding("p1", "W1", 1, Some("2024-05-02")),
            proceeding("p2", "W1", 2, Some("2024-05-20")),
            proceeding("p3", "W2", 1, Some("2024-05-05")),
        ],
        drafts: Mutex::new(drafts),
        ..FakeApi::default()
    }
}

fn ready_form(writ_id: &str) -> ProceedingForm {
    let mut form = ProceedingForm::for_writ(&writ(writ_id, WritType::Quashing));
    form.set_kind(ProceedingKind::AnyOther);
    form.hearing.date_of_hearing = Some(day("2024-06-01"));
    form.any_other.details = "Adjourned".into();
    form
}

#[tokio::test]
async fn refresh_publishes_writs_with_their_draft_flags() {
    let api = Arc::new(seeded());
    let mut board = CaseBoard::new(api.clone());

    board.refresh_writs().await.expect("refresh");

    assert_eq!(board.writs().len(), 3);
    assert!(board.drafts().contains(&WritId::new("W2")));
    assert!(!board.drafts().contains(&WritId::new("W3")));
    let resumable: Vec<&str> = board
        .resume_draft_writs()
        .iter()
        .map(|writ| writ.id.as_str())
        .collect();
    assert_eq!(resumable, vec!["W2"]);
    let startable: Vec<&str> = board
        .new_proceeding_writs()
        .iter()
        .map(|writ| writ.id.as_str())
        .collect();
    assert_eq!(startable, vec!["W1", "W3"]);
}

#[tokio::test]
async fn failed_refresh_keeps_what_is_displayed() {
    let api = Arc::new(seeded());
    let mut board = CaseBoard::new(api.clone());
    board.refresh_writs().await.expect("first refresh");
    board.refresh_proceedings().await.expect("first refresh");

    api.set_fail_listing(true);
    assert!(board.refresh_writs().await.is_err());
    assert!(board.refresh_proceedings().await.is_err());

    assert_eq!(board.writs().len(), 3);
    assert_eq!(board.proceedings().len(), 3);
    assert!(board
        .last_error()
        .is_some_and(|message| message.contains("connection refused")));

    api.set_fail_listing(false);
    board.refresh_writs().await.expect("recovered");
    assert!(board.last_error().is_none());
}

#[tokio::test]
async fn derived_views_follow_the_latest_proceeding() {
    let api = Arc::new(seeded());
    let mut board = CaseBoard::new(api.clone());
    board.refresh_writs().await.expect("writs");
    board.refresh_proceedings().await.expect("proceedings");

    let latest: Vec<&str> = board.latest().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(latest, vec!["p2", "p3"]);

    let upcoming = board.upcoming(at("2024-05-01T09:00:00Z"));
    let ids: Vec<&str> = upcoming.iter().map(|h| h.proceeding.id.as_str()).collect();
    assert_eq!(ids, vec!["p3", "p2"]);
    assert!(upcoming[0].urgent);
    assert!(!upcoming[1].urgent);

    let timeline: Vec<&str> = board
        .timeline(&WritId::new("W1"))
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(timeline, vec!["p1", "p2"]);

    let filter = ProceedingFilter {
        query: "petitioner w2".into(),
        ..ProceedingFilter::default()
    };
    let listed: Vec<&str> = board.listing(&filter).iter().map(|p| p.id.as_str()).collect();
    assert_eq!(listed, vec!["p3"]);

    assert_eq!(board.dashboard().total, 3);
}

#[tokio::test]
async fn writ_scoped_submit_prepends_and_keeps_the_writ() {
    let api = Arc::new(seeded());
    let mut board = CaseBoard::new(api.clone());
    board.refresh_proceedings().await.expect("proceedings");

    let mut form = ready_form("W1");
    let created = board
        .submit_proceeding(&mut form, FormScope::Writ)
        .await
        .expect("submit");
    assert_eq!(created.id.as_str(), "p-created");

    assert_eq!(board.proceedings()[0].id.as_str(), "p-created");
    assert_eq!(board.proceedings().len(), 4);
    assert_eq!(form.selected_writ(), Some(&WritId::new("W1")));
    assert_eq!(form.kind(), None);
    assert_eq!(api.created.lock().expect("created").len(), 1);
}

#[tokio::test]
async fn global_submit_clears_the_writ() {
    let api = Arc::new(seeded());
    let mut board = CaseBoard::new(api.clone());

    let mut form = ready_form("W3");
    board
        .submit_proceeding(&mut form, FormScope::Global)
        .await
        .expect("submit");
    assert!(form.selected_writ().is_none());
}

#[tokio::test]
async fn saving_and_finishing_a_draft_updates_the_draft_set() {
    let api = Arc::new(seeded());
    let mut board = CaseBoard::new(api.clone());
    board.refresh_writs().await.expect("writs");

    let mut form = ready_form("W1");
    form.save_as_draft = true;
    board
        .submit_proceeding(&mut form, FormScope::Writ)
        .await
        .expect("draft");
    assert!(board.drafts().contains(&WritId::new("W1")));

    let mut existing = proceeding("draft-w2", "W2", 3, Some("2024-06-10"));
    existing.draft = true;
    let mut resumed = ProceedingForm::resume(&writ("W2", WritType::Bail), &existing);
    resumed.save_as_draft = false;
    board
        .submit_proceeding(&mut resumed, FormScope::Writ)
        .await
        .expect("final");
    assert!(!board.drafts().contains(&WritId::new("W2")));
}

#[tokio::test]
async fn rejected_submit_preserves_the_form_and_reports_the_message() {
    let api = Arc::new(FakeApi {
        reject_create: Some("Hearing date clashes with an existing entry".into()),
        ..seeded()
    });
    let mut board = CaseBoard::new(api.clone());

    let mut form = ready_form("W1");
    let before = form.clone();
    let err = board
        .submit_proceeding(&mut form, FormScope::Global)
        .await
        .expect_err("rejected");

    assert!(matches!(err, SubmitError::Remote(ClientError::Rejected { status: 409, .. })));
    assert_eq!(form, before);
    assert_eq!(
        board.last_error(),
        Some("Hearing date clashes with an existing entry")
    );
    assert!(board.proceedings().is_empty());
}

#[tokio::test]
async fn incomplete_form_never_reaches_the_service() {
    let api = Arc::new(seeded());
    let mut board = CaseBoard::new(api.clone());

    let mut form = ProceedingForm::new();
    let err = board
        .submit_proceeding(&mut form, FormScope::Global)
        .await
        .expect_err("invalid");
    assert!(matches!(err, SubmitError::Invalid(_)));
    assert!(api.created.lock().expect("created").is_empty());
}

#[tokio::test]
async fn second_draft_for_a_writ_is_refused() {
    let api = Arc::new(seeded());
    let mut board = CaseBoard::new(api.clone());
    board.refresh_writs().await.expect("writs");

    let mut form = ready_form("W2");
    form.save_as_draft = true;
    let before = form.clone();
    let err = board
        .submit_proceeding(&mut form, FormScope::Writ)
        .await
        .expect_err("W2 already has a draft");

    assert!(matches!(err, SubmitError::DraftExists { ref writ_id } if writ_id.as_str() == "W2"));
    assert_eq!(form, before);
    assert!(api.created.lock().expect("created").is_empty());
}

#[tokio::test]
async fn finishing_a_resumed_draft_retires_it_everywhere() {
    let mut existing = proceeding("draft-w2", "W2", 3, Some("2024-06-10"));
    existing.draft = true;
    let mut api = seeded();
    api.proceedings.push(existing.clone());
    let api = Arc::new(api);
    let mut board = CaseBoard::new(api.clone());
    board.refresh_writs().await.expect("writs");
    board.refresh_proceedings().await.expect("proceedings");
    assert!(board.proceedings().iter().any(|p| p.id == existing.id));

    let mut form = ProceedingForm::resume(&writ("W2", WritType::Bail), &existing);
    form.save_as_draft = false;
    board
        .submit_proceeding(&mut form, FormScope::Writ)
        .await
        .expect("final");

    let sent = api.created.lock().expect("created")[0].0.clone();
    assert_eq!(sent.draft_id, Some(existing.id.clone()));
    assert!(!sent.draft);
    assert!(!board.proceedings().iter().any(|p| p.id == existing.id));
    assert_eq!(board.proceedings()[0].id.as_str(), "p-created");

    board.refresh_writs().await.expect("refresh");
    assert!(board.resume_draft_writs().is_empty());
}

#[tokio::test]
async fn loading_one_draft_tolerates_lookup_failures() {
    let api = Arc::new(seeded());
    let mut board = CaseBoard::new(api.clone());

    let draft = board.load_draft(&WritId::new("W2")).await;
    assert_eq!(draft.map(|d| d.id.to_string()), Some("draft-w2".to_string()));
    assert!(board.drafts().contains(&WritId::new("W2")));

    assert!(board.load_draft(&WritId::new("W3")).await.is_none());
    assert!(!board.drafts().contains(&WritId::new("W3")));

    let mut form = ready_form("W2");
    form.save_as_draft = true;
    assert!(matches!(
        board.submit_proceeding(&mut form, FormScope::Writ).await,
        Err(SubmitError::DraftExists { .. })
    ));
}
