use super::*;
use crate::fixtures::{at, day, proceeding, writ};
use shared::domain::{ArgumentDetails, ProceedingDetails, WritRef, WritType};

fn ids<'a>(proceedings: impl IntoIterator<Item = &'a Proceeding>) -> Vec<&'a str> {
    proceedings.into_iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn latest_per_writ_picks_highest_sequence() {
    let mut first = proceeding("w1-s1", "W1", 1, Some("2024-01-10"));
    first.created_at = Some(at("2024-01-02T10:00:00Z"));
    let mut third = proceeding("w1-s3", "W1", 3, Some("2024-03-01"));
    third.created_at = Some(at("2024-02-20T10:00:00Z"));
    let other = proceeding("w2-s1", "W2", 1, None);

    let all = vec![third.clone(), other, first];
    let latest = latest_per_writ(&all);
    assert_eq!(ids(latest.iter().copied()), vec!["w1-s3", "w2-s1"]);
}

#[test]
fn latest_per_writ_breaks_sequence_ties_by_creation_time() {
    let mut older = proceeding("older", "W1", 2, None);
    older.created_at = Some(at("2024-02-01T09:00:00Z"));
    let mut newer = proceeding("newer", "W1", 2, None);
    newer.created_at = Some(at("2024-02-01T09:30:00Z"));

    let newer_first = [newer.clone(), older.clone()];
    let latest = latest_per_writ(&newer_first);
    assert_eq!(ids(latest.iter().copied()), vec!["newer"]);
    let older_first = [older, newer];
    let latest = latest_per_writ(&older_first);
    assert_eq!(ids(latest.iter().copied()), vec!["newer"]);
}

#[test]
fn upcoming_hearings_are_sorted_capped_and_flag_the_next_week() {
    let now = at("2024-05-01T15:30:00Z");
    let mut all: Vec<Proceeding> = (0..14)
        .map(|offset| {
            let date = (day("2024-05-01") + chrono::Duration::days(13 - offset))
                .format("%Y-%m-%d")
                .to_string();
            proceeding(&format!("p{offset}"), &format!("W{offset}"), 1, Some(&date))
        })
        .collect();
    all.push(proceeding("past", "W-past", 1, Some("2024-04-30")));
    all.push(proceeding("undated", "W-undated", 1, None));

    let latest = latest_per_writ(&all);
    let upcoming = upcoming_hearings(&latest, now);

    assert_eq!(upcoming.len(), UPCOMING_LIMIT);
    assert!(upcoming
        .windows(2)
        .all(|pair| pair[0].hearing_date <= pair[1].hearing_date));
    assert_eq!(upcoming[0].days_until, 0);
    assert!(upcoming.iter().all(|h| h.proceeding.id.as_str() != "past"));

    let seven = upcoming.iter().find(|h| h.days_until == 7).expect("7 days out");
    assert!(seven.urgent);
    let eight = upcoming.iter().find(|h| h.days_until == 8).expect("8 days out");
    assert!(!eight.urgent);
}

#[test]
fn search_by_petitioner_name_is_case_insensitive() {
    let mut kaur = writ("W1", WritType::Bail);
    kaur.petitioner.name = "Harjeet Kaur".into();
    let mut other = writ("W2", WritType::Quashing);
    other.petitioner.name = "Manpreet Gill".into();

    let mut populated = proceeding("p-populated", "W1", 2, Some("2024-02-01"));
    populated.fir = WritRef::Populated(Box::new(kaur.clone()));
    let by_id = proceeding("p-by-id", "W1", 1, Some("2024-01-01"));
    let unrelated = proceeding("p-other", "W2", 1, Some("2024-03-01"));
    let all = vec![by_id, unrelated, populated];

    let filter = ProceedingFilter {
        query: "HARJEET kaur".into(),
        ..ProceedingFilter::default()
    };
    let matched = filter_proceedings(&all, &[kaur, other], &filter);
    assert_eq!(ids(matched), vec!["p-populated", "p-by-id"]);
}

#[test]
fn filters_by_kind_and_writ_and_sorts_newest_first() {
    let mut argument = proceeding("arg", "W1", 2, Some("2024-02-01"));
    argument.details = ProceedingDetails::Argument(ArgumentDetails {
        details: "heard".into(),
        next_date_of_hearing: None,
    });
    let mut undated = proceeding("undated", "W1", 3, None);
    undated.created_at = Some(at("2024-04-01T00:00:00Z"));
    let early = proceeding("early", "W1", 1, Some("2024-01-01"));
    let elsewhere = proceeding("elsewhere", "W2", 1, Some("2024-06-01"));
    let all = vec![early, argument, elsewhere, undated];

    let by_writ = ProceedingFilter {
        writ_id: Some(WritId::new("W1")),
        ..ProceedingFilter::default()
    };
    assert_eq!(
        ids(filter_proceedings(&all, &[], &by_writ)),
        vec!["undated", "arg", "early"]
    );

    let by_kind = ProceedingFilter {
        kind: Some(ProceedingKind::Argument),
        ..ProceedingFilter::default()
    };
    assert_eq!(ids(filter_proceedings(&all, &[], &by_kind)), vec!["arg"]);

    let by_court = ProceedingFilter {
        query: " 12 ".into(),
        ..ProceedingFilter::default()
    };
    assert_eq!(filter_proceedings(&all, &[], &by_court).len(), 4);
}

#[test]
fn timeline_and_next_hearing_follow_sequence() {
    let now = at("2024-02-15T08:00:00Z");
    let all = vec![
        proceeding("s3", "W1", 3, Some("2024-03-01")),
        proceeding("s1", "W1", 1, Some("2024-01-10")),
        proceeding("s2", "W1", 2, Some("2024-02-01")),
        proceeding("other", "W2", 1, Some("2024-01-20")),
    ];

    let timeline = timeline_for_writ(&all, &WritId::new("W1"));
    assert_eq!(ids(timeline), vec!["s1", "s2", "s3"]);
    assert_eq!(
        next_hearing_for_writ(&all, &WritId::new("W1"), now),
        Some(day("2024-03-01"))
    );
    assert_eq!(next_hearing_for_writ(&all, &WritId::new("W2"), now), None);
    assert_eq!(next_hearing_for_writ(&all, &WritId::new("W3"), now), None);
}

#[test]
fn writs_with_drafts_move_from_new_picker_to_resume_list() {
    let writs = vec![writ("W1", WritType::Bail), writ("W2", WritType::Quashing)];
    let drafts: HashSet<WritId> = [WritId::new("W2")].into_iter().collect();

    let fresh: Vec<&str> = new_proceeding_candidates(&writs, &drafts)
        .iter()
        .map(|w| w.id.as_str())
        .collect();
    let resumable: Vec<&str> = resume_draft_candidates(&writs, &drafts)
        .iter()
        .map(|w| w.id.as_str())
        .collect();
    assert_eq!(fresh, vec!["W1"]);
    assert_eq!(resumable, vec!["W2"]);
}
