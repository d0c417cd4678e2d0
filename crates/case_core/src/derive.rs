use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use chrono::{DateTime, Utc};
use shared::domain::{Proceeding, ProceedingKind, Writ, WritId};

pub const UPCOMING_LIMIT: usize = 10;
pub const URGENT_WITHIN_DAYS: i64 = 7;

fn timeline_order(a: &Proceeding, b: &Proceeding) -> Ordering {
    a.sequence
        .cmp(&b.sequence)
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// One representative per writ: the proceeding with the highest sequence,
/// ties broken by the latest `created_at`. Writs keep first-seen order.
pub fn latest_per_writ(proceedings: &[Proceeding]) -> Vec<&Proceeding> {
    let mut slots: HashMap<&WritId, usize> = HashMap::new();
    let mut latest: Vec<&Proceeding> = Vec::new();
    for proceeding in proceedings {
        match slots.get(proceeding.writ_id()) {
            Some(&slot) => {
                if timeline_order(proceeding, latest[slot]) == Ordering::Greater {
                    latest[slot] = proceeding;
                }
            }
            None => {
                slots.insert(proceeding.writ_id(), latest.len());
                latest.push(proceeding);
            }
        }
    }
    latest
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingHearing<'a> {
    pub proceeding: &'a Proceeding,
    pub hearing_date: DateTime<Utc>,
    pub days_until: i64,
    pub urgent: bool,
}

pub fn days_until(date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (date.date_naive() - now.date_naive()).num_days()
}

pub fn upcoming_hearings<'a>(
    latest: &[&'a Proceeding],
    now: DateTime<Utc>,
) -> Vec<UpcomingHearing<'a>> {
    let mut upcoming: Vec<UpcomingHearing<'a>> = latest
        .iter()
        .filter_map(|&proceeding| {
            let hearing_date = proceeding.hearing_date()?;
            let days = days_until(hearing_date, now);
            (days >= 0).then_some(UpcomingHearing {
                proceeding,
                hearing_date,
                days_until: days,
                urgent: days <= URGENT_WITHIN_DAYS,
            })
        })
        .collect();
    upcoming.sort_by_key(|hearing| hearing.hearing_date);
    upcoming.truncate(UPCOMING_LIMIT);
    upcoming
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProceedingFilter {
    pub query: String,
    pub kind: Option<ProceedingKind>,
    pub writ_id: Option<WritId>,
}

impl ProceedingFilter {
    pub fn matches(&self, proceeding: &Proceeding, writ: Option<&Writ>) -> bool {
        if self.kind.is_some_and(|kind| kind != proceeding.kind()) {
            return false;
        }
        if self
            .writ_id
            .as_ref()
            .is_some_and(|id| id != proceeding.writ_id())
        {
            return false;
        }
        let needle = self.query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let hearing = &proceeding.hearing_details;
        let mut haystacks = vec![hearing.judge_name.as_str(), hearing.court_number.as_str()];
        if let Some(summary) = proceeding.summary.as_deref() {
            haystacks.push(summary);
        }
        if let Some(writ) = writ {
            haystacks.push(writ.writ_number.as_str());
            haystacks.push(writ.petitioner.name.as_str());
        }
        haystacks
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

pub fn sort_by_recency(proceedings: &mut [&Proceeding]) {
    proceedings.sort_by(|a, b| {
        let a_key = a.hearing_date().or(a.created_at);
        let b_key = b.hearing_date().or(b.created_at);
        b_key.cmp(&a_key)
    });
}

pub fn filter_proceedings<'a>(
    proceedings: &'a [Proceeding],
    writs: &[Writ],
    filter: &ProceedingFilter,
) -> Vec<&'a Proceeding> {
    let by_id: HashMap<&WritId, &Writ> = writs.iter().map(|writ| (&writ.id, writ)).collect();
    let mut matched: Vec<&Proceeding> = proceedings
        .iter()
        .filter(|proceeding| {
            let writ = proceeding
                .fir
                .writ()
                .or_else(|| by_id.get(proceeding.writ_id()).copied());
            filter.matches(proceeding, writ)
        })
        .collect();
    sort_by_recency(&mut matched);
    matched
}

pub fn timeline_for_writ<'a>(proceedings: &'a [Proceeding], writ_id: &WritId) -> Vec<&'a Proceeding> {
    let mut timeline: Vec<&Proceeding> = proceedings
        .iter()
        .filter(|proceeding| proceeding.writ_id() == writ_id)
        .collect();
    timeline.sort_by(|a, b| timeline_order(a, b));
    timeline
}

pub fn next_hearing_for_writ(
    proceedings: &[Proceeding],
    writ_id: &WritId,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let current = proceedings
        .iter()
        .filter(|proceeding| proceeding.writ_id() == writ_id)
        .max_by(|a, b| timeline_order(a, b))?;
    current
        .hearing_date()
        .filter(|date| days_until(*date, now) >= 0)
}

pub fn new_proceeding_candidates<'a>(writs: &'a [Writ], drafts: &HashSet<WritId>) -> Vec<&'a Writ> {
    writs
        .iter()
        .filter(|writ| !drafts.contains(&writ.id))
        .collect()
}

pub fn resume_draft_candidates<'a>(writs: &'a [Writ], drafts: &HashSet<WritId>) -> Vec<&'a Writ> {
    writs
        .iter()
        .filter(|writ| drafts.contains(&writ.id))
        .collect()
}

#[cfg(test)]
#[path = "tests/derive_tests.rs"]
mod tests;
