use chrono::{DateTime, Utc};
use case_core::{dashboard::DashboardSummary, derive::UpcomingHearing};
use shared::domain::{Proceeding, Writ};

fn date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string())
}

fn writ_label(proceeding: &Proceeding) -> String {
    match proceeding.fir.writ() {
        Some(writ) => writ.writ_number.clone(),
        None => proceeding.writ_id().to_string(),
    }
}

pub fn writ_line(writ: &Writ) -> String {
    format!(
        "{:<12} {:<16} {:<16} {:<24} {:<20} {}",
        writ.id,
        writ.writ_number,
        writ.fir_number,
        writ.writ_type.label(),
        writ.status.label(),
        writ.petitioner.name
    )
}

pub fn proceeding_line(proceeding: &Proceeding) -> String {
    let hearing = &proceeding.hearing_details;
    let mut line = format!(
        "{} #{:<3} {:<18} {:<16} {} (court {})",
        date(proceeding.hearing_date()),
        proceeding.sequence,
        proceeding.kind().label(),
        writ_label(proceeding),
        hearing.judge_name,
        hearing.court_number
    );
    if proceeding.draft {
        line.push_str(" [draft]");
    }
    line
}

pub fn upcoming_line(hearing: &UpcomingHearing<'_>) -> String {
    let when = match hearing.days_until {
        0 => "today".to_string(),
        1 => "in 1 day".to_string(),
        days => format!("in {days} days"),
    };
    format!(
        "{} {:<12} {:<16} {}{}",
        date(Some(hearing.hearing_date)),
        when,
        writ_label(hearing.proceeding),
        hearing.proceeding.kind().label(),
        if hearing.urgent { "  URGENT" } else { "" }
    )
}

pub fn dashboard_lines(summary: &DashboardSummary) -> Vec<String> {
    let mut lines = vec![format!("Total writs: {}", summary.total)];
    lines.extend(summary.by_status.iter().map(|share| {
        format!(
            "  {:<20} {:>5} {:>6.1}%",
            share.status.label(),
            share.count,
            share.percentage
        )
    }));
    if !summary.by_branch.is_empty() {
        lines.push("By branch:".to_string());
        lines.extend(
            summary
                .by_branch
                .iter()
                .map(|branch| format!("  {:<28} {:>5}", branch.branch, branch.count)),
        );
    }
    lines
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
