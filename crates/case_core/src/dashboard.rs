use std::collections::HashMap;

use shared::{
    domain::{Writ, WritStatus},
    protocol::DashboardMetrics,
};

pub const UNASSIGNED_BRANCH: &str = "Unassigned";

#[derive(Debug, Clone, PartialEq)]
pub struct StatusShare {
    pub status: WritStatus,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCount {
    pub branch: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total: u64,
    pub by_status: Vec<StatusShare>,
    pub by_branch: Vec<BranchCount>,
}

pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 1000.0 / total as f64).round() / 10.0
}

fn status_shares(counts: &HashMap<WritStatus, u64>, total: u64) -> Vec<StatusShare> {
    WritStatus::ALL
        .iter()
        .map(|status| {
            let count = counts.get(status).copied().unwrap_or(0);
            StatusShare {
                status: *status,
                count,
                percentage: percentage(count, total),
            }
        })
        .collect()
}

impl DashboardSummary {
    pub fn from_writs(writs: &[Writ]) -> Self {
        let mut status_counts: HashMap<WritStatus, u64> = HashMap::new();
        let mut branch_counts: HashMap<&str, u64> = HashMap::new();
        for writ in writs {
            *status_counts.entry(writ.status).or_default() += 1;
            let branch = writ.branch.trim();
            let branch = if branch.is_empty() {
                UNASSIGNED_BRANCH
            } else {
                branch
            };
            *branch_counts.entry(branch).or_default() += 1;
        }

        let total = writs.len() as u64;
        let mut by_branch: Vec<BranchCount> = branch_counts
            .into_iter()
            .map(|(branch, count)| BranchCount {
                branch: branch.to_string(),
                count,
            })
            .collect();
        by_branch.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.branch.cmp(&b.branch)));

        Self {
            total,
            by_status: status_shares(&status_counts, total),
            by_branch,
        }
    }

    pub fn from_metrics(metrics: &DashboardMetrics) -> Self {
        let mut status_counts: HashMap<WritStatus, u64> = HashMap::new();
        for entry in &metrics.status_counts {
            *status_counts.entry(entry.status).or_default() += entry.count;
        }
        let counted: u64 = status_counts.values().sum();
        let total = metrics.total_writs.max(counted);
        Self {
            total,
            by_status: status_shares(&status_counts, total),
            by_branch: Vec::new(),
        }
    }

    pub fn count_for(&self, status: WritStatus) -> u64 {
        self.by_status
            .iter()
            .find(|share| share.status == status)
            .map(|share| share.count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
