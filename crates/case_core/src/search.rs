use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use shared::domain::Writ;
use tracing::debug;

use crate::{client::CaseApi, error::ClientError};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Results(Vec<Writ>),
    Superseded,
}

pub struct SearchCoordinator {
    latest: AtomicU64,
    debounce: Duration,
}

impl Default for SearchCoordinator {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl SearchCoordinator {
    pub fn new(debounce: Duration) -> Self {
        Self {
            latest: AtomicU64::new(0),
            debounce,
        }
    }

    pub fn issue(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Waits out the debounce window, then queries. An empty query lists all
    /// writs. Results (and errors) of a superseded search are discarded.
    pub async fn search(
        &self,
        api: &dyn CaseApi,
        query: &str,
    ) -> Result<SearchOutcome, ClientError> {
        let ticket = self.issue();
        tokio::time::sleep(self.debounce).await;
        if !self.is_current(ticket) {
            debug!(query, "search superseded during debounce");
            return Ok(SearchOutcome::Superseded);
        }

        let query = query.trim();
        let result = if query.is_empty() {
            api.list_writs().await
        } else {
            api.search_writs(query).await
        };

        if !self.is_current(ticket) {
            debug!(query, "search superseded in flight");
            return Ok(SearchOutcome::Superseded);
        }
        result.map(SearchOutcome::Results)
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
