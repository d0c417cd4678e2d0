use std::collections::HashSet;

use futures::future::join_all;
use shared::domain::{Proceeding, Writ, WritId};
use tracing::{debug, warn};

use crate::client::CaseApi;

/// A failed lookup counts as "no draft" so one bad call cannot hide a writ.
pub async fn draft_or_none(api: &dyn CaseApi, writ_id: &WritId) -> Option<Proceeding> {
    match api.draft_for_writ(writ_id).await {
        Ok(draft) => draft,
        Err(err) => {
            warn!(%writ_id, error = %err, "draft lookup failed; assuming no draft");
            None
        }
    }
}

pub async fn probe_drafts(api: &dyn CaseApi, writs: &[Writ]) -> HashSet<WritId> {
    let probes = writs.iter().map(|writ| async move {
        draft_or_none(api, &writ.id)
            .await
            .map(|_| writ.id.clone())
    });

    let drafts: HashSet<WritId> = join_all(probes).await.into_iter().flatten().collect();
    debug!(writs = writs.len(), drafts = drafts.len(), "draft probe finished");
    drafts
}
