use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Utc};
use shared::domain::{Proceeding, Writ, WritId};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    client::CaseApi,
    dashboard::DashboardSummary,
    derive::{
        filter_proceedings, latest_per_writ, new_proceeding_candidates, resume_draft_candidates,
        timeline_for_writ, upcoming_hearings, ProceedingFilter, UpcomingHearing,
    },
    drafts::{draft_or_none, probe_drafts},
    error::ClientError,
    form::{FormError, ProceedingForm, WritForm},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormScope {
    Global,
    Writ,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] FormError),
    #[error("writ {writ_id} already has an open draft; resume it instead")]
    DraftExists { writ_id: WritId },
    #[error(transparent)]
    Remote(#[from] ClientError),
}

pub struct CaseBoard {
    api: Arc<dyn CaseApi>,
    writs: Vec<Writ>,
    proceedings: Vec<Proceeding>,
    drafts: HashSet<WritId>,
    last_error: Option<String>,
}

impl CaseBoard {
    pub fn new(api: Arc<dyn CaseApi>) -> Self {
        Self {
            api,
            writs: Vec::new(),
            proceedings: Vec::new(),
            drafts: HashSet::new(),
            last_error: None,
        }
    }

    pub fn writs(&self) -> &[Writ] {
        &self.writs
    }

    pub fn proceedings(&self) -> &[Proceeding] {
        &self.proceedings
    }

    pub fn drafts(&self) -> &HashSet<WritId> {
        &self.drafts
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn writ(&self, writ_id: &WritId) -> Option<&Writ> {
        self.writs.iter().find(|writ| &writ.id == writ_id)
    }

    fn record_failure(&mut self, err: &ClientError) {
        warn!(error = %err, "case service call failed; keeping displayed data");
        self.last_error = Some(err.user_message());
    }

    pub async fn refresh_writs(&mut self) -> Result<(), ClientError> {
        let writs = match self.api.list_writs().await {
            Ok(writs) => writs,
            Err(err) => {
                self.record_failure(&err);
                return Err(err);
            }
        };
        let drafts = probe_drafts(self.api.as_ref(), &writs).await;
        info!(writs = writs.len(), drafts = drafts.len(), "writ list refreshed");
        self.writs = writs;
        self.drafts = drafts;
        self.last_error = None;
        Ok(())
    }

    pub async fn refresh_proceedings(&mut self) -> Result<(), ClientError> {
        match self.api.list_proceedings().await {
            Ok(proceedings) => {
                info!(count = proceedings.len(), "proceedings refreshed");
                self.proceedings = proceedings;
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    pub async fn refresh_writ_proceedings(&mut self, writ_id: &WritId) -> Result<(), ClientError> {
        match self.api.list_proceedings_for_writ(writ_id).await {
            Ok(fresh) => {
                self.proceedings.retain(|p| p.writ_id() != writ_id);
                self.proceedings.extend(fresh);
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    pub async fn load_draft(&mut self, writ_id: &WritId) -> Option<Proceeding> {
        let draft = draft_or_none(self.api.as_ref(), writ_id).await?;
        self.drafts.insert(writ_id.clone());
        Some(draft)
    }

    pub fn new_proceeding_writs(&self) -> Vec<&Writ> {
        new_proceeding_candidates(&self.writs, &self.drafts)
    }

    pub fn resume_draft_writs(&self) -> Vec<&Writ> {
        resume_draft_candidates(&self.writs, &self.drafts)
    }

    pub fn latest(&self) -> Vec<&Proceeding> {
        latest_per_writ(&self.proceedings)
    }

    pub fn upcoming(&self, now: DateTime<Utc>) -> Vec<UpcomingHearing<'_>> {
        upcoming_hearings(&self.latest(), now)
    }

    pub fn listing(&self, filter: &ProceedingFilter) -> Vec<&Proceeding> {
        filter_proceedings(&self.proceedings, &self.writs, filter)
    }

    pub fn timeline(&self, writ_id: &WritId) -> Vec<&Proceeding> {
        timeline_for_writ(&self.proceedings, writ_id)
    }

    pub fn dashboard(&self) -> DashboardSummary {
        DashboardSummary::from_writs(&self.writs)
    }

    pub async fn submit_proceeding(
        &mut self,
        form: &mut ProceedingForm,
        scope: FormScope,
    ) -> Result<&Proceeding, SubmitError> {
        let submission = form.validate()?;
        let writ_id = &submission.payload.fir;
        if submission.payload.draft
            && submission.resumed_draft.is_none()
            && self.drafts.contains(writ_id)
        {
            warn!(%writ_id, "refusing a second open draft");
            return Err(SubmitError::DraftExists {
                writ_id: writ_id.clone(),
            });
        }
        let created = match self
            .api
            .create_proceeding(&submission.payload, submission.attachment.as_ref())
            .await
        {
            Ok(created) => created,
            Err(err) => {
                self.record_failure(&err);
                return Err(err.into());
            }
        };

        if let Some(replaced) = &submission.resumed_draft {
            self.proceedings.retain(|proceeding| &proceeding.id != replaced);
        }
        if created.draft {
            self.drafts.insert(created.writ_id().clone());
        } else if submission.resumed_draft.is_some() {
            self.drafts.remove(created.writ_id());
        }
        self.last_error = None;
        form.reset(scope == FormScope::Writ);
        self.proceedings.insert(0, created);
        Ok(&self.proceedings[0])
    }

    pub async fn submit_writ(&mut self, form: &WritForm) -> Result<&Writ, SubmitError> {
        let payload = form.validate()?;
        let created = match self.api.create_writ(payload, form.attachment()).await {
            Ok(created) => created,
            Err(err) => {
                self.record_failure(&err);
                return Err(err.into());
            }
        };
        self.last_error = None;
        self.writs.insert(0, created);
        Ok(&self.writs[0])
    }
}

#[cfg(test)]
#[path = "tests/view_model_tests.rs"]
mod tests;
