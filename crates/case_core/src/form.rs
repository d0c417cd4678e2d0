use chrono::{DateTime, Utc};
use shared::{
    domain::{
        AnyOtherDetails, ArgumentDetails, AttendanceMode, ByFormatAttendance, ByPersonAttendance,
        DecisionDetails, DecisionOutcome, HearingDetails, NoticeOfMotionEntry, PersonDetails,
        Proceeding, ProceedingDetails, ProceedingId, ProceedingKind, ReplyEntry, Writ, WritId,
        WritType,
    },
    protocol::{AttachmentUpload, NewProceeding, NewWrit},
};
use thiserror::Error;
use tracing::debug;

use crate::attachment::{AttachmentError, AttachmentSlot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn describe(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("form is incomplete: {}", describe(.fields))]
pub struct FormError {
    pub fields: Vec<FieldError>,
}

impl FormError {
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|error| error.field == field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStage {
    WritUnselected,
    WritSelected,
    KindSelected,
    Ready,
}

fn require_text(errors: &mut Vec<FieldError>, field: String, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "is required"));
    }
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub rank: String,
    pub mobile: String,
}

impl PersonDraft {
    fn validate(&self, prefix: &str, errors: &mut Vec<FieldError>) -> PersonDetails {
        require_text(errors, format!("{prefix}.name"), &self.name);
        require_text(errors, format!("{prefix}.rank"), &self.rank);
        require_text(errors, format!("{prefix}.mobile"), &self.mobile);
        PersonDetails {
            name: self.name.trim().to_string(),
            rank: self.rank.trim().to_string(),
            mobile: self.mobile.trim().to_string(),
        }
    }
}

impl From<&PersonDetails> for PersonDraft {
    fn from(value: &PersonDetails) -> Self {
        Self {
            name: value.name.clone(),
            rank: value.rank.clone(),
            mobile: value.mobile.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeEntryDraft {
    pub mode: Option<AttendanceMode>,
    pub format_filled_by: PersonDraft,
    pub appearing_advocate: PersonDraft,
    pub attending_officer: PersonDraft,
    pub investigating_officer: PersonDraft,
    pub remarks: String,
}

impl NoticeEntryDraft {
    fn validate(&self, index: usize, errors: &mut Vec<FieldError>) -> Option<NoticeOfMotionEntry> {
        let prefix = format!("noticeOfMotion[{index}]");
        let remarks = optional_text(&self.remarks);
        match self.mode {
            None => {
                errors.push(FieldError::new(
                    format!("{prefix}.attendanceMode"),
                    "select an attendance mode",
                ));
                None
            }
            Some(AttendanceMode::ByFormat) => Some(NoticeOfMotionEntry::ByFormat(ByFormatAttendance {
                format_filled_by: self
                    .format_filled_by
                    .validate(&format!("{prefix}.formatFilledBy"), errors),
                appearing_advocate: self
                    .appearing_advocate
                    .validate(&format!("{prefix}.appearingAdvocate"), errors),
                remarks,
            })),
            Some(AttendanceMode::ByPerson) => Some(NoticeOfMotionEntry::ByPerson(ByPersonAttendance {
                attending_officer: self
                    .attending_officer
                    .validate(&format!("{prefix}.attendingOfficer"), errors),
                investigating_officer: self
                    .investigating_officer
                    .validate(&format!("{prefix}.investigatingOfficer"), errors),
                remarks,
            })),
        }
    }
}

impl From<&NoticeOfMotionEntry> for NoticeEntryDraft {
    fn from(value: &NoticeOfMotionEntry) -> Self {
        match value {
            NoticeOfMotionEntry::ByFormat(entry) => Self {
                mode: Some(AttendanceMode::ByFormat),
                format_filled_by: (&entry.format_filled_by).into(),
                appearing_advocate: (&entry.appearing_advocate).into(),
                remarks: entry.remarks.clone().unwrap_or_default(),
                ..Self::default()
            },
            NoticeOfMotionEntry::ByPerson(entry) => Self {
                mode: Some(AttendanceMode::ByPerson),
                attending_officer: (&entry.attending_officer).into(),
                investigating_officer: (&entry.investigating_officer).into(),
                remarks: entry.remarks.clone().unwrap_or_default(),
                ..Self::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyEntryDraft {
    pub officer_deadline: Option<DateTime<Utc>>,
    pub advocate_deadline: Option<DateTime<Utc>>,
    pub reply_filed: bool,
    pub reply_filing_date: Option<DateTime<Utc>>,
    pub remarks: String,
}

impl ReplyEntryDraft {
    fn validate(&self, index: usize, errors: &mut Vec<FieldError>) -> Option<ReplyEntry> {
        let prefix = format!("replyTracking[{index}]");
        let before = errors.len();
        if self.officer_deadline.is_none() {
            errors.push(FieldError::new(format!("{prefix}.officerDeadline"), "is required"));
        }
        if self.advocate_deadline.is_none() {
            errors.push(FieldError::new(format!("{prefix}.advocateDeadline"), "is required"));
        }
        if self.reply_filed && self.reply_filing_date.is_none() {
            errors.push(FieldError::new(
                format!("{prefix}.replyFilingDate"),
                "is required once the reply is filed",
            ));
        }
        if errors.len() != before {
            return None;
        }
        Some(ReplyEntry {
            officer_deadline: self.officer_deadline?,
            advocate_deadline: self.advocate_deadline?,
            reply_filed: self.reply_filed,
            reply_filing_date: self.reply_filing_date.filter(|_| self.reply_filed),
            remarks: optional_text(&self.remarks),
        })
    }
}

impl From<&ReplyEntry> for ReplyEntryDraft {
    fn from(value: &ReplyEntry) -> Self {
        Self {
            officer_deadline: Some(value.officer_deadline),
            advocate_deadline: Some(value.advocate_deadline),
            reply_filed: value.reply_filed,
            reply_filing_date: value.reply_filing_date,
            remarks: value.remarks.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentDraft {
    pub details: String,
    pub next_date_of_hearing: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionDraft {
    pub outcome: Option<DecisionOutcome>,
    pub date_of_decision: Option<DateTime<Utc>>,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnyOtherDraft {
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HearingDraft {
    pub date_of_hearing: Option<DateTime<Utc>>,
    pub judge_name: String,
    pub court_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectedWrit {
    id: WritId,
    writ_type: WritType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProceedingSubmission {
    pub payload: NewProceeding,
    pub attachment: Option<AttachmentUpload>,
    pub resumed_draft: Option<ProceedingId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProceedingForm {
    writ: Option<SelectedWrit>,
    kind: Option<ProceedingKind>,
    pub hearing: HearingDraft,
    pub summary: String,
    pub save_as_draft: bool,
    notice_entries: Vec<NoticeEntryDraft>,
    reply_entries: Vec<ReplyEntryDraft>,
    pub argument: ArgumentDraft,
    pub decision: DecisionDraft,
    pub any_other: AnyOtherDraft,
    attachment: AttachmentSlot,
    resumed_draft: Option<ProceedingId>,
}

impl Default for ProceedingForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ProceedingForm {
    pub fn new() -> Self {
        Self {
            writ: None,
            kind: None,
            hearing: HearingDraft::default(),
            summary: String::new(),
            save_as_draft: false,
            notice_entries: vec![NoticeEntryDraft::default()],
            reply_entries: vec![ReplyEntryDraft::default()],
            argument: ArgumentDraft::default(),
            decision: DecisionDraft::default(),
            any_other: AnyOtherDraft::default(),
            attachment: AttachmentSlot::default(),
            resumed_draft: None,
        }
    }

    pub fn for_writ(writ: &Writ) -> Self {
        let mut form = Self::new();
        form.select_writ(writ);
        form
    }

    pub fn resume(writ: &Writ, draft: &Proceeding) -> Self {
        let mut form = Self::for_writ(writ);
        form.load(&draft.hearing_details, draft.summary.as_deref(), &draft.details);
        form.save_as_draft = true;
        form.resumed_draft = Some(draft.id.clone());
        form
    }

    pub fn from_payload(writ: &Writ, payload: &NewProceeding) -> Self {
        let mut form = Self::for_writ(writ);
        form.load(&payload.hearing_details, payload.summary.as_deref(), &payload.details);
        form.save_as_draft = payload.draft;
        form.resumed_draft = payload.draft_id.clone();
        form
    }

    pub fn continue_draft(&mut self, draft_id: ProceedingId) {
        self.resumed_draft = Some(draft_id);
    }

    fn load(&mut self, hearing: &HearingDetails, summary: Option<&str>, details: &ProceedingDetails) {
        self.hearing = HearingDraft {
            date_of_hearing: hearing.date_of_hearing,
            judge_name: hearing.judge_name.clone(),
            court_number: hearing.court_number.clone(),
        };
        self.summary = summary.unwrap_or_default().to_string();
        match details {
            ProceedingDetails::NoticeOfMotion(entries) if !entries.is_empty() => {
                self.notice_entries = entries.iter().map(NoticeEntryDraft::from).collect();
            }
            ProceedingDetails::ToFileReply(entries) if !entries.is_empty() => {
                self.reply_entries = entries.iter().map(ReplyEntryDraft::from).collect();
            }
            ProceedingDetails::Argument(details) => {
                self.argument = ArgumentDraft {
                    details: details.details.clone(),
                    next_date_of_hearing: details.next_date_of_hearing,
                };
            }
            ProceedingDetails::Decision(details) => {
                self.decision = DecisionDraft {
                    outcome: Some(details.outcome),
                    date_of_decision: Some(details.date_of_decision),
                    remarks: details.remarks.clone().unwrap_or_default(),
                };
            }
            ProceedingDetails::AnyOther(details) => {
                self.any_other = AnyOtherDraft {
                    details: details.details.clone(),
                };
            }
            _ => {}
        }
        self.set_kind(details.kind());
    }

    pub fn select_writ(&mut self, writ: &Writ) {
        self.writ = Some(SelectedWrit {
            id: writ.id.clone(),
            writ_type: writ.writ_type,
        });
        if let Some(kind) = self.kind {
            if !kind.allowed_for(writ.writ_type) {
                debug!(writ_id = %writ.id, ?kind, "type not offered for writ; falling back");
                self.kind = Some(ProceedingKind::NoticeOfMotion);
            }
        }
    }

    pub fn clear_writ(&mut self) {
        self.writ = None;
    }

    pub fn selected_writ(&self) -> Option<&WritId> {
        self.writ.as_ref().map(|writ| &writ.id)
    }

    pub fn available_kinds(&self) -> Vec<ProceedingKind> {
        ProceedingKind::ALL
            .into_iter()
            .filter(|kind| self.kind_allowed(*kind))
            .collect()
    }

    fn kind_allowed(&self, kind: ProceedingKind) -> bool {
        match &self.writ {
            Some(writ) => kind.allowed_for(writ.writ_type),
            None => kind != ProceedingKind::Argument,
        }
    }

    pub fn set_kind(&mut self, kind: ProceedingKind) -> ProceedingKind {
        let effective = if self.kind_allowed(kind) {
            kind
        } else {
            ProceedingKind::NoticeOfMotion
        };
        self.kind = Some(effective);
        effective
    }

    pub fn kind(&self) -> Option<ProceedingKind> {
        self.kind
    }

    pub fn notice_entries(&self) -> &[NoticeEntryDraft] {
        &self.notice_entries
    }

    pub fn notice_entry_mut(&mut self, index: usize) -> Option<&mut NoticeEntryDraft> {
        self.notice_entries.get_mut(index)
    }

    pub fn add_notice_entry(&mut self) -> usize {
        self.notice_entries.push(NoticeEntryDraft::default());
        self.notice_entries.len() - 1
    }

    /// Removes a row; the last remaining row cannot be removed.
    pub fn remove_notice_entry(&mut self, index: usize) -> bool {
        if self.notice_entries.len() <= 1 || index >= self.notice_entries.len() {
            return false;
        }
        self.notice_entries.remove(index);
        true
    }

    pub fn reply_entries(&self) -> &[ReplyEntryDraft] {
        &self.reply_entries
    }

    pub fn reply_entry_mut(&mut self, index: usize) -> Option<&mut ReplyEntryDraft> {
        self.reply_entries.get_mut(index)
    }

    pub fn add_reply_entry(&mut self) -> usize {
        self.reply_entries.push(ReplyEntryDraft::default());
        self.reply_entries.len() - 1
    }

    pub fn remove_reply_entry(&mut self, index: usize) -> bool {
        if self.reply_entries.len() <= 1 || index >= self.reply_entries.len() {
            return false;
        }
        self.reply_entries.remove(index);
        true
    }

    pub fn attach(&mut self, upload: AttachmentUpload) -> Result<(), AttachmentError> {
        self.attachment.select(upload)
    }

    pub fn clear_attachment(&mut self) {
        self.attachment.clear();
    }

    pub fn attachment(&self) -> Option<&AttachmentUpload> {
        self.attachment.file()
    }

    pub fn resumed_draft(&self) -> Option<&ProceedingId> {
        self.resumed_draft.as_ref()
    }

    pub fn stage(&self) -> FormStage {
        match (&self.writ, self.kind) {
            (None, _) => FormStage::WritUnselected,
            (Some(_), None) => FormStage::WritSelected,
            (Some(_), Some(_)) if self.validate().is_ok() => FormStage::Ready,
            (Some(_), Some(_)) => FormStage::KindSelected,
        }
    }

    fn validate_details(
        &self,
        kind: ProceedingKind,
        errors: &mut Vec<FieldError>,
    ) -> Option<ProceedingDetails> {
        match kind {
            ProceedingKind::NoticeOfMotion => {
                let entries: Vec<Option<NoticeOfMotionEntry>> = self
                    .notice_entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| entry.validate(index, errors))
                    .collect();
                entries
                    .into_iter()
                    .collect::<Option<Vec<_>>>()
                    .filter(|entries| !entries.is_empty())
                    .map(ProceedingDetails::NoticeOfMotion)
            }
            ProceedingKind::ToFileReply => {
                let entries: Vec<Option<ReplyEntry>> = self
                    .reply_entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| entry.validate(index, errors))
                    .collect();
                entries
                    .into_iter()
                    .collect::<Option<Vec<_>>>()
                    .filter(|entries| !entries.is_empty())
                    .map(ProceedingDetails::ToFileReply)
            }
            ProceedingKind::Argument => {
                require_text(errors, "argumentDetails.details".into(), &self.argument.details);
                Some(ProceedingDetails::Argument(ArgumentDetails {
                    details: self.argument.details.trim().to_string(),
                    next_date_of_hearing: self.argument.next_date_of_hearing,
                }))
            }
            ProceedingKind::Decision => {
                if self.decision.outcome.is_none() {
                    errors.push(FieldError::new("decisionDetails.outcome", "is required"));
                }
                if self.decision.date_of_decision.is_none() {
                    errors.push(FieldError::new("decisionDetails.dateOfDecision", "is required"));
                }
                Some(ProceedingDetails::Decision(DecisionDetails {
                    outcome: self.decision.outcome?,
                    date_of_decision: self.decision.date_of_decision?,
                    remarks: optional_text(&self.decision.remarks),
                }))
            }
            ProceedingKind::AnyOther => {
                require_text(errors, "anyOtherDetails.details".into(), &self.any_other.details);
                Some(ProceedingDetails::AnyOther(AnyOtherDetails {
                    details: self.any_other.details.trim().to_string(),
                }))
            }
        }
    }

    pub fn validate(&self) -> Result<ProceedingSubmission, FormError> {
        let mut errors = Vec::new();
        if self.writ.is_none() {
            errors.push(FieldError::new("fir", "select a writ"));
        }
        if self.hearing.date_of_hearing.is_none() {
            errors.push(FieldError::new("hearingDetails.dateOfHearing", "is required"));
        }
        let details = match self.kind {
            Some(kind) => self.validate_details(kind, &mut errors),
            None => {
                errors.push(FieldError::new("type", "select a proceeding type"));
                None
            }
        };

        match (&self.writ, details) {
            (Some(writ), Some(details)) if errors.is_empty() => Ok(ProceedingSubmission {
                payload: NewProceeding {
                    fir: writ.id.clone(),
                    hearing_details: HearingDetails {
                        date_of_hearing: self.hearing.date_of_hearing,
                        judge_name: self.hearing.judge_name.trim().to_string(),
                        court_number: self.hearing.court_number.trim().to_string(),
                    },
                    summary: optional_text(&self.summary),
                    draft: self.save_as_draft,
                    draft_id: self.resumed_draft.clone(),
                    details,
                },
                attachment: self.attachment.file().cloned(),
                resumed_draft: self.resumed_draft.clone(),
            }),
            _ => Err(FormError { fields: errors }),
        }
    }

    pub fn reset(&mut self, keep_writ: bool) {
        let writ = if keep_writ { self.writ.take() } else { None };
        *self = Self::new();
        self.writ = writ;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WritForm {
    pub writ: NewWrit,
    attachment: AttachmentSlot,
}

impl WritForm {
    pub fn new(writ: NewWrit) -> Self {
        Self {
            writ,
            attachment: AttachmentSlot::default(),
        }
    }

    pub fn attach(&mut self, upload: AttachmentUpload) -> Result<(), AttachmentError> {
        self.attachment.select(upload)
    }

    pub fn attachment(&self) -> Option<&AttachmentUpload> {
        self.attachment.file()
    }

    pub fn validate(&self) -> Result<&NewWrit, FormError> {
        let writ = &self.writ;
        let mut errors = Vec::new();
        require_text(&mut errors, "firNumber".into(), &writ.fir_number);
        require_text(&mut errors, "writNumber".into(), &writ.writ_number);
        require_text(&mut errors, "branch".into(), &writ.branch);
        require_text(&mut errors, "policeStation".into(), &writ.police_station);
        require_text(&mut errors, "petitioner.name".into(), &writ.petitioner.name);

        match (writ.writ_type, writ.bail_type) {
            (WritType::Bail, None) => {
                errors.push(FieldError::new("bailType", "is required for bail writs"))
            }
            (other, Some(_)) if other != WritType::Bail => {
                errors.push(FieldError::new("bailType", "applies to bail writs only"))
            }
            _ => {}
        }

        if writ.investigating_officers.is_empty() {
            errors.push(FieldError::new(
                "investigatingOfficers",
                "add at least one investigating officer",
            ));
        }
        for (index, officer) in writ.investigating_officers.iter().enumerate() {
            require_text(&mut errors, format!("investigatingOfficers[{index}].name"), &officer.name);
            require_text(&mut errors, format!("investigatingOfficers[{index}].rank"), &officer.rank);
            if let (Some(from), Some(to)) = (officer.from, officer.to) {
                if to < from {
                    errors.push(FieldError::new(
                        format!("investigatingOfficers[{index}].to"),
                        "must not be before the start of the tenure",
                    ));
                }
            }
        }
        for (index, respondent) in writ.respondents.iter().enumerate() {
            require_text(&mut errors, format!("respondents[{index}].name"), &respondent.name);
        }

        if errors.is_empty() {
            Ok(writ)
        } else {
            Err(FormError { fields: errors })
        }
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
