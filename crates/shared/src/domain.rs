use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }
    };
}

id_newtype!(WritId);
id_newtype!(ProceedingId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WritType {
    Bail,
    Quashing,
    Direction,
    SuspensionOfSentence,
    Payroll,
    AnyOther,
}

impl WritType {
    pub const ALL: [WritType; 6] = [
        WritType::Bail,
        WritType::Quashing,
        WritType::Direction,
        WritType::SuspensionOfSentence,
        WritType::Payroll,
        WritType::AnyOther,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WritType::Bail => "Bail",
            WritType::Quashing => "Quashing",
            WritType::Direction => "Direction",
            WritType::SuspensionOfSentence => "Suspension of Sentence",
            WritType::Payroll => "Payroll",
            WritType::AnyOther => "Any Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BailType {
    Regular,
    Anticipatory,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WritStatus {
    #[default]
    Registered,
    UnderInvestigation,
    OngoingHearing,
    ChargesheetFiled,
    Closed,
    Withdrawn,
}

impl WritStatus {
    pub const ALL: [WritStatus; 6] = [
        WritStatus::Registered,
        WritStatus::UnderInvestigation,
        WritStatus::OngoingHearing,
        WritStatus::ChargesheetFiled,
        WritStatus::Closed,
        WritStatus::Withdrawn,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WritStatus::Registered => "Registered",
            WritStatus::UnderInvestigation => "Under Investigation",
            WritStatus::OngoingHearing => "Ongoing Hearing",
            WritStatus::ChargesheetFiled => "Chargesheet Filed",
            WritStatus::Closed => "Closed",
            WritStatus::Withdrawn => "Withdrawn",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProceedingKind {
    NoticeOfMotion,
    ToFileReply,
    Argument,
    Decision,
    AnyOther,
}

impl ProceedingKind {
    pub const ALL: [ProceedingKind; 5] = [
        ProceedingKind::NoticeOfMotion,
        ProceedingKind::ToFileReply,
        ProceedingKind::Argument,
        ProceedingKind::Decision,
        ProceedingKind::AnyOther,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProceedingKind::NoticeOfMotion => "Notice of Motion",
            ProceedingKind::ToFileReply => "To File Reply",
            ProceedingKind::Argument => "Argument",
            ProceedingKind::Decision => "Decision",
            ProceedingKind::AnyOther => "Any Other",
        }
    }

    /// Argument hearings are only recorded against quashing writs.
    pub fn allowed_for(self, writ_type: WritType) -> bool {
        self != ProceedingKind::Argument || writ_type == WritType::Quashing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceMode {
    ByFormat,
    ByPerson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionOutcome {
    Allowed,
    Dismissed,
    PartiallyAllowed,
    Withdrawn,
    DisposedOf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigatingOfficer {
    pub name: String,
    pub rank: String,
    #[serde(default)]
    pub posting: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Petitioner {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    pub name: String,
    #[serde(default)]
    pub designation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Writ {
    #[serde(rename = "_id", alias = "id")]
    pub id: WritId,
    pub fir_number: String,
    pub writ_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub writ_type: WritType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bail_type: Option<BailType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_filing: Option<DateTime<Utc>>,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub police_station: String,
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub investigating_officers: Vec<InvestigatingOfficer>,
    pub petitioner: Petitioner,
    #[serde(default)]
    pub respondents: Vec<Respondent>,
    #[serde(default)]
    pub status: WritStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WritRef {
    Id(WritId),
    Populated(Box<Writ>),
}

impl WritRef {
    pub fn id(&self) -> &WritId {
        match self {
            WritRef::Id(id) => id,
            WritRef::Populated(writ) => &writ.id,
        }
    }

    pub fn writ(&self) -> Option<&Writ> {
        match self {
            WritRef::Id(_) => None,
            WritRef::Populated(writ) => Some(writ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HearingDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_hearing: Option<DateTime<Utc>>,
    #[serde(default)]
    pub judge_name: String,
    #[serde(default)]
    pub court_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDetails {
    pub name: String,
    pub rank: String,
    pub mobile: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByFormatAttendance {
    pub format_filled_by: PersonDetails,
    pub appearing_advocate: PersonDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByPersonAttendance {
    pub attending_officer: PersonDetails,
    pub investigating_officer: PersonDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// One notice-of-motion record. The attendance mode decides which
/// people are recorded; the two sets never mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "attendanceMode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeOfMotionEntry {
    ByFormat(ByFormatAttendance),
    ByPerson(ByPersonAttendance),
}

impl NoticeOfMotionEntry {
    pub fn mode(&self) -> AttendanceMode {
        match self {
            NoticeOfMotionEntry::ByFormat(_) => AttendanceMode::ByFormat,
            NoticeOfMotionEntry::ByPerson(_) => AttendanceMode::ByPerson,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyEntry {
    pub officer_deadline: DateTime<Utc>,
    pub advocate_deadline: DateTime<Utc>,
    #[serde(default)]
    pub reply_filed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_filing_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentDetails {
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_date_of_hearing: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionDetails {
    pub outcome: DecisionOutcome,
    pub date_of_decision: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnyOtherDetails {
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProceedingDetails {
    NoticeOfMotion(Vec<NoticeOfMotionEntry>),
    ToFileReply(Vec<ReplyEntry>),
    Argument(ArgumentDetails),
    Decision(DecisionDetails),
    AnyOther(AnyOtherDetails),
}

impl ProceedingDetails {
    pub fn kind(&self) -> ProceedingKind {
        match self {
            ProceedingDetails::NoticeOfMotion(_) => ProceedingKind::NoticeOfMotion,
            ProceedingDetails::ToFileReply(_) => ProceedingKind::ToFileReply,
            ProceedingDetails::Argument(_) => ProceedingKind::Argument,
            ProceedingDetails::Decision(_) => ProceedingKind::Decision,
            ProceedingDetails::AnyOther(_) => ProceedingKind::AnyOther,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsWire {
    #[serde(rename = "type")]
    pub kind: Option<ProceedingKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice_of_motion: Option<Vec<NoticeOfMotionEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_tracking: Option<Vec<ReplyEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_details: Option<ArgumentDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_details: Option<DecisionDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_other_details: Option<AnyOtherDetails>,
}

impl From<ProceedingDetails> for DetailsWire {
    fn from(details: ProceedingDetails) -> Self {
        let mut wire = DetailsWire {
            kind: Some(details.kind()),
            ..DetailsWire::default()
        };
        match details {
            ProceedingDetails::NoticeOfMotion(entries) => wire.notice_of_motion = Some(entries),
            ProceedingDetails::ToFileReply(entries) => wire.reply_tracking = Some(entries),
            ProceedingDetails::Argument(details) => wire.argument_details = Some(details),
            ProceedingDetails::Decision(details) => wire.decision_details = Some(details),
            ProceedingDetails::AnyOther(details) => wire.any_other_details = Some(details),
        }
        wire
    }
}

impl TryFrom<DetailsWire> for ProceedingDetails {
    type Error = String;

    fn try_from(wire: DetailsWire) -> Result<Self, Self::Error> {
        let kind = wire.kind.ok_or_else(|| "missing proceeding type".to_string())?;
        let missing = || format!("missing payload for proceeding type {kind:?}");
        Ok(match kind {
            ProceedingKind::NoticeOfMotion => {
                ProceedingDetails::NoticeOfMotion(wire.notice_of_motion.ok_or_else(missing)?)
            }
            ProceedingKind::ToFileReply => {
                ProceedingDetails::ToFileReply(wire.reply_tracking.ok_or_else(missing)?)
            }
            ProceedingKind::Argument => {
                ProceedingDetails::Argument(wire.argument_details.ok_or_else(missing)?)
            }
            ProceedingKind::Decision => {
                ProceedingDetails::Decision(wire.decision_details.ok_or_else(missing)?)
            }
            ProceedingKind::AnyOther => {
                ProceedingDetails::AnyOther(wire.any_other_details.ok_or_else(missing)?)
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProceedingWire", into = "ProceedingWire")]
pub struct Proceeding {
    pub id: ProceedingId,
    pub fir: WritRef,
    pub sequence: u32,
    pub hearing_details: HearingDetails,
    pub summary: Option<String>,
    pub draft: bool,
    pub attachment: Option<AttachmentDescriptor>,
    pub details: ProceedingDetails,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Proceeding {
    pub fn writ_id(&self) -> &WritId {
        self.fir.id()
    }

    pub fn kind(&self) -> ProceedingKind {
        self.details.kind()
    }

    pub fn hearing_date(&self) -> Option<DateTime<Utc>> {
        self.hearing_details.date_of_hearing
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProceedingWire {
    #[serde(rename = "_id", alias = "id")]
    id: ProceedingId,
    fir: WritRef,
    #[serde(default)]
    sequence: u32,
    #[serde(default)]
    hearing_details: HearingDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(default)]
    draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attachment: Option<AttachmentDescriptor>,
    #[serde(flatten)]
    details: DetailsWire,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProceedingWire> for Proceeding {
    type Error = String;

    fn try_from(wire: ProceedingWire) -> Result<Self, Self::Error> {
        Ok(Proceeding {
            details: ProceedingDetails::try_from(wire.details)?,
            id: wire.id,
            fir: wire.fir,
            sequence: wire.sequence,
            hearing_details: wire.hearing_details,
            summary: wire.summary,
            draft: wire.draft,
            attachment: wire.attachment,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        })
    }
}

impl From<Proceeding> for ProceedingWire {
    fn from(value: Proceeding) -> Self {
        ProceedingWire {
            id: value.id,
            fir: value.fir,
            sequence: value.sequence,
            hearing_details: value.hearing_details,
            summary: value.summary,
            draft: value.draft,
            attachment: value.attachment,
            details: value.details.into(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
