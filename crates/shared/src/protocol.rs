use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    BailType, DetailsWire, HearingDetails, InvestigatingOfficer, Petitioner, ProceedingDetails,
    ProceedingId, Respondent, WritId, WritStatus, WritType,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWrit {
    pub fir_number: String,
    pub writ_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub writ_type: WritType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bail_type: Option<BailType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_filing: Option<DateTime<Utc>>,
    pub branch: String,
    pub police_station: String,
    #[serde(default)]
    pub sections: Vec<String>,
    pub investigating_officers: Vec<InvestigatingOfficer>,
    pub petitioner: Petitioner,
    #[serde(default)]
    pub respondents: Vec<Respondent>,
    #[serde(default)]
    pub status: WritStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NewProceedingWire", into = "NewProceedingWire")]
pub struct NewProceeding {
    pub fir: WritId,
    pub hearing_details: HearingDetails,
    pub summary: Option<String>,
    pub draft: bool,
    /// Open draft this submission replaces, if it finishes or re-saves one.
    pub draft_id: Option<ProceedingId>,
    pub details: ProceedingDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewProceedingWire {
    fir: WritId,
    #[serde(default)]
    hearing_details: HearingDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(default)]
    draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    draft_id: Option<ProceedingId>,
    #[serde(flatten)]
    details: DetailsWire,
}

impl TryFrom<NewProceedingWire> for NewProceeding {
    type Error = String;

    fn try_from(wire: NewProceedingWire) -> Result<Self, Self::Error> {
        Ok(NewProceeding {
            details: ProceedingDetails::try_from(wire.details)?,
            fir: wire.fir,
            hearing_details: wire.hearing_details,
            summary: wire.summary,
            draft: wire.draft,
            draft_id: wire.draft_id,
        })
    }
}

impl From<NewProceeding> for NewProceedingWire {
    fn from(value: NewProceeding) -> Self {
        NewProceedingWire {
            fir: value.fir,
            hearing_details: value.hearing_details,
            summary: value.summary,
            draft: value.draft,
            draft_id: value.draft_id,
            details: value.details.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl AttachmentUpload {
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: WritStatus,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    #[serde(default)]
    pub total_writs: u64,
    #[serde(default)]
    pub total_proceedings: u64,
    #[serde(default)]
    pub upcoming_hearings: u64,
    #[serde(default)]
    pub status_counts: Vec<StatusCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub label: String,
    pub count: u64,
}

/// Responses arrive either bare or wrapped as `{ "data": ..., "message": ... }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped {
        data: T,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data, .. } => data,
            Envelope::Bare(data) => data,
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
