use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Referred,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Referred => "Referred",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StatusHistoryEntry {
    pub status: ApplicationStatus,
    pub timestamp: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Resume metadata captured at apply time; the blob itself stays on the
/// student document.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResumeSnapshot {
    pub file_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub uploaded_at: DateTime,
}

/// Key profile facts frozen at apply time so triage does not shift under
/// the alumni as the student keeps editing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProfileSnapshot {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub branch: Option<String>,
    pub graduation_year: Option<i32>,
    pub skills: Vec<String>,
    pub profile_completeness: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Application {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub opportunity: ObjectId,
    pub student: ObjectId,
    pub alumni: ObjectId,
    pub status: ApplicationStatus,
    pub resume_snapshot: Option<ResumeSnapshot>,
    pub profile_snapshot: ProfileSnapshot,
    pub applied_at: DateTime,
    pub shortlisted_at: Option<DateTime>,
    pub referred_at: Option<DateTime>,
    pub rejected_at: Option<DateTime>,
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ApplyDto {
    pub opportunity_id: String,
}
