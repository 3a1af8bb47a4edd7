use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;

/// College-side credential checker. Minimal role: authenticate and browse
/// the students of the verifier's college.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Verifier {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub college: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct VerifierSignupDto {
    pub name: String,
    pub email: String,
    pub password: String,
    pub college_id: String,
}
