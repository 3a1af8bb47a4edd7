use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct College {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    /// Lowercased key used to match alumni and students to the same college.
    pub matching_name: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct CollegeResponse {
    pub id: String,
    pub name: String,
}

impl From<College> for CollegeResponse {
    fn from(college: College) -> Self {
        CollegeResponse {
            id: college.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: college.name,
        }
    }
}
