use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Alumni {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub college: ObjectId,
    pub company: Option<String>,
    pub designation: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AlumniSignupDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub college_id: String,
    pub company: Option<String>,
    pub designation: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AlumniResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub college: String,
    pub company: Option<String>,
    pub designation: Option<String>,
}

impl From<Alumni> for AlumniResponse {
    fn from(alumni: Alumni) -> Self {
        AlumniResponse {
            id: alumni.id.map(|id| id.to_hex()).unwrap_or_default(),
            first_name: alumni.first_name,
            last_name: alumni.last_name,
            email: alumni.email,
            college: alumni.college.to_hex(),
            company: alumni.company,
            designation: alumni.designation,
        }
    }
}
