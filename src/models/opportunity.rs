use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub enum OpportunityStatus {
    Open,
    Closed,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Opportunity {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub job_title: String,
    pub role_description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub experience_level: String,
    pub number_of_referrals: i32,
    pub referrals_given: i32,
    pub posted_by: ObjectId,
    pub college: ObjectId,
    pub status: OpportunityStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Opportunity {
    pub fn is_active(&self) -> bool {
        self.status == OpportunityStatus::Open
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateOpportunityDto {
    pub job_title: String,
    pub role_description: String,
    pub required_skills: Vec<String>,
    pub experience_level: String,
    pub number_of_referrals: i32,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateOpportunityDto {
    pub job_title: Option<String>,
    pub role_description: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub number_of_referrals: Option<i32>,
    pub status: Option<OpportunityStatus>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct OpportunityResponse {
    pub id: String,
    pub job_title: String,
    pub role_description: String,
    pub required_skills: Vec<String>,
    pub experience_level: String,
    pub number_of_referrals: i32,
    pub referrals_given: i32,
    pub posted_by: String,
    pub college: String,
    pub status: OpportunityStatus,
    pub is_active: bool,
}

impl From<Opportunity> for OpportunityResponse {
    fn from(opportunity: Opportunity) -> Self {
        let is_active = opportunity.is_active();
        OpportunityResponse {
            id: opportunity.id.map(|id| id.to_hex()).unwrap_or_default(),
            job_title: opportunity.job_title,
            role_description: opportunity.role_description,
            required_skills: opportunity.required_skills,
            experience_level: opportunity.experience_level,
            number_of_referrals: opportunity.number_of_referrals,
            referrals_given: opportunity.referrals_given,
            posted_by: opportunity.posted_by.to_hex(),
            college: opportunity.college.to_hex(),
            status: opportunity.status,
            is_active,
        }
    }
}
