use mongodb::bson::{oid::ObjectId, Binary, DateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;

/// A PDF stored inline in the student document.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DocumentBlob {
    pub data: Binary,
    pub content_type: String,
    pub file_name: String,
    pub file_size: i64,
    pub uploaded_at: DateTime,
}

/// LinkedIn carries an optional exported-profile PDF and an optional
/// profile URL; either may exist without the other.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LinkedInAttachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<DocumentBlob>,
    #[serde(default)]
    pub linked_in_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema, PartialEq)]
pub struct Project {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema, PartialEq)]
pub struct Certification {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Student {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub image: Option<String>,
    pub college: Option<ObjectId>,
    pub branch: Option<String>,
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub preferred_roles: Vec<String>,
    pub resume: Option<DocumentBlob>,
    pub linked_in: Option<LinkedInAttachment>,
    pub github_url: Option<String>,
    /// Always the scorer's output for the current field values; persisted
    /// together with every mutation, never hand-set.
    pub profile_completeness: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Student {
    pub fn linkedin_pdf(&self) -> Option<&DocumentBlob> {
        self.linked_in.as_ref().and_then(|l| l.pdf.as_ref())
    }

    pub fn linkedin_url(&self) -> Option<&str> {
        self.linked_in
            .as_ref()
            .map(|l| l.linked_in_url.as_str())
            .filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct StudentSignupDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub college_id: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateStudentProfileDto {
    pub image: Option<String>,
    pub branch: Option<String>,
    pub graduation_year: Option<i32>,
    pub skills: Option<Vec<String>>,
    pub projects: Option<Vec<Project>>,
    pub certifications: Option<Vec<Certification>>,
    pub preferred_roles: Option<Vec<String>>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct StudentResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub image: Option<String>,
    pub college: Option<String>,
    pub branch: Option<String>,
    pub graduation_year: Option<i32>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
    pub preferred_roles: Vec<String>,
    pub has_resume: bool,
    pub has_linkedin_pdf: bool,
    pub linked_in_url: Option<String>,
    pub github_url: Option<String>,
    pub profile_completeness: i32,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        let has_resume = student.resume.is_some();
        let has_linkedin_pdf = student.linkedin_pdf().is_some();
        let linked_in_url = student.linkedin_url().map(|u| u.to_string());

        StudentResponse {
            id: student.id.map(|id| id.to_hex()).unwrap_or_default(),
            first_name: student.first_name,
            last_name: student.last_name,
            email: student.email,
            image: student.image,
            college: student.college.map(|id| id.to_hex()),
            branch: student.branch,
            graduation_year: student.graduation_year,
            skills: student.skills,
            projects: student.projects,
            certifications: student.certifications,
            preferred_roles: student.preferred_roles,
            has_resume,
            has_linkedin_pdf,
            linked_in_url,
            github_url: student.github_url,
            profile_completeness: student.profile_completeness,
        }
    }
}
