use rocket::serde::json::Json;
use rocket::State;
use rocket::serde::Deserialize;
use rocket_okapi::openapi;
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;
use crate::db::DbConn;
use crate::guards::StudentGuard;
use crate::models::LinkedInAttachment;
use crate::routes::profile::{load_student, save_student};
use crate::routes::resume::PdfUploadDto;
use crate::services::document::ingest_pdf;
use crate::utils::{ApiResponse, ApiError, FileDownload};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct LinkedInUploadDto {
    pub file_name: String,
    pub mime_type: String,
    pub data: String, // base64
    pub linked_in_url: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct LinkedInUrlDto {
    pub linked_in_url: String,
}

#[openapi(tag = "LinkedIn")]
#[post("/student/linkedin/upload", data = "<dto>")]
pub async fn upload_linkedin(
    db: &State<DbConn>,
    guard: StudentGuard,
    dto: Json<LinkedInUploadDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut student = load_student(db, guard.auth.account_id).await?;

    if student.linkedin_pdf().is_some() {
        return Err(ApiError::conflict(
            "LinkedIn PDF already exists. Use update endpoint to replace it.",
        ));
    }

    let blob = ingest_pdf(&dto.file_name, &dto.mime_type, &dto.data)?;
    let existing_url = student.linkedin_url().map(|u| u.to_string());
    student.linked_in = Some(LinkedInAttachment {
        pdf: Some(blob),
        linked_in_url: dto.linked_in_url.clone()
            .filter(|u| !u.is_empty())
            .or(existing_url)
            .unwrap_or_default(),
    });
    save_student(db, &mut student).await?;

    let attachment = student.linked_in.as_ref().unwrap();
    let pdf = attachment.pdf.as_ref().unwrap();
    Ok(Json(ApiResponse::success_with_message(
        "LinkedIn PDF uploaded successfully".to_string(),
        serde_json::json!({
            "file_name": pdf.file_name,
            "file_size": pdf.file_size,
            "uploaded_at": pdf.uploaded_at,
            "linked_in_url": attachment.linked_in_url,
            "profile_completeness": student.profile_completeness,
        })
    )))
}

#[openapi(tag = "LinkedIn")]
#[put("/student/linkedin/pdf", data = "<dto>")]
pub async fn update_linkedin_pdf(
    db: &State<DbConn>,
    guard: StudentGuard,
    dto: Json<PdfUploadDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut student = load_student(db, guard.auth.account_id).await?;

    let blob = ingest_pdf(&dto.file_name, &dto.mime_type, &dto.data)?;

    // Replace the PDF, keep whatever URL is already there.
    let mut attachment = student.linked_in.take().unwrap_or_default();
    attachment.pdf = Some(blob);
    student.linked_in = Some(attachment);
    save_student(db, &mut student).await?;

    let attachment = student.linked_in.as_ref().unwrap();
    let pdf = attachment.pdf.as_ref().unwrap();
    Ok(Json(ApiResponse::success_with_message(
        "LinkedIn PDF updated successfully".to_string(),
        serde_json::json!({
            "file_name": pdf.file_name,
            "file_size": pdf.file_size,
            "uploaded_at": pdf.uploaded_at,
            "linked_in_url": attachment.linked_in_url,
            "profile_completeness": student.profile_completeness,
        })
    )))
}

/// The URL may be set with or without a PDF on file.
#[openapi(tag = "LinkedIn")]
#[put("/student/linkedin/url", data = "<dto>")]
pub async fn update_linkedin_url(
    db: &State<DbConn>,
    guard: StudentGuard,
    dto: Json<LinkedInUrlDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if dto.linked_in_url.is_empty() {
        return Err(ApiError::bad_request("LinkedIn URL is required"));
    }

    let mut student = load_student(db, guard.auth.account_id).await?;

    let mut attachment = student.linked_in.take().unwrap_or_default();
    attachment.linked_in_url = dto.linked_in_url.clone();
    student.linked_in = Some(attachment);
    save_student(db, &mut student).await?;

    Ok(Json(ApiResponse::success_with_message(
        "LinkedIn URL updated successfully".to_string(),
        serde_json::json!({
            "linked_in_url": dto.linked_in_url,
            "profile_completeness": student.profile_completeness,
        })
    )))
}

#[openapi(tag = "LinkedIn")]
#[get("/student/linkedin")]
pub async fn get_linkedin(
    db: &State<DbConn>,
    guard: StudentGuard,
) -> Result<FileDownload, ApiError> {
    let student = load_student(db, guard.auth.account_id).await?;

    let pdf = student.linked_in
        .and_then(|l| l.pdf)
        .ok_or_else(|| ApiError::not_found("No LinkedIn PDF found"))?;

    Ok(FileDownload {
        file_name: pdf.file_name,
        content_type: pdf.content_type,
        data: pdf.data.bytes,
    })
}

/// Clears the whole LinkedIn sub-object, PDF and URL alike.
#[openapi(tag = "LinkedIn")]
#[delete("/student/linkedin")]
pub async fn delete_linkedin(
    db: &State<DbConn>,
    guard: StudentGuard,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut student = load_student(db, guard.auth.account_id).await?;

    if student.linked_in.is_none() {
        return Err(ApiError::not_found("No LinkedIn data to delete"));
    }

    student.linked_in = None;
    save_student(db, &mut student).await?;

    Ok(Json(ApiResponse::success_with_message(
        "LinkedIn data deleted successfully".to_string(),
        serde_json::json!({
            "profile_completeness": student.profile_completeness,
        })
    )))
}
