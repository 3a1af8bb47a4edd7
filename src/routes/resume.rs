use rocket::serde::json::Json;
use rocket::State;
use rocket::serde::Deserialize;
use rocket_okapi::openapi;
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;
use crate::db::DbConn;
use crate::guards::StudentGuard;
use crate::routes::profile::{load_student, save_student};
use crate::services::document::ingest_pdf;
use crate::utils::{ApiResponse, ApiError, FileDownload};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct PdfUploadDto {
    pub file_name: String,
    pub mime_type: String,
    pub data: String, // base64
}

#[openapi(tag = "Resume")]
#[post("/student/resume/upload", data = "<dto>")]
pub async fn upload_resume(
    db: &State<DbConn>,
    guard: StudentGuard,
    dto: Json<PdfUploadDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut student = load_student(db, guard.auth.account_id).await?;

    if student.resume.is_some() {
        return Err(ApiError::conflict(
            "Resume already exists. Use update endpoint to replace it.",
        ));
    }

    let blob = ingest_pdf(&dto.file_name, &dto.mime_type, &dto.data)?;
    student.resume = Some(blob);
    save_student(db, &mut student).await?;

    let resume = student.resume.as_ref().unwrap();
    Ok(Json(ApiResponse::success_with_message(
        "Resume uploaded successfully".to_string(),
        serde_json::json!({
            "file_name": resume.file_name,
            "file_size": resume.file_size,
            "uploaded_at": resume.uploaded_at,
            "profile_completeness": student.profile_completeness,
        })
    )))
}

#[openapi(tag = "Resume")]
#[put("/student/resume/update", data = "<dto>")]
pub async fn update_resume(
    db: &State<DbConn>,
    guard: StudentGuard,
    dto: Json<PdfUploadDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut student = load_student(db, guard.auth.account_id).await?;

    let blob = ingest_pdf(&dto.file_name, &dto.mime_type, &dto.data)?;
    student.resume = Some(blob);
    save_student(db, &mut student).await?;

    let resume = student.resume.as_ref().unwrap();
    Ok(Json(ApiResponse::success_with_message(
        "Resume updated successfully".to_string(),
        serde_json::json!({
            "file_name": resume.file_name,
            "file_size": resume.file_size,
            "uploaded_at": resume.uploaded_at,
            "profile_completeness": student.profile_completeness,
        })
    )))
}

#[openapi(tag = "Resume")]
#[get("/student/resume")]
pub async fn get_resume(
    db: &State<DbConn>,
    guard: StudentGuard,
) -> Result<FileDownload, ApiError> {
    let student = load_student(db, guard.auth.account_id).await?;

    let resume = student.resume
        .ok_or_else(|| ApiError::not_found("No resume found"))?;

    Ok(FileDownload {
        file_name: resume.file_name,
        content_type: resume.content_type,
        data: resume.data.bytes,
    })
}

#[openapi(tag = "Resume")]
#[delete("/student/resume")]
pub async fn delete_resume(
    db: &State<DbConn>,
    guard: StudentGuard,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut student = load_student(db, guard.auth.account_id).await?;

    if student.resume.is_none() {
        return Err(ApiError::not_found("No resume to delete"));
    }

    student.resume = None;
    save_student(db, &mut student).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Resume deleted successfully".to_string(),
        serde_json::json!({
            "profile_completeness": student.profile_completeness,
        })
    )))
}
