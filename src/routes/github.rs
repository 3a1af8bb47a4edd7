use rocket::serde::json::Json;
use rocket::State;
use rocket::serde::Deserialize;
use rocket_okapi::openapi;
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;
use crate::db::DbConn;
use crate::guards::StudentGuard;
use crate::routes::profile::{load_student, save_student};
use crate::utils::{validate_github_url, ApiResponse, ApiError};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct GithubUrlDto {
    pub github_url: String,
}

fn validate_dto(dto: &GithubUrlDto) -> Result<(), ApiError> {
    if dto.github_url.is_empty() {
        return Err(ApiError::bad_request("GitHub URL is required"));
    }
    if !validate_github_url(&dto.github_url) {
        return Err(ApiError::bad_request(
            "Invalid GitHub URL format. Example: https://github.com/username",
        ));
    }
    Ok(())
}

#[openapi(tag = "GitHub")]
#[post("/student/github", data = "<dto>")]
pub async fn add_github_url(
    db: &State<DbConn>,
    guard: StudentGuard,
    dto: Json<GithubUrlDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    validate_dto(&dto)?;

    let mut student = load_student(db, guard.auth.account_id).await?;

    if student.github_url.is_some() {
        return Err(ApiError::conflict(
            "GitHub URL already exists. Use update endpoint to change it.",
        ));
    }

    student.github_url = Some(dto.github_url.clone());
    save_student(db, &mut student).await?;

    Ok(Json(ApiResponse::success_with_message(
        "GitHub URL added successfully".to_string(),
        serde_json::json!({
            "github_url": student.github_url,
            "profile_completeness": student.profile_completeness,
        })
    )))
}

#[openapi(tag = "GitHub")]
#[put("/student/github", data = "<dto>")]
pub async fn update_github_url(
    db: &State<DbConn>,
    guard: StudentGuard,
    dto: Json<GithubUrlDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    validate_dto(&dto)?;

    let mut student = load_student(db, guard.auth.account_id).await?;

    student.github_url = Some(dto.github_url.clone());
    save_student(db, &mut student).await?;

    Ok(Json(ApiResponse::success_with_message(
        "GitHub URL updated successfully".to_string(),
        serde_json::json!({
            "github_url": student.github_url,
            "profile_completeness": student.profile_completeness,
        })
    )))
}

#[openapi(tag = "GitHub")]
#[get("/student/github")]
pub async fn get_github_url(
    db: &State<DbConn>,
    guard: StudentGuard,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let student = load_student(db, guard.auth.account_id).await?;

    let github_url = student.github_url
        .ok_or_else(|| ApiError::not_found("GitHub URL not found. Please add your GitHub URL first."))?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "github_url": github_url,
    }))))
}

#[openapi(tag = "GitHub")]
#[delete("/student/github")]
pub async fn delete_github_url(
    db: &State<DbConn>,
    guard: StudentGuard,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut student = load_student(db, guard.auth.account_id).await?;

    if student.github_url.is_none() {
        return Err(ApiError::not_found("GitHub URL not found"));
    }

    student.github_url = None;
    save_student(db, &mut student).await?;

    Ok(Json(ApiResponse::success_with_message(
        "GitHub URL deleted successfully".to_string(),
        serde_json::json!({
            "profile_completeness": student.profile_completeness,
        })
    )))
}
