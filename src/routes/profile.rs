use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, DateTime, oid::ObjectId};
use crate::db::DbConn;
use crate::guards::StudentGuard;
use crate::models::{College, Student, StudentResponse, UpdateStudentProfileDto};
use crate::services::completeness::{calculate_completeness, profile_status};
use crate::utils::{validate_graduation_year, ApiResponse, ApiError};

pub(crate) async fn load_student(db: &DbConn, student_id: ObjectId) -> Result<Student, ApiError> {
    db.collection::<Student>("students")
        .find_one(doc! { "_id": student_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Student not found"))
}

/// Recomputes completeness and writes the whole document back in one
/// replace, so the stored score can never drift from the field values.
pub(crate) async fn save_student(db: &DbConn, student: &mut Student) -> Result<(), ApiError> {
    let student_id = student.id
        .ok_or_else(|| ApiError::internal_error("Student record missing ID"))?;

    student.profile_completeness = calculate_completeness(student);
    student.updated_at = DateTime::now();

    db.collection::<Student>("students")
        .replace_one(doc! { "_id": student_id }, &*student, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update profile: {}", e)))?;

    Ok(())
}

#[openapi(tag = "Student Profile")]
#[get("/student/profile")]
pub async fn get_profile(
    db: &State<DbConn>,
    guard: StudentGuard,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let student = load_student(db, guard.auth.account_id).await?;

    let college_name = match student.college {
        Some(college_id) => db.collection::<College>("colleges")
            .find_one(doc! { "_id": college_id }, None)
            .await
            .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
            .map(|c| c.name),
        None => None,
    };

    let response: StudentResponse = student.into();

    Ok(Json(ApiResponse::success(serde_json::json!({
        "student": response,
        "college_name": college_name,
    }))))
}

#[openapi(tag = "Student Profile")]
#[put("/student/profile", data = "<dto>")]
pub async fn update_profile(
    db: &State<DbConn>,
    guard: StudentGuard,
    dto: Json<UpdateStudentProfileDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if let Some(year) = dto.graduation_year {
        if !validate_graduation_year(year) {
            return Err(ApiError::bad_request("Invalid graduation year"));
        }
    }

    let mut student = load_student(db, guard.auth.account_id).await?;

    if let Some(ref image) = dto.image {
        student.image = Some(image.clone()).filter(|i| !i.is_empty());
    }
    if let Some(ref branch) = dto.branch {
        student.branch = Some(branch.clone()).filter(|b| !b.is_empty());
    }
    if let Some(year) = dto.graduation_year {
        student.graduation_year = Some(year);
    }
    if let Some(ref skills) = dto.skills {
        student.skills = skills.clone();
    }
    if let Some(ref projects) = dto.projects {
        student.projects = projects.clone();
    }
    if let Some(ref certifications) = dto.certifications {
        student.certifications = certifications.clone();
    }
    if let Some(ref preferred_roles) = dto.preferred_roles {
        student.preferred_roles = preferred_roles.clone();
    }

    save_student(db, &mut student).await?;

    let response: StudentResponse = student.into();

    Ok(Json(ApiResponse::success_with_message(
        "Profile updated successfully".to_string(),
        serde_json::json!({ "student": response })
    )))
}

/// Completion status: score, strength tier, missing fields and the
/// per-section breakdown the remediation wizard is driven by.
#[openapi(tag = "Student Profile")]
#[get("/student/profile/status")]
pub async fn get_profile_status(
    db: &State<DbConn>,
    guard: StudentGuard,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let student = load_student(db, guard.auth.account_id).await?;

    let status = profile_status(&student);
    let data = serde_json::to_value(&status)
        .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;

    Ok(Json(ApiResponse::success(data)))
}
