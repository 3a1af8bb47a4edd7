use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;
use crate::db::DbConn;
use crate::guards::VerifierGuard;
use crate::models::{Student, StudentResponse, Verifier};
use crate::services::completeness::profile_status;
use crate::utils::{ApiResponse, ApiError};

async fn load_verifier(db: &DbConn, verifier_id: ObjectId) -> Result<Verifier, ApiError> {
    db.collection::<Verifier>("verifiers")
        .find_one(doc! { "_id": verifier_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Verifier not found"))
}

#[derive(FromForm, serde::Deserialize, rocket_okapi::okapi::schemars::JsonSchema)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Students of the verifier's college, with their completeness scores.
#[openapi(tag = "Verifier")]
#[get("/verifier/students?<query..>")]
pub async fn get_students(
    db: &State<DbConn>,
    guard: VerifierGuard,
    query: StudentListQuery,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let verifier = load_verifier(db, guard.auth.account_id).await?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).min(100);
    let skip = (page - 1) * limit;

    let filter = doc! { "college": verifier.college };

    let find_options = FindOptions::builder()
        .skip(skip as u64)
        .limit(limit)
        .sort(doc! { "profile_completeness": -1 })
        .build();

    let mut cursor = db.collection::<Student>("students")
        .find(filter.clone(), find_options)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;

    let mut students = Vec::new();
    while cursor.advance().await.map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))? {
        let student = cursor.deserialize_current()
            .map_err(|e| ApiError::internal_error(format!("Deserialization error: {}", e)))?;

        let status = profile_status(&student);
        let response: StudentResponse = student.into();
        students.push(serde_json::json!({
            "student": response,
            "strength": status.strength,
        }));
    }

    let total = db.collection::<Student>("students")
        .count_documents(filter, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Count error: {}", e)))?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "students": students,
        "pagination": {
            "page": page,
            "limit": limit,
            "total": total,
            "pages": (total as f64 / limit as f64).ceil() as i64,
        }
    }))))
}

#[openapi(tag = "Verifier")]
#[get("/verifier/students/<student_id>")]
pub async fn get_student_by_id(
    db: &State<DbConn>,
    guard: VerifierGuard,
    student_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let verifier = load_verifier(db, guard.auth.account_id).await?;

    let object_id = ObjectId::parse_str(&student_id)
        .map_err(|_| ApiError::bad_request("Invalid student ID"))?;

    let student = db.collection::<Student>("students")
        .find_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    if student.college != Some(verifier.college) {
        return Err(ApiError::forbidden("You can only view students of your college"));
    }

    let status = profile_status(&student);
    let status_json = serde_json::to_value(&status)
        .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
    let response: StudentResponse = student.into();

    Ok(Json(ApiResponse::success(serde_json::json!({
        "student": response,
        "profile_status": status_json,
    }))))
}
