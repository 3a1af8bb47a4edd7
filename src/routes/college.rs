use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::doc;
use mongodb::options::FindOptions;
use crate::db::DbConn;
use crate::models::{College, CollegeResponse};
use crate::utils::{ApiResponse, ApiError};

/// Public list backing the signup forms.
#[openapi(tag = "Colleges")]
#[get("/colleges")]
pub async fn get_colleges(
    db: &State<DbConn>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let find_options = FindOptions::builder()
        .sort(doc! { "name": 1 })
        .build();

    let mut cursor = db.collection::<College>("colleges")
        .find(doc! {}, find_options)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;

    let mut colleges: Vec<CollegeResponse> = Vec::new();
    while cursor.advance().await.map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))? {
        let college = cursor.deserialize_current()
            .map_err(|e| ApiError::internal_error(format!("Deserialization error: {}", e)))?;
        colleges.push(CollegeResponse::from(college));
    }

    let count = colleges.len();
    Ok(Json(ApiResponse::success(serde_json::json!({
        "colleges": colleges,
        "count": count,
    }))))
}
