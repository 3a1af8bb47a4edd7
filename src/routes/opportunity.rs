use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, DateTime, oid::ObjectId, to_bson};
use mongodb::options::FindOptions;
use crate::db::DbConn;
use crate::guards::{AlumniGuard, StudentGuard};
use crate::models::{
    CreateOpportunityDto, Opportunity, OpportunityResponse, OpportunityStatus, Student,
    UpdateOpportunityDto,
};
use crate::utils::{ApiResponse, ApiError};

pub(crate) async fn load_opportunity(
    db: &DbConn,
    opportunity_id: &str,
) -> Result<Opportunity, ApiError> {
    let object_id = ObjectId::parse_str(opportunity_id)
        .map_err(|_| ApiError::bad_request("Invalid opportunity ID"))?;

    db.collection::<Opportunity>("opportunities")
        .find_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Opportunity not found"))
}

async fn collect_opportunities(
    db: &DbConn,
    filter: mongodb::bson::Document,
) -> Result<Vec<OpportunityResponse>, ApiError> {
    let find_options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();

    let mut cursor = db.collection::<Opportunity>("opportunities")
        .find(filter, find_options)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;

    let mut opportunities = Vec::new();
    while cursor.advance().await.map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))? {
        let opportunity = cursor.deserialize_current()
            .map_err(|e| ApiError::internal_error(format!("Deserialization error: {}", e)))?;
        opportunities.push(OpportunityResponse::from(opportunity));
    }

    Ok(opportunities)
}

#[openapi(tag = "Opportunities")]
#[post("/opportunities/create", data = "<dto>")]
pub async fn create_opportunity(
    db: &State<DbConn>,
    guard: AlumniGuard,
    dto: Json<CreateOpportunityDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if dto.job_title.is_empty() || dto.role_description.is_empty() {
        return Err(ApiError::bad_request("Job title and role description are required"));
    }
    if dto.experience_level.is_empty() {
        return Err(ApiError::bad_request("Experience level is required"));
    }
    if dto.number_of_referrals < 1 {
        return Err(ApiError::bad_request("Number of referrals must be at least 1"));
    }

    let alumni = db.collection::<crate::models::Alumni>("alumni")
        .find_one(doc! { "_id": guard.auth.account_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Alumni not found"))?;

    let opportunity = Opportunity {
        id: None,
        job_title: dto.job_title.clone(),
        role_description: dto.role_description.clone(),
        required_skills: dto.required_skills.clone(),
        experience_level: dto.experience_level.clone(),
        number_of_referrals: dto.number_of_referrals,
        referrals_given: 0,
        posted_by: guard.auth.account_id,
        college: alumni.college,
        status: OpportunityStatus::Open,
        created_at: DateTime::now(),
        updated_at: DateTime::now(),
    };

    let result = db.collection::<Opportunity>("opportunities")
        .insert_one(&opportunity, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to create opportunity: {}", e)))?;

    let opportunity_id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::internal_error("Invalid inserted ID"))?;

    Ok(Json(ApiResponse::success_with_message(
        "Opportunity created successfully".to_string(),
        serde_json::json!({ "opportunity_id": opportunity_id.to_hex() })
    )))
}

/// Open opportunities for the student's college.
#[openapi(tag = "Opportunities")]
#[get("/opportunities")]
pub async fn get_opportunities(
    db: &State<DbConn>,
    guard: StudentGuard,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let student = db.collection::<Student>("students")
        .find_one(doc! { "_id": guard.auth.account_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    let college = student.college
        .ok_or_else(|| ApiError::bad_request("Select your college before browsing opportunities"))?;

    let opportunities = collect_opportunities(
        db,
        doc! { "college": college, "status": "Open" },
    ).await?;

    let count = opportunities.len();
    Ok(Json(ApiResponse::success(serde_json::json!({
        "opportunities": opportunities,
        "count": count,
    }))))
}

#[openapi(tag = "Opportunities")]
#[get("/my-opportunities")]
pub async fn get_my_opportunities(
    db: &State<DbConn>,
    guard: AlumniGuard,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let opportunities = collect_opportunities(
        db,
        doc! { "posted_by": guard.auth.account_id },
    ).await?;

    let count = opportunities.len();
    Ok(Json(ApiResponse::success(serde_json::json!({
        "opportunities": opportunities,
        "count": count,
    }))))
}

#[openapi(tag = "Opportunities")]
#[put("/opportunities/<opportunity_id>", data = "<dto>")]
pub async fn update_opportunity(
    db: &State<DbConn>,
    guard: AlumniGuard,
    opportunity_id: String,
    dto: Json<UpdateOpportunityDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let opportunity = load_opportunity(db, &opportunity_id).await?;

    if opportunity.posted_by != guard.auth.account_id {
        return Err(ApiError::forbidden("You can only edit your own opportunities"));
    }

    if let Some(referrals) = dto.number_of_referrals {
        if referrals < 1 {
            return Err(ApiError::bad_request("Number of referrals must be at least 1"));
        }
        if referrals < opportunity.referrals_given {
            return Err(ApiError::bad_request(
                "Number of referrals cannot be below referrals already given",
            ));
        }
    }

    let mut update_doc = doc! {
        "updated_at": DateTime::now()
    };

    if let Some(ref job_title) = dto.job_title {
        update_doc.insert("job_title", job_title);
    }
    if let Some(ref role_description) = dto.role_description {
        update_doc.insert("role_description", role_description);
    }
    if let Some(ref required_skills) = dto.required_skills {
        update_doc.insert("required_skills", required_skills);
    }
    if let Some(ref experience_level) = dto.experience_level {
        update_doc.insert("experience_level", experience_level);
    }
    if let Some(referrals) = dto.number_of_referrals {
        update_doc.insert("number_of_referrals", referrals);
    }
    if let Some(status) = dto.status {
        let status = to_bson(&status)
            .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
        update_doc.insert("status", status);
    }

    db.collection::<Opportunity>("opportunities")
        .update_one(
            doc! { "_id": opportunity.id },
            doc! { "$set": update_doc },
            None
        )
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update opportunity: {}", e)))?;

    Ok(Json(ApiResponse::success_with_message(
        "Opportunity updated successfully".to_string(),
        serde_json::json!({ "opportunity_id": opportunity_id })
    )))
}

#[openapi(tag = "Opportunities")]
#[delete("/opportunities/<opportunity_id>")]
pub async fn delete_opportunity(
    db: &State<DbConn>,
    guard: AlumniGuard,
    opportunity_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let opportunity = load_opportunity(db, &opportunity_id).await?;

    if opportunity.posted_by != guard.auth.account_id {
        return Err(ApiError::forbidden("You can only delete your own opportunities"));
    }

    db.collection::<Opportunity>("opportunities")
        .delete_one(doc! { "_id": opportunity.id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to delete opportunity: {}", e)))?;

    Ok(Json(ApiResponse::success_with_message(
        "Opportunity deleted successfully".to_string(),
        serde_json::json!({ "opportunity_id": opportunity_id })
    )))
}
