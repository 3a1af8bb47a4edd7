use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, DateTime, oid::ObjectId, to_bson};
use mongodb::options::FindOptions;
use crate::db::DbConn;
use crate::guards::{AlumniGuard, StudentGuard};
use crate::models::{
    Application, ApplicationStatus, ApplyDto, Opportunity, OpportunityStatus, ProfileSnapshot,
    ResumeSnapshot, StatusHistoryEntry,
};
use crate::routes::opportunity::load_opportunity;
use crate::routes::profile::load_student;
use crate::services::completeness::profile_status;
use crate::services::gate::{GateDecision, GateFlow};
use crate::utils::{ApiResponse, ApiError};

async fn load_application(db: &DbConn, application_id: &str) -> Result<Application, ApiError> {
    let object_id = ObjectId::parse_str(application_id)
        .map_err(|_| ApiError::bad_request("Invalid application ID"))?;

    db.collection::<Application>("applications")
        .find_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Application not found"))
}

fn application_json(application: &Application) -> serde_json::Value {
    serde_json::json!({
        "id": application.id.map(|id| id.to_hex()),
        "opportunity": application.opportunity.to_hex(),
        "student": application.student.to_hex(),
        "status": application.status.as_str(),
        "applied_at": application.applied_at,
        "shortlisted_at": application.shortlisted_at,
        "referred_at": application.referred_at,
        "rejected_at": application.rejected_at,
        "profile_snapshot": {
            "first_name": application.profile_snapshot.first_name,
            "last_name": application.profile_snapshot.last_name,
            "email": application.profile_snapshot.email,
            "branch": application.profile_snapshot.branch,
            "graduation_year": application.profile_snapshot.graduation_year,
            "skills": application.profile_snapshot.skills,
            "profile_completeness": application.profile_snapshot.profile_completeness,
        },
        "resume_snapshot": application.resume_snapshot.as_ref().map(|r| serde_json::json!({
            "file_name": r.file_name,
            "file_size": r.file_size,
            "content_type": r.content_type,
            "uploaded_at": r.uploaded_at,
        })),
    })
}

/// Apply for a referral. The application gate runs first: a profile below
/// 100% completeness is rejected with the sections still to finish, and the
/// client walks the remediation wizard before retrying.
#[openapi(tag = "Applications")]
#[post("/apply", data = "<dto>")]
pub async fn apply(
    db: &State<DbConn>,
    guard: StudentGuard,
    dto: Json<ApplyDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let student = load_student(db, guard.auth.account_id).await?;

    let status = profile_status(&student);
    let flow = match GateFlow::gate(&status, dto.opportunity_id.clone()) {
        GateDecision::Proceed => None,
        GateDecision::Remediate(flow) => Some(flow),
    };
    if let Some(flow) = flow {
        let sections: Vec<&str> = flow.steps().iter().map(|s| s.label()).collect();
        return Err(ApiError::bad_request(format!(
            "Profile is {}% complete. Finish these sections before applying: {}",
            flow.last_completeness(),
            sections.join(", ")
        )));
    }

    let opportunity = load_opportunity(db, &dto.opportunity_id).await?;
    let opportunity_id = opportunity.id
        .ok_or_else(|| ApiError::internal_error("Opportunity record missing ID"))?;

    if !opportunity.is_active() {
        return Err(ApiError::bad_request(
            "This opportunity is no longer accepting applications",
        ));
    }

    if student.college != Some(opportunity.college) {
        return Err(ApiError::forbidden(
            "You can only apply to opportunities posted for your college",
        ));
    }

    let student_id = student.id
        .ok_or_else(|| ApiError::internal_error("Student record missing ID"))?;

    let existing = db.collection::<Application>("applications")
        .find_one(
            doc! { "opportunity": opportunity_id, "student": student_id },
            None
        )
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;
    if existing.is_some() {
        return Err(ApiError::conflict("You have already applied to this opportunity"));
    }

    let now = DateTime::now();
    let application = Application {
        id: None,
        opportunity: opportunity_id,
        student: student_id,
        alumni: opportunity.posted_by,
        status: ApplicationStatus::Applied,
        resume_snapshot: student.resume.as_ref().map(|r| ResumeSnapshot {
            file_name: r.file_name.clone(),
            file_size: r.file_size,
            content_type: r.content_type.clone(),
            uploaded_at: r.uploaded_at,
        }),
        profile_snapshot: ProfileSnapshot {
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
            branch: student.branch.clone(),
            graduation_year: student.graduation_year,
            skills: student.skills.clone(),
            profile_completeness: student.profile_completeness,
        },
        applied_at: now,
        shortlisted_at: None,
        referred_at: None,
        rejected_at: None,
        status_history: vec![StatusHistoryEntry {
            status: ApplicationStatus::Applied,
            timestamp: now,
            note: None,
        }],
    };

    let result = db.collection::<Application>("applications")
        .insert_one(&application, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to submit application: {}", e)))?;

    let application_id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::internal_error("Invalid inserted ID"))?;

    Ok(Json(ApiResponse::success_with_message(
        "Application submitted successfully".to_string(),
        serde_json::json!({
            "application_id": application_id.to_hex(),
            "status": ApplicationStatus::Applied.as_str(),
        })
    )))
}

#[openapi(tag = "Applications")]
#[get("/my-applications")]
pub async fn get_my_applications(
    db: &State<DbConn>,
    guard: StudentGuard,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let find_options = FindOptions::builder()
        .sort(doc! { "applied_at": -1 })
        .build();

    let mut cursor = db.collection::<Application>("applications")
        .find(doc! { "student": guard.auth.account_id }, find_options)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;

    let mut applications = Vec::new();
    while cursor.advance().await.map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))? {
        let application = cursor.deserialize_current()
            .map_err(|e| ApiError::internal_error(format!("Deserialization error: {}", e)))?;

        let opportunity = db.collection::<Opportunity>("opportunities")
            .find_one(doc! { "_id": application.opportunity }, None)
            .await
            .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;

        let mut entry = application_json(&application);
        entry["opportunity_details"] = opportunity
            .map(|o| serde_json::json!({
                "job_title": o.job_title,
                "experience_level": o.experience_level,
                "status": o.status,
            }))
            .unwrap_or(serde_json::Value::Null);
        applications.push(entry);
    }

    let count = applications.len();
    Ok(Json(ApiResponse::success(serde_json::json!({
        "applications": applications,
        "count": count,
    }))))
}

/// All applications for one of the alumni's own opportunities.
#[openapi(tag = "Applications")]
#[get("/applications/<opportunity_id>")]
pub async fn get_applications_for_opportunity(
    db: &State<DbConn>,
    guard: AlumniGuard,
    opportunity_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let opportunity = load_opportunity(db, &opportunity_id).await?;

    if opportunity.posted_by != guard.auth.account_id {
        return Err(ApiError::forbidden(
            "You can only view applications for your own opportunities",
        ));
    }

    let find_options = FindOptions::builder()
        .sort(doc! { "applied_at": -1 })
        .build();

    let mut cursor = db.collection::<Application>("applications")
        .find(doc! { "opportunity": opportunity.id }, find_options)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;

    let mut applications = Vec::new();
    while cursor.advance().await.map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))? {
        let application = cursor.deserialize_current()
            .map_err(|e| ApiError::internal_error(format!("Deserialization error: {}", e)))?;
        applications.push(application_json(&application));
    }

    let count = applications.len();
    Ok(Json(ApiResponse::success(serde_json::json!({
        "applications": applications,
        "count": count,
    }))))
}

async fn transition_application(
    db: &DbConn,
    application: &Application,
    new_status: ApplicationStatus,
    timestamp_field: &str,
) -> Result<(), ApiError> {
    let now = DateTime::now();
    let status = to_bson(&new_status)
        .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
    let history_entry = to_bson(&StatusHistoryEntry {
        status: new_status,
        timestamp: now,
        note: None,
    })
    .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;

    db.collection::<Application>("applications")
        .update_one(
            doc! { "_id": application.id },
            doc! {
                "$set": { "status": status, timestamp_field: now },
                "$push": { "status_history": history_entry },
            },
            None
        )
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update application: {}", e)))?;

    Ok(())
}

fn require_owner(application: &Application, guard: &AlumniGuard) -> Result<(), ApiError> {
    if application.alumni != guard.auth.account_id {
        return Err(ApiError::forbidden(
            "You can only manage applications for your own opportunities",
        ));
    }
    Ok(())
}

#[openapi(tag = "Applications")]
#[post("/applications/<application_id>/shortlist")]
pub async fn shortlist_application(
    db: &State<DbConn>,
    guard: AlumniGuard,
    application_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let application = load_application(db, &application_id).await?;
    require_owner(&application, &guard)?;

    if application.status != ApplicationStatus::Applied {
        return Err(ApiError::bad_request("Only applied candidates can be shortlisted"));
    }

    transition_application(db, &application, ApplicationStatus::Shortlisted, "shortlisted_at").await?;

    Ok(Json(ApiResponse::success_with_message(
        "Candidate shortlisted successfully".to_string(),
        serde_json::json!({ "application_id": application_id })
    )))
}

/// Marking a candidate referred consumes one referral slot; the opportunity
/// closes automatically when the last slot is used.
#[openapi(tag = "Applications")]
#[post("/applications/<application_id>/refer")]
pub async fn refer_application(
    db: &State<DbConn>,
    guard: AlumniGuard,
    application_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let application = load_application(db, &application_id).await?;
    require_owner(&application, &guard)?;

    if !matches!(
        application.status,
        ApplicationStatus::Applied | ApplicationStatus::Shortlisted
    ) {
        return Err(ApiError::bad_request(
            "Only applied or shortlisted candidates can be referred",
        ));
    }

    let opportunity = db.collection::<Opportunity>("opportunities")
        .find_one(doc! { "_id": application.opportunity }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Opportunity not found"))?;

    if opportunity.referrals_given >= opportunity.number_of_referrals {
        return Err(ApiError::bad_request(
            "All referral slots for this opportunity have been used",
        ));
    }

    transition_application(db, &application, ApplicationStatus::Referred, "referred_at").await?;

    let referrals_given = opportunity.referrals_given + 1;
    let mut update_doc = doc! {
        "referrals_given": referrals_given,
        "updated_at": DateTime::now(),
    };
    if referrals_given >= opportunity.number_of_referrals {
        let closed = to_bson(&OpportunityStatus::Closed)
            .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
        update_doc.insert("status", closed);
    }

    db.collection::<Opportunity>("opportunities")
        .update_one(
            doc! { "_id": application.opportunity },
            doc! { "$set": update_doc },
            None
        )
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update opportunity: {}", e)))?;

    Ok(Json(ApiResponse::success_with_message(
        "Candidate referred successfully".to_string(),
        serde_json::json!({
            "application_id": application_id,
            "referrals_given": referrals_given,
            "opportunity_closed": referrals_given >= opportunity.number_of_referrals,
        })
    )))
}

#[openapi(tag = "Applications")]
#[post("/applications/<application_id>/reject")]
pub async fn reject_application(
    db: &State<DbConn>,
    guard: AlumniGuard,
    application_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let application = load_application(db, &application_id).await?;
    require_owner(&application, &guard)?;

    if matches!(
        application.status,
        ApplicationStatus::Referred | ApplicationStatus::Rejected
    ) {
        return Err(ApiError::bad_request(
            "Referred or already rejected candidates cannot be rejected",
        ));
    }

    transition_application(db, &application, ApplicationStatus::Rejected, "rejected_at").await?;

    Ok(Json(ApiResponse::success_with_message(
        "Candidate rejected".to_string(),
        serde_json::json!({ "application_id": application_id })
    )))
}
