use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, DateTime, oid::ObjectId};
use crate::db::DbConn;
use crate::models::{
    Alumni, AlumniResponse, AlumniSignupDto, College, LoginDto, Student, StudentResponse,
    StudentSignupDto, Verifier, VerifierSignupDto,
};
use crate::services::JwtService;
use crate::services::completeness::calculate_completeness;
use crate::utils::{validate_email, validate_password, ApiResponse, ApiError};

const LOGIN_LIMIT: i32 = 5;
const LOGIN_WINDOW_MS: i64 = 10 * 60 * 1000;

/// --------------------
/// Rate limiter helper
/// --------------------
async fn rate_limit(
    db: &DbConn,
    key: &str,
    limit: i32,
    window_ms: i64,
) -> Result<(), ApiError> {
    let now = chrono::Utc::now().timestamp_millis();
    let window_expires = DateTime::from_millis(now + window_ms);

    let collection = db.collection::<mongodb::bson::Document>("rate_limits");

    let entry = collection
        .find_one(doc! { "key": key }, None)
        .await
        .map_err(|_| ApiError::internal_error("Rate limiter lookup failed"))?;

    match entry {
        // First request OR expired window
        None => {
            collection
                .insert_one(
                    doc! {
                        "key": key,
                        "count": 1,
                        "expires_at": window_expires
                    },
                    None,
                )
                .await
                .map_err(|_| ApiError::internal_error("Rate limiter insert failed"))?;
            Ok(())
        }

        Some(d) => {
            let count = d.get_i32("count").unwrap_or(0);
            let expires_at = d.get_datetime("expires_at").ok();

            // Window expired → reset
            if expires_at.map(|e| *e < DateTime::now()).unwrap_or(true) {
                collection
                    .update_one(
                        doc! { "key": key },
                        doc! {
                            "$set": {
                                "count": 1,
                                "expires_at": window_expires
                            }
                        },
                        None,
                    )
                    .await
                    .map_err(|_| ApiError::internal_error("Rate limiter reset failed"))?;
                return Ok(());
            }

            // Limit exceeded
            if count >= limit {
                return Err(ApiError::too_many_requests(
                    "Too many login attempts. Please try later.",
                ));
            }

            // Increment count
            collection
                .update_one(
                    doc! { "key": key },
                    doc! { "$inc": { "count": 1 } },
                    None,
                )
                .await
                .map_err(|_| ApiError::internal_error("Rate limiter increment failed"))?;

            Ok(())
        }
    }
}

async fn find_college(db: &DbConn, college_id: &str) -> Result<College, ApiError> {
    let object_id = ObjectId::parse_str(college_id)
        .map_err(|_| ApiError::bad_request("Invalid college ID"))?;

    db.collection::<College>("colleges")
        .find_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("College not found"))
}

fn issue_tokens(account_id: &ObjectId, email: &str, role: &str) -> Result<(String, String), ApiError> {
    let access = JwtService::generate_access_token(account_id, email, role)
        .map_err(|_| ApiError::internal_error("Failed to issue access token"))?;
    let refresh = JwtService::generate_refresh_token(account_id, email, role)
        .map_err(|_| ApiError::internal_error("Failed to issue refresh token"))?;
    Ok((access, refresh))
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|_| ApiError::internal_error("Failed to hash password"))
}

fn verify_password(password: &str, hash: &str) -> Result<(), ApiError> {
    let ok = bcrypt::verify(password, hash)
        .map_err(|_| ApiError::internal_error("Failed to verify password"))?;
    if ok {
        Ok(())
    } else {
        Err(ApiError::unauthorized("Invalid email or password"))
    }
}

/// --------------------
/// Student auth
/// --------------------
#[openapi(tag = "Auth")]
#[post("/student/signup", data = "<dto>")]
pub async fn student_signup(
    db: &State<DbConn>,
    dto: Json<StudentSignupDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if dto.first_name.is_empty() || dto.last_name.is_empty() {
        return Err(ApiError::bad_request("First and last name are required"));
    }
    if !validate_email(&dto.email) {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if !validate_password(&dto.password) {
        return Err(ApiError::bad_request("Password must be at least 8 characters"));
    }

    let college = find_college(db, &dto.college_id).await?;

    let existing = db.collection::<Student>("students")
        .find_one(doc! { "email": &dto.email }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;
    if existing.is_some() {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let mut student = Student {
        id: None,
        first_name: dto.first_name.clone(),
        last_name: dto.last_name.clone(),
        email: dto.email.clone(),
        password: hash_password(&dto.password)?,
        image: dto.image.clone().filter(|i| !i.is_empty()),
        college: college.id,
        branch: None,
        graduation_year: None,
        skills: vec![],
        projects: vec![],
        certifications: vec![],
        preferred_roles: vec![],
        resume: None,
        linked_in: None,
        github_url: None,
        profile_completeness: 0,
        created_at: DateTime::now(),
        updated_at: DateTime::now(),
    };
    // Pin the score to the base of always-present fields from day one.
    student.profile_completeness = calculate_completeness(&student);

    let result = db.collection::<Student>("students")
        .insert_one(&student, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to create account: {}", e)))?;

    let student_id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::internal_error("Invalid inserted ID"))?;
    student.id = Some(student_id);

    let (access_token, refresh_token) = issue_tokens(&student_id, &student.email, "student")?;
    let response: StudentResponse = student.into();

    Ok(Json(ApiResponse::success_with_message(
        "Account created successfully".to_string(),
        serde_json::json!({
            "student": response,
            "access_token": access_token,
            "refresh_token": refresh_token,
        })
    )))
}

#[openapi(tag = "Auth")]
#[post("/student/login", data = "<dto>")]
pub async fn student_login(
    db: &State<DbConn>,
    dto: Json<LoginDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    rate_limit(
        db,
        &format!("login:student:{}", dto.email),
        LOGIN_LIMIT,
        LOGIN_WINDOW_MS,
    ).await?;

    let student = db.collection::<Student>("students")
        .find_one(doc! { "email": &dto.email }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    verify_password(&dto.password, &student.password)?;

    let student_id = student.id
        .ok_or_else(|| ApiError::internal_error("Student record missing ID"))?;
    let (access_token, refresh_token) = issue_tokens(&student_id, &student.email, "student")?;
    let response: StudentResponse = student.into();

    Ok(Json(ApiResponse::success(serde_json::json!({
        "student": response,
        "access_token": access_token,
        "refresh_token": refresh_token,
    }))))
}

/// --------------------
/// Alumni auth
/// --------------------
#[openapi(tag = "Auth")]
#[post("/alumni/signup", data = "<dto>")]
pub async fn alumni_signup(
    db: &State<DbConn>,
    dto: Json<AlumniSignupDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if dto.first_name.is_empty() || dto.last_name.is_empty() {
        return Err(ApiError::bad_request("First and last name are required"));
    }
    if !validate_email(&dto.email) {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if !validate_password(&dto.password) {
        return Err(ApiError::bad_request("Password must be at least 8 characters"));
    }

    let college = find_college(db, &dto.college_id).await?;
    let college_id = college.id
        .ok_or_else(|| ApiError::internal_error("College record missing ID"))?;

    let existing = db.collection::<Alumni>("alumni")
        .find_one(doc! { "email": &dto.email }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;
    if existing.is_some() {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let mut alumni = Alumni {
        id: None,
        first_name: dto.first_name.clone(),
        last_name: dto.last_name.clone(),
        email: dto.email.clone(),
        password: hash_password(&dto.password)?,
        college: college_id,
        company: dto.company.clone(),
        designation: dto.designation.clone(),
        created_at: DateTime::now(),
        updated_at: DateTime::now(),
    };

    let result = db.collection::<Alumni>("alumni")
        .insert_one(&alumni, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to create account: {}", e)))?;

    let alumni_id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::internal_error("Invalid inserted ID"))?;
    alumni.id = Some(alumni_id);

    let (access_token, refresh_token) = issue_tokens(&alumni_id, &alumni.email, "alumni")?;
    let response: AlumniResponse = alumni.into();

    Ok(Json(ApiResponse::success_with_message(
        "Account created successfully".to_string(),
        serde_json::json!({
            "alumni": response,
            "access_token": access_token,
            "refresh_token": refresh_token,
        })
    )))
}

#[openapi(tag = "Auth")]
#[post("/alumni/login", data = "<dto>")]
pub async fn alumni_login(
    db: &State<DbConn>,
    dto: Json<LoginDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    rate_limit(
        db,
        &format!("login:alumni:{}", dto.email),
        LOGIN_LIMIT,
        LOGIN_WINDOW_MS,
    ).await?;

    let alumni = db.collection::<Alumni>("alumni")
        .find_one(doc! { "email": &dto.email }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    verify_password(&dto.password, &alumni.password)?;

    let alumni_id = alumni.id
        .ok_or_else(|| ApiError::internal_error("Alumni record missing ID"))?;
    let (access_token, refresh_token) = issue_tokens(&alumni_id, &alumni.email, "alumni")?;
    let response: AlumniResponse = alumni.into();

    Ok(Json(ApiResponse::success(serde_json::json!({
        "alumni": response,
        "access_token": access_token,
        "refresh_token": refresh_token,
    }))))
}

/// --------------------
/// Verifier auth (minimal role)
/// --------------------
#[openapi(tag = "Auth")]
#[post("/verifier/signup", data = "<dto>")]
pub async fn verifier_signup(
    db: &State<DbConn>,
    dto: Json<VerifierSignupDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if dto.name.is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if !validate_email(&dto.email) {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if !validate_password(&dto.password) {
        return Err(ApiError::bad_request("Password must be at least 8 characters"));
    }

    let college = find_college(db, &dto.college_id).await?;
    let college_id = college.id
        .ok_or_else(|| ApiError::internal_error("College record missing ID"))?;

    let existing = db.collection::<Verifier>("verifiers")
        .find_one(doc! { "email": &dto.email }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;
    if existing.is_some() {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let verifier = Verifier {
        id: None,
        name: dto.name.clone(),
        email: dto.email.clone(),
        password: hash_password(&dto.password)?,
        college: college_id,
        created_at: DateTime::now(),
        updated_at: DateTime::now(),
    };

    let result = db.collection::<Verifier>("verifiers")
        .insert_one(&verifier, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to create account: {}", e)))?;

    let verifier_id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::internal_error("Invalid inserted ID"))?;

    let (access_token, refresh_token) = issue_tokens(&verifier_id, &verifier.email, "verifier")?;

    Ok(Json(ApiResponse::success_with_message(
        "Account created successfully".to_string(),
        serde_json::json!({
            "verifier": {
                "id": verifier_id.to_hex(),
                "name": verifier.name,
                "email": verifier.email,
                "college": college_id.to_hex(),
            },
            "access_token": access_token,
            "refresh_token": refresh_token,
        })
    )))
}

#[openapi(tag = "Auth")]
#[post("/verifier/login", data = "<dto>")]
pub async fn verifier_login(
    db: &State<DbConn>,
    dto: Json<LoginDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    rate_limit(
        db,
        &format!("login:verifier:{}", dto.email),
        LOGIN_LIMIT,
        LOGIN_WINDOW_MS,
    ).await?;

    let verifier = db.collection::<Verifier>("verifiers")
        .find_one(doc! { "email": &dto.email }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    verify_password(&dto.password, &verifier.password)?;

    let verifier_id = verifier.id
        .ok_or_else(|| ApiError::internal_error("Verifier record missing ID"))?;
    let (access_token, refresh_token) = issue_tokens(&verifier_id, &verifier.email, "verifier")?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "verifier": {
            "id": verifier_id.to_hex(),
            "name": verifier.name,
            "email": verifier.email,
            "college": verifier.college.to_hex(),
        },
        "access_token": access_token,
        "refresh_token": refresh_token,
    }))))
}

/// --------------------
/// Token refresh
/// --------------------
#[derive(serde::Deserialize, rocket_okapi::okapi::schemars::JsonSchema)]
pub struct RefreshTokenDto {
    pub refresh_token: String,
}

#[openapi(tag = "Auth")]
#[post("/auth/refresh", data = "<dto>")]
pub async fn refresh_token(
    dto: Json<RefreshTokenDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let claims = JwtService::verify_token(&dto.refresh_token, true)
        .map_err(|_| ApiError::unauthorized("Invalid or expired refresh token"))?;

    let account_id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| ApiError::unauthorized("Invalid token subject"))?;

    let (access_token, refresh_token) = issue_tokens(&account_id, &claims.email, &claims.role)?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
    }))))
}
