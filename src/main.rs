#[macro_use]
extern crate rocket;

mod config;
mod db;
mod guards;
mod models;
mod routes;
mod services;
mod utils;

use dotenvy::dotenv;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::{Build, Request, Response, Rocket};
use rocket_okapi::swagger_ui::{SwaggerUIConfig, make_swagger_ui};

/* ----------------------------- CORS ----------------------------- */

pub struct CORS;

#[rocket::async_trait]
impl Fairing for CORS {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        if let Some(origin) = request.headers().get_one("Origin") {
            response.set_header(Header::new("Access-Control-Allow-Origin", origin));
        }

        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, PUT, DELETE, OPTIONS",
        ));

        response.set_header(Header::new(
            "Access-Control-Allow-Headers",
            "Content-Type, Authorization",
        ));

        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

/* ----------------------------- OPTIONS ----------------------------- */

#[options("/<_..>")]
fn options_handler() {}

/* ----------------------------- ERRORS ----------------------------- */

#[catch(404)]
fn not_found() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Resource not found (check /api/v1 prefix)"
    })
}

#[catch(500)]
fn internal_error() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Internal server error"
    })
}

/* ----------------------------- SWAGGER ----------------------------- */

fn swagger_config() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/openapi.json".to_string(),
        ..Default::default()
    }
}

/* ----------------------------- LAUNCH ----------------------------- */

#[launch]
fn rocket() -> Rocket<Build> {
    dotenv().ok();
    env_logger::init();

    println!("🚀 RefConnect API running");
    println!("📚 Swagger UI → http://localhost:8000/api/docs");

    rocket::build()
        .attach(db::init())
        .attach(CORS)
        .mount("/", routes![options_handler])
        .mount(
            "/api/v1",
            routes![
                // Auth
                routes::auth::student_signup,
                routes::auth::student_login,
                routes::auth::alumni_signup,
                routes::auth::alumni_login,
                routes::auth::verifier_signup,
                routes::auth::verifier_login,
                routes::auth::refresh_token,
                // Colleges
                routes::college::get_colleges,
                // Student profile
                routes::profile::get_profile,
                routes::profile::update_profile,
                routes::profile::get_profile_status,
                // Resume
                routes::resume::upload_resume,
                routes::resume::update_resume,
                routes::resume::get_resume,
                routes::resume::delete_resume,
                // LinkedIn
                routes::linkedin::upload_linkedin,
                routes::linkedin::update_linkedin_pdf,
                routes::linkedin::update_linkedin_url,
                routes::linkedin::get_linkedin,
                routes::linkedin::delete_linkedin,
                // GitHub
                routes::github::add_github_url,
                routes::github::update_github_url,
                routes::github::get_github_url,
                routes::github::delete_github_url,
                // Opportunities
                routes::opportunity::create_opportunity,
                routes::opportunity::get_opportunities,
                routes::opportunity::get_my_opportunities,
                routes::opportunity::update_opportunity,
                routes::opportunity::delete_opportunity,
                // Applications
                routes::application::apply,
                routes::application::get_my_applications,
                routes::application::get_applications_for_opportunity,
                routes::application::shortlist_application,
                routes::application::refer_application,
                routes::application::reject_application,
                // Verifier
                routes::verifier::get_students,
                routes::verifier::get_student_by_id,
            ],
        )
        .mount("/api/docs", make_swagger_ui(&swagger_config()))
        .register("/", catchers![not_found, internal_error])
}
