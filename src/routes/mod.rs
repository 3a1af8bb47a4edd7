pub mod auth;
pub mod college;
pub mod profile;
pub mod resume;
pub mod linkedin;
pub mod github;
pub mod opportunity;
pub mod application;
pub mod verifier;
