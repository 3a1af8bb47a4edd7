pub mod completeness;
pub mod document;
pub mod gate;
pub mod jwt;

pub use jwt::JwtService;
