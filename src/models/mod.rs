pub mod student;
pub mod alumni;
pub mod verifier;
pub mod college;
pub mod opportunity;
pub mod application;

pub use student::*;
pub use alumni::*;
pub use verifier::*;
pub use college::*;
pub use opportunity::*;
pub use application::*;
