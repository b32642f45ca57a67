pub mod app_error;
pub mod jwt;
pub mod password;
pub mod use_cases;
pub mod validators;
