pub mod prediction;
pub mod role;
pub mod user;
