pub mod history;
pub mod user;
