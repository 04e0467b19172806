pub mod admin;
pub mod auth;
pub mod stus;
pub mod users;
