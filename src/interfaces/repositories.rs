pub mod application;
pub mod job;
pub mod profile;
pub mod saved;
pub mod sqlx_repo;
pub mod token;
pub mod user;
