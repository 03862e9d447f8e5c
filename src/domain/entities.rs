pub mod application;
pub mod job;
pub mod pagination;
pub mod profile;
pub mod saved;
pub mod token;
pub mod user;
