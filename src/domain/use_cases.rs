pub mod applications;
pub mod auth;
pub mod extractors;
pub mod jobs;
pub mod profiles;
pub mod saved;
