pub mod applications;
pub mod auth;
pub mod home;
pub mod jobs;
pub mod payload_error;
pub mod profile;
pub mod saved;
pub mod system;
