use deadpool_redis::Pool as RedisPool;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod telemetry;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases, password};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, cache, db, storage, utils};

use auth::jwt::JwtService;
use repositories::sqlx_repo::{
    SqlxApplicationRepo, SqlxJobRepo, SqlxProfileRepo, SqlxSavedRepo, SqlxUserRepo,
};
use storage::media::LocalMediaStore;
use use_cases::{
    applications::ApplicationHandler, auth::AuthHandler, jobs::JobHandler,
    profiles::ProfileHandler, saved::SavedHandler,
};

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService>;
pub type AppProfileHandler = ProfileHandler<SqlxProfileRepo, LocalMediaStore>;
pub type AppJobHandler = JobHandler<SqlxJobRepo, SqlxProfileRepo>;
pub type AppApplicationHandler = ApplicationHandler<SqlxApplicationRepo, SqlxJobRepo, LocalMediaStore>;
pub type AppSavedHandler = SavedHandler<SqlxSavedRepo, SqlxJobRepo>;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub profile_handler: AppProfileHandler,
    pub job_handler: AppJobHandler,
    pub application_handler: AppApplicationHandler,
    pub saved_handler: AppSavedHandler,
    pub redis_pool: Option<RedisPool>,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let media = LocalMediaStore::new(&config.media_root, config.max_upload_bytes);

        let auth_handler = AuthHandler::new(
            SqlxUserRepo::new(pool.clone()),
            JwtService::new(config),
        );
        let profile_handler = ProfileHandler::new(SqlxProfileRepo::new(pool.clone()), media.clone());
        let job_handler = JobHandler::new(
            SqlxJobRepo::new(pool.clone()),
            SqlxProfileRepo::new(pool.clone()),
        );
        let application_handler = ApplicationHandler::new(
            SqlxApplicationRepo::new(pool.clone()),
            SqlxJobRepo::new(pool.clone()),
            media,
        );
        let saved_handler = SavedHandler::new(
            SqlxSavedRepo::new(pool.clone()),
            SqlxJobRepo::new(pool),
        );

        let redis_pool = config.redis_url.as_ref().and_then(|url| {
            deadpool_redis::Config::from_url(url)
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .map_err(|e| tracing::error!("Redis pool creation error: {}", e))
                .ok()
        });

        AppState {
            auth_handler,
            profile_handler,
            job_handler,
            application_handler,
            saved_handler,
            redis_pool,
        }
    }
}
