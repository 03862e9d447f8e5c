use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use async_trait::async_trait;
use jobboard_backend::{
    db::postgres::{create_pool, run_migrations},
    entities::{
        token::AuthResponse,
        user::{LoginUser, NewUser, Role},
    },
    middlewares::auth::AuthMiddleware,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    AppState,
};
use reqwest::Client;
use sqlx::PgPool;
use std::{net::TcpListener, path::{Path, PathBuf}, time::Duration};
use uuid::Uuid;

use crate::test_user::{employer_profile_body, login_for, new_user};

pub const TEST_DATABASE_ENV: &str = "APP_TEST_DATABASE_URL";
pub const TEST_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub client: Client,
    pub media_root: PathBuf,
}

pub fn test_config(database_url: String, media_root: &Path) -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "JobBoard-API Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url,
        redis_url: std::env::var("APP_TEST_REDIS_URL").ok(),
        cors_allowed_origins: vec!["*".to_string()],
        jwt_secret: "test_jwt_secret_that_is_long_enough_for_hs512_1234567890".into(),
        jwt_expiration_minutes: 5,
        refresh_token_secret: "test_refresh_secret_that_is_long_enough_1234567890".into(),
        refresh_token_exp_days: 1,
        media_root: media_root.to_string_lossy().into_owned(),
        max_upload_bytes: TEST_MAX_UPLOAD_BYTES,
    }
}

impl TestApp {
    /// Spawns the full server against the database in `APP_TEST_DATABASE_URL`.
    /// Returns `None` when it is not set so the suite can run without Postgres.
    pub async fn try_spawn() -> Option<Self> {
        let Ok(database_url) = std::env::var(TEST_DATABASE_ENV) else {
            eprintln!("{TEST_DATABASE_ENV} not set, skipping end-to-end test");
            return None;
        };

        let media_root = std::env::temp_dir().join(format!("jobboard-test-{}", Uuid::new_v4()));
        let config = test_config(database_url, &media_root);

        let db_pool = create_pool(&config.database_url)
            .await
            .expect("Failed to create test DB pool");

        run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state = web::Data::new(AppState::new(&config, db_pool.clone()));
        let max_upload_bytes = config.max_upload_bytes;

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(AuthMiddleware)
                .wrap(NormalizePath::trim())
                .configure(|cfg| configure_routes(cfg, max_upload_bytes))
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Some(Self {
            address,
            db_pool,
            client,
            media_root,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

#[async_trait]
pub trait JobBoardTestHelpers: Send + Sync {
    async fn register_user(&self, user: &NewUser) -> reqwest::Response;
    async fn login_user(&self, credentials: &LoginUser) -> AuthResponse;
    /// Registers a fresh user of `role` and logs it in.
    async fn signed_in(&self, role: Role) -> AuthResponse;
    /// An employer whose profile already allows posting jobs.
    async fn ready_employer(&self) -> AuthResponse;
    async fn post_job(&self, token: &str, title: &str) -> serde_json::Value;
}

#[async_trait]
impl JobBoardTestHelpers for TestApp {
    async fn register_user(&self, user: &NewUser) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/auth/register"))
            .json(user)
            .send()
            .await
            .expect("Failed to register user")
    }

    async fn login_user(&self, credentials: &LoginUser) -> AuthResponse {
        let response = self.client
            .post(self.url("/api/v1/auth/login"))
            .json(credentials)
            .send()
            .await
            .expect("Failed to login user");

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            panic!("Login failed: ({}): {}", status, body);
        }

        response.json().await.expect("Failed to parse login response")
    }

    async fn signed_in(&self, role: Role) -> AuthResponse {
        let user = new_user(role);
        let response = self.register_user(&user).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        self.login_user(&login_for(&user)).await
    }

    async fn ready_employer(&self) -> AuthResponse {
        let auth = self.signed_in(Role::Employer).await;
        let response = self.client
            .put(self.url("/api/v1/employer/profile"))
            .bearer_auth(&auth.access_token)
            .json(&employer_profile_body())
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        auth
    }

    async fn post_job(&self, token: &str, title: &str) -> serde_json::Value {
        let response = self.client
            .post(self.url("/api/v1/employer/jobs"))
            .bearer_auth(token)
            .json(&crate::test_user::job_body(title))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.media_root);
    }
}
