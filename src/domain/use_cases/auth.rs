use chrono::Utc;
use deadpool_redis::Pool as RedisPool;
use uuid::Uuid;
use validator::Validate;

use crate::entities::token::AuthResponse;
use crate::entities::user::{LoginUser, NewUser, NewUserResponse, User};
use crate::errors::{AppError, AuthError};
use crate::interfaces::repositories::user::{UserRepository, EMAIL_TAKEN_MESSAGE};
use crate::auth::password::{hash_password, verify_password};
use crate::cache::redis::{
    is_token_revoked, remaining_ttl, revoke_token, ACCESS_DENY_PREFIX, REFRESH_DENY_PREFIX,
};
use crate::repositories::token::TokenServiceRepository;

pub struct AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub user_repo: R,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub fn new(user_repo: R, token_service: T) -> Self {
        AuthHandler {
            user_repo,
            token_service
        }
    }

    /// Registers a new user after validation and password hashing
    pub async fn register(&self, request: NewUser) -> Result<NewUserResponse, AppError> {
        request.validate()?;

        let email = request.normalized_email();
        if self.user_repo.email_exists(&email).await? {
            return Err(AppError::Conflict(EMAIL_TAKEN_MESSAGE.to_string()));
        }

        let hashed_password = hash_password(&request.password)?;
        let user_insert = request.prepare_for_insert(hashed_password);

        let id = self.user_repo.create_user(&user_insert).await?;
        tracing::info!(user_id = %id, role = %user_insert.role, "User registered");

        Ok(NewUserResponse {
            id,
            role: user_insert.role,
            message: "User created successfully".to_string(),
        })
    }

    /// Logs in a user by validating credentials and generating JWTs
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let user = self.user_repo.get_user_by_email(request.email.trim())
            .await
            .map_err(|_e| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!(user_id = %user.id, "User logged in successfully");
        Ok(response)
    }

    /// Create auth response
    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let access_token = self.token_service.create_jwt(user)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        let refresh_token = self.token_service.create_refresh_jwt(&user.id)
            .map_err(|e| {
                tracing::warn!("Failed to create refresh JWT: {}", e);
                AuthError::TokenCreation
            })?;
        Ok(AuthResponse::new(access_token, refresh_token, user.role))
    }

    /// Refreshes the access token using the refresh token
    pub async fn refresh_token(
        &self,
        token: &str,
        redis: Option<&RedisPool>,
    ) -> Result<AuthResponse, AuthError> {
        let decoded = self.token_service.decode_refresh_jwt(token)?;

        if let Some(pool) = redis {
            if is_token_revoked(pool, REFRESH_DENY_PREFIX, token).await? {
                return Err(AuthError::TokenRevoked);
            }
        }

        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AuthError::InvalidUserId)?;

        let user = self.user_repo.get_user_by_id(&user_id)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        self.create_auth_response(&user)
    }

    /// Puts both tokens on the deny list until they expire.
    pub async fn logout(
        &self,
        access_token: &str,
        refresh_token: &str,
        redis: Option<&RedisPool>,
    ) -> Result<(), AuthError> {
        let access = self.token_service.decode_jwt(access_token)?.claims;
        let refresh = self.token_service.decode_refresh_jwt(refresh_token)?.claims;

        if refresh.sub != access.sub {
            return Err(AuthError::InvalidToken);
        }

        let Some(pool) = redis else {
            tracing::warn!("Redis not configured; logout is stateless and tokens stay valid until expiry");
            return Ok(());
        };

        let now = Utc::now().timestamp() as usize;
        revoke_token(pool, ACCESS_DENY_PREFIX, access_token, remaining_ttl(access.exp, now)).await?;
        revoke_token(pool, REFRESH_DENY_PREFIX, refresh_token, remaining_ttl(refresh.exp, now)).await?;

        tracing::info!(user_id = %access.sub, "User logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{Header, TokenData};
    use mockall::predicate::eq;

    use crate::entities::token::{Claims, RefreshClaims, TokenType};
    use crate::entities::user::Role;
    use crate::interfaces::repositories::user::MockUserRepository;
    use crate::repositories::token::MockTokenServiceRepository;

    const STRONG_PASSWORD: &str = "Tr1cky#Lantern!";

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            role: Role::Employer,
            password: STRONG_PASSWORD.to_string(),
            password_confirm: STRONG_PASSWORD.to_string(),
        }
    }

    fn stored_user(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "hr@acme.test".into(),
            password_hash: hash_password(password).unwrap(),
            role: Role::Employer,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn token_service() -> MockTokenServiceRepository {
        let mut tokens = MockTokenServiceRepository::new();
        tokens.expect_create_jwt().returning(|_| Ok("access".into()));
        tokens.expect_create_refresh_jwt().returning(|_| Ok("refresh".into()));
        tokens
    }

    #[tokio::test]
    async fn register_rejects_taken_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists()
            .with(eq("taken@acme.test"))
            .returning(|_| Ok(true));
        repo.expect_create_user().never();

        let handler = AuthHandler::new(repo, MockTokenServiceRepository::new());
        let result = handler.register(new_user("Taken@Acme.test")).await;

        assert!(matches!(result, Err(AppError::Conflict(msg)) if msg == EMAIL_TAKEN_MESSAGE));
    }

    #[tokio::test]
    async fn register_creates_user_with_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().returning(|_| Ok(false));
        repo.expect_create_user()
            .withf(|insert| insert.email == "new@acme.test" && insert.role == Role::Employer)
            .returning(|_| Ok(Uuid::new_v4()));

        let handler = AuthHandler::new(repo, MockTokenServiceRepository::new());
        let response = handler.register(new_user("new@acme.test")).await.unwrap();

        assert_eq!(response.role, Role::Employer);
    }

    #[tokio::test]
    async fn register_validates_before_touching_the_repo() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().never();

        let handler = AuthHandler::new(repo, MockTokenServiceRepository::new());
        let mut request = new_user("not-an-email");
        request.password_confirm = "different".into();

        assert!(matches!(handler.register(request).await, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn login_returns_tokens_and_landing_page() {
        let user = stored_user(STRONG_PASSWORD);
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let handler = AuthHandler::new(repo, token_service());
        let response = handler
            .login(LoginUser { email: "hr@acme.test".into(), password: STRONG_PASSWORD.into() })
            .await
            .unwrap();

        assert_eq!(response.access_token, "access");
        assert_eq!(response.redirect_to, "my_jobs");
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_wrong_credentials() {
        let user = stored_user(STRONG_PASSWORD);
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let handler = AuthHandler::new(repo, MockTokenServiceRepository::new());
        let result = handler
            .login(LoginUser { email: "hr@acme.test".into(), password: "nope".into() })
            .await;

        assert!(matches!(result, Err(AuthError::WrongCredentials)));
    }

    #[tokio::test]
    async fn login_for_unknown_email_is_wrong_credentials() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_email().returning(|_| Ok(None));

        let handler = AuthHandler::new(repo, MockTokenServiceRepository::new());
        let result = handler
            .login(LoginUser { email: "ghost@acme.test".into(), password: "whatever".into() })
            .await;

        assert!(matches!(result, Err(AuthError::WrongCredentials)));
    }

    #[tokio::test]
    async fn refresh_issues_a_new_pair_for_existing_user() {
        let user = stored_user(STRONG_PASSWORD);
        let user_id = user.id;

        let mut tokens = token_service();
        tokens.expect_decode_refresh_jwt().returning(move |_| {
            Ok(TokenData {
                header: Header::default(),
                claims: RefreshClaims {
                    sub: user_id.to_string(),
                    token_type: TokenType::Refresh,
                    iat: 0,
                    exp: usize::MAX,
                },
            })
        });
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id()
            .with(eq(user_id))
            .returning(move |_| Ok(Some(user.clone())));

        let handler = AuthHandler::new(repo, tokens);
        let response = handler.refresh_token("refresh", None).await.unwrap();
        assert_eq!(response.refresh_token, "refresh");
    }

    #[tokio::test]
    async fn logout_rejects_tokens_of_different_users() {
        let mut tokens = MockTokenServiceRepository::new();
        tokens.expect_decode_jwt().returning(|_| {
            Ok(TokenData {
                header: Header::default(),
                claims: Claims {
                    sub: Uuid::new_v4().to_string(),
                    email: "a@b.c".into(),
                    role: Role::Student,
                    token_type: TokenType::Access,
                    exp: usize::MAX,
                    iat: 0,
                },
            })
        });
        tokens.expect_decode_refresh_jwt().returning(|_| {
            Ok(TokenData {
                header: Header::default(),
                claims: RefreshClaims {
                    sub: Uuid::new_v4().to_string(),
                    token_type: TokenType::Refresh,
                    iat: 0,
                    exp: usize::MAX,
                },
            })
        });

        let handler = AuthHandler::new(MockUserRepository::new(), tokens);
        assert!(matches!(
            handler.logout("access", "refresh", None).await,
            Err(AuthError::InvalidToken)
        ));
    }
}
