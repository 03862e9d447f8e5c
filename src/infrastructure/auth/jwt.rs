use jsonwebtoken::{encode, Header, decode, Validation, TokenData, Algorithm};
use chrono::{Utc, Duration};
use uuid::Uuid;
use crate::entities::token::{Claims, RefreshClaims, TokenType};
use crate::entities::user::User;
use crate::repositories::token::TokenServiceRepository;
use crate::settings::{AppConfig, JwtKeys};
use crate::errors::AuthError;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;


#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_expiration: Duration,
    refresh_expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            access_expiration: Duration::minutes(config.jwt_expiration_minutes),
            refresh_expiration: Duration::days(config.refresh_token_exp_days),
        }
    }

    pub fn create_jwt(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = (now + self.access_expiration).timestamp() as usize;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            exp,
            token_type: TokenType::Access,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding).map_err(AuthError::from)
    }

    pub fn create_refresh_jwt(&self, user_id: &Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = (now + self.refresh_expiration).timestamp() as usize;

        let claims = RefreshClaims {
            sub: user_id.to_string(),
            exp,
            token_type: TokenType::Refresh,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.refresh_encoding).map_err(AuthError::from)
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        let data = decode::<Claims>(
            token,
            &self.keys.decoding,
            &validation
        )
        .map_err(AuthError::from)?;

        if data.claims.token_type != TokenType::Access {
            return Err(AuthError::InvalidToken);
        }
        Ok(data)
    }

    pub fn decode_refresh_jwt(&self, token: &str) -> Result<TokenData<RefreshClaims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        let data = decode::<RefreshClaims>(
            token,
            &self.keys.refresh_decoding,
            &validation,
        )
        .map_err(AuthError::from)?;

        if data.claims.token_type != TokenType::Refresh {
            return Err(AuthError::InvalidToken);
        }
        Ok(data)
    }
}

impl TokenServiceRepository for JwtService {
    fn create_jwt(&self, user: &User) -> Result<String, AuthError> {
        self.create_jwt(user)
    }

    fn create_refresh_jwt(&self, user_id: &Uuid) -> Result<String, AuthError> {
        self.create_refresh_jwt(user_id)
    }

    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        self.decode_jwt(token)
    }

    fn decode_refresh_jwt(&self, token: &str) -> Result<TokenData<RefreshClaims>, AuthError> {
        self.decode_refresh_jwt(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::Role;
    use crate::settings::AppEnvironment;

    fn service() -> JwtService {
        let config = AppConfig {
            env: AppEnvironment::Testing,
            name: "test".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_url: "postgres://localhost/jobboard_test".into(),
            redis_url: None,
            cors_allowed_origins: vec!["*".into()],
            jwt_secret: "access-secret-access-secret-access-secret".into(),
            jwt_expiration_minutes: 15,
            refresh_token_secret: "refresh-secret-refresh-secret-refresh-secret".into(),
            refresh_token_exp_days: 7,
            media_root: "media".into(),
            max_upload_bytes: 1024,
        };
        JwtService::new(&config)
    }

    fn employer() -> User {
        User {
            id: Uuid::new_v4(),
            email: "hr@acme.test".into(),
            password_hash: "hash".into(),
            role: Role::Employer,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn access_token_carries_role_and_subject() {
        let jwt = service();
        let user = employer();
        let token = jwt.create_jwt(&user).unwrap();
        let claims = jwt.decode_jwt(&token).unwrap().claims;

        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.role, Role::Employer);
        assert!(claims.is_employer());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_token_is_not_accepted_as_access_token() {
        let jwt = service();
        let refresh = jwt.create_refresh_jwt(&Uuid::new_v4()).unwrap();
        assert!(jwt.decode_jwt(&refresh).is_err());
        assert!(jwt.decode_refresh_jwt(&refresh).is_ok());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let jwt = service();
        let mut token = jwt.create_jwt(&employer()).unwrap();
        token.push('x');
        assert!(matches!(jwt.decode_jwt(&token), Err(AuthError::InvalidToken)));
    }
}
