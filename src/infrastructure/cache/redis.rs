use deadpool_redis::Pool as RedisPool;
use redis::AsyncCommands;

use crate::errors::AuthError;

pub const ACCESS_DENY_PREFIX: &str = "access_deny";
pub const REFRESH_DENY_PREFIX: &str = "refresh_deny";

pub fn deny_key(prefix: &str, token: &str) -> String {
    format!("{prefix}:{token}")
}

/// Puts `token` on the deny list until it would have expired anyway.
pub async fn revoke_token(
    pool: &RedisPool,
    prefix: &str,
    token: &str,
    ttl_seconds: u64,
) -> Result<(), AuthError> {
    if ttl_seconds == 0 {
        return Ok(());
    }

    let mut conn = pool
        .get()
        .await
        .map_err(|e| AuthError::RedisOperation(e.to_string()))?;

    conn.set_ex::<_, _, ()>(deny_key(prefix, token), 1u8, ttl_seconds)
        .await
        .map_err(|e| AuthError::RedisOperation(e.to_string()))
}

pub async fn is_token_revoked(
    pool: &RedisPool,
    prefix: &str,
    token: &str,
) -> Result<bool, AuthError> {
    let mut conn = pool
        .get()
        .await
        .map_err(|e| AuthError::RedisOperation(e.to_string()))?;

    conn.exists(deny_key(prefix, token))
        .await
        .map_err(|e| AuthError::RedisOperation(e.to_string()))
}

pub async fn ping(pool: &RedisPool) -> Result<(), AuthError> {
    let mut conn = pool
        .get()
        .await
        .map_err(|e| AuthError::RedisOperation(e.to_string()))?;

    redis::cmd("PING")
        .query_async::<String>(&mut conn)
        .await
        .map(|_| ())
        .map_err(|e| AuthError::RedisOperation(e.to_string()))
}

/// Seconds left before a token with expiry `exp` lapses.
pub fn remaining_ttl(exp: usize, now: usize) -> u64 {
    exp.saturating_sub(now) as u64
}
