use std::sync::Arc;

use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};

use crate::importer::application::ports::outgoing::{RateLimiter, RateLimiterError};

/// Platform-wide rate limiter switch kept in Redis.
///
/// ```text
/// platform:rate_limiter:disabled -> "1"
/// ```
/// Key present means every platform process skips rate limiting. No TTL: the
/// importer removes it when the run ends.
#[derive(Clone)]
pub struct RedisRateLimiter {
    pool: Arc<Pool>,
    key: String,
}

impl RedisRateLimiter {
    pub const DEFAULT_KEY: &'static str = "platform:rate_limiter:disabled";

    pub fn new(pool: Arc<Pool>) -> Self {
        Self::with_key(pool, Self::DEFAULT_KEY)
    }

    pub fn with_key(pool: Arc<Pool>, key: impl Into<String>) -> Self {
        Self {
            pool,
            key: key.into(),
        }
    }

    async fn get_conn(&self) -> Result<deadpool_redis::Connection, RateLimiterError> {
        self.pool
            .get()
            .await
            .map_err(|e| RateLimiterError::BackendError(format!("Pool error: {}", e)))
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn is_enabled(&self) -> Result<bool, RateLimiterError> {
        let mut conn = self.get_conn().await?;

        let disabled: bool = conn
            .exists(&self.key)
            .await
            .map_err(|e| RateLimiterError::BackendError(e.to_string()))?;

        Ok(!disabled)
    }

    async fn disable(&self) -> Result<(), RateLimiterError> {
        let mut conn = self.get_conn().await?;

        conn.set::<_, _, ()>(&self.key, "1")
            .await
            .map_err(|e| RateLimiterError::BackendError(e.to_string()))?;

        Ok(())
    }

    async fn enable(&self) -> Result<(), RateLimiterError> {
        let mut conn = self.get_conn().await?;

        conn.del::<_, ()>(&self.key)
            .await
            .map_err(|e| RateLimiterError::BackendError(e.to_string()))?;

        Ok(())
    }
}
