use async_trait::async_trait;

#[derive(Debug, Clone, thiserror::Error)]
pub enum RateLimiterError {
    #[error("Rate limiter backend error: {0}")]
    BackendError(String),
}

/// Process-wide switch for the platform's rate limiting.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn is_enabled(&self) -> Result<bool, RateLimiterError>;

    async fn disable(&self) -> Result<(), RateLimiterError>;

    async fn enable(&self) -> Result<(), RateLimiterError>;
}
