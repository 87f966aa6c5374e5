use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::importer::application::ports::outgoing::{RateLimiter, RateLimiterError};

/// Switch for single-process setups without Redis.
pub struct InProcessRateLimiter {
    enabled: AtomicBool,
}

impl Default for InProcessRateLimiter {
    fn default() -> Self {
        Self {
            enabled: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl RateLimiter for InProcessRateLimiter {
    async fn is_enabled(&self) -> Result<bool, RateLimiterError> {
        Ok(self.enabled.load(Ordering::SeqCst))
    }

    async fn disable(&self) -> Result<(), RateLimiterError> {
        self.enabled.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn enable(&self) -> Result<(), RateLimiterError> {
        self.enabled.store(true, Ordering::SeqCst);
        Ok(())
    }
}
