use std::sync::Arc;

use tracing::{error, info, warn};

use crate::importer::application::ports::incoming::use_cases::ImportRunError;
use crate::importer::application::ports::outgoing::{LogLevelControl, RateLimiter};

/// Filter applied while rows are imported.
pub const QUIET_LOG_DIRECTIVE: &str = "error";

/// Holds the rate limiter off and the log level at `error` for the length
/// of a run. `release` restores both; if the guard is dropped without it,
/// `Drop` restores the level and schedules the rate limiter re-enable.
pub struct RunGuard {
    rate_limiter: Arc<dyn RateLimiter + Send + Sync>,
    log_level: Arc<dyn LogLevelControl + Send + Sync>,
    previous_level: String,
    released: bool,
}

impl RunGuard {
    pub async fn acquire(
        rate_limiter: Arc<dyn RateLimiter + Send + Sync>,
        log_level: Arc<dyn LogLevelControl + Send + Sync>,
    ) -> Result<Self, ImportRunError> {
        let was_enabled = rate_limiter.is_enabled().await?;
        rate_limiter.disable().await?;

        let previous_level = match log_level.current() {
            Ok(level) => level,
            Err(e) => {
                Self::reenable(rate_limiter.as_ref()).await;
                return Err(e.into());
            }
        };

        info!(
            was_enabled,
            previous_level = %previous_level,
            "Rate limiter disabled, lowering log level for import"
        );

        if let Err(e) = log_level.set(QUIET_LOG_DIRECTIVE) {
            Self::reenable(rate_limiter.as_ref()).await;
            return Err(e.into());
        }

        Ok(Self {
            rate_limiter,
            log_level,
            previous_level,
            released: false,
        })
    }

    /// Restores the log level, then re-enables the rate limiter whatever
    /// its state was before the run.
    pub async fn release(mut self) -> Result<(), ImportRunError> {
        self.released = true;

        let level = self.log_level.set(&self.previous_level);
        let limiter = self.rate_limiter.enable().await;

        level?;
        limiter?;
        info!("Rate limiter re-enabled, log level restored");
        Ok(())
    }

    async fn reenable(rate_limiter: &(dyn RateLimiter + Send + Sync)) {
        if let Err(e) = rate_limiter.enable().await {
            error!("Could not re-enable rate limiter: {}", e);
        }
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        if let Err(e) = self.log_level.set(&self.previous_level) {
            warn!("Could not restore log level: {}", e);
        }

        let rate_limiter = self.rate_limiter.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    Self::reenable(rate_limiter.as_ref()).await;
                });
            }
            Err(_) => error!("Rate limiter left disabled: no runtime to re-enable it"),
        }
    }
}
