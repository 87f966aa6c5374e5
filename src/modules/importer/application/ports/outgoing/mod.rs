mod import_log;
mod import_progress;
mod log_level_control;
mod rate_limiter;

pub use import_log::{ImportLog, ImportLogError};
pub use import_progress::ImportProgress;
pub use log_level_control::{LogLevelControl, LogLevelError};
pub use rate_limiter::{RateLimiter, RateLimiterError};
