mod import_log_file;
mod progress_bar;
mod rate_limiter_in_process;
mod rate_limiter_redis;
mod tracing_log_level;

pub use import_log_file::ImportLogFile;
pub use progress_bar::IndicatifProgress;
pub use rate_limiter_in_process::InProcessRateLimiter;
pub use rate_limiter_redis::RedisRateLimiter;
pub use tracing_log_level::TracingLogLevel;
