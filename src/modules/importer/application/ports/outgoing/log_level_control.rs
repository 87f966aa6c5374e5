#[derive(Debug, Clone, thiserror::Error)]
pub enum LogLevelError {
    #[error("Invalid log directive '{0}'")]
    InvalidDirective(String),

    #[error("Log subscriber unavailable: {0}")]
    Unavailable(String),
}

/// Runtime access to the process log verbosity.
pub trait LogLevelControl: Send + Sync {
    /// Current filter directive, e.g. `info,sqlx=warn`.
    fn current(&self) -> Result<String, LogLevelError>;

    fn set(&self, directive: &str) -> Result<(), LogLevelError>;
}
