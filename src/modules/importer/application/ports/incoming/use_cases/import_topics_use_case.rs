use async_trait::async_trait;

use crate::importer::application::{
    domain::entities::{CsvRow, ImportSummary, RowReadError},
    ports::outgoing::{ImportLog, ImportLogError, ImportProgress, LogLevelError, RateLimiterError},
};

//
// ──────────────────────────────────────────────────────────
// Input
// ──────────────────────────────────────────────────────────
//

/// Rows to import, read lazily, plus the data row count for progress.
pub struct RowBatch<'a> {
    pub total: usize,
    pub rows: Box<dyn Iterator<Item = Result<CsvRow, RowReadError>> + Send + 'a>,
}

impl<'a> RowBatch<'a> {
    pub fn new<I>(total: usize, rows: I) -> Self
    where
        I: Iterator<Item = Result<CsvRow, RowReadError>> + Send + 'a,
    {
        Self {
            total,
            rows: Box::new(rows),
        }
    }
}

//
// ──────────────────────────────────────────────────────────
// Use Case Error
// ──────────────────────────────────────────────────────────
//

/// Failures that end the whole run. Row-level problems never surface here.
#[derive(Debug, thiserror::Error)]
pub enum ImportRunError {
    #[error("Could not disable rate limiter: {0}")]
    RateLimiter(#[from] RateLimiterError),

    #[error("Could not adjust log level: {0}")]
    LogLevel(#[from] LogLevelError),

    #[error("Import log unusable: {0}")]
    Log(#[from] ImportLogError),
}

//
// ──────────────────────────────────────────────────────────
// Incoming Port (Use Case)
// ──────────────────────────────────────────────────────────
//

#[async_trait]
pub trait ImportTopicsUseCase: Send + Sync {
    async fn execute(
        &self,
        batch: RowBatch<'_>,
        log: &mut dyn ImportLog,
        progress: &mut dyn ImportProgress,
    ) -> Result<ImportSummary, ImportRunError>;
}
