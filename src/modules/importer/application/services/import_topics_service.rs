use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::importer::application::domain::entities::{ImportSummary, RowOutcome, RowReport};
use crate::importer::application::ports::incoming::use_cases::{
    ImportRunError, ImportTopicsUseCase, RowBatch,
};
use crate::importer::application::ports::outgoing::{
    ImportLog, ImportProgress, LogLevelControl, RateLimiter,
};

use super::{ImportRowService, RunGuard};

pub struct ImportTopicsService {
    rows: ImportRowService,
    rate_limiter: Arc<dyn RateLimiter + Send + Sync>,
    log_level: Arc<dyn LogLevelControl + Send + Sync>,
}

impl ImportTopicsService {
    pub fn new(
        rows: ImportRowService,
        rate_limiter: Arc<dyn RateLimiter + Send + Sync>,
        log_level: Arc<dyn LogLevelControl + Send + Sync>,
    ) -> Self {
        Self {
            rows,
            rate_limiter,
            log_level,
        }
    }

    async fn run_rows(
        &self,
        batch: RowBatch<'_>,
        log: &mut dyn ImportLog,
        progress: &mut dyn ImportProgress,
    ) -> Result<ImportSummary, ImportRunError> {
        let mut summary = ImportSummary {
            total: batch.total,
            ..Default::default()
        };

        for item in batch.rows {
            let report = match item {
                Ok(row) => self.rows.process(&row, Utc::now()).await,
                Err(e) => RowReport::new(e.row_number, RowOutcome::Errored(e.message)),
            };

            for line in report.log_lines() {
                log.write_line(&line)?;
            }
            if report.is_imported() {
                progress.advance();
            }
            summary.record(&report);
        }

        Ok(summary)
    }
}

#[async_trait]
impl ImportTopicsUseCase for ImportTopicsService {
    async fn execute(
        &self,
        batch: RowBatch<'_>,
        log: &mut dyn ImportLog,
        progress: &mut dyn ImportProgress,
    ) -> Result<ImportSummary, ImportRunError> {
        let guard = RunGuard::acquire(self.rate_limiter.clone(), self.log_level.clone()).await?;

        let result = self.run_rows(batch, log, progress).await;
        progress.finish();
        let flushed = log.finish();
        let released = guard.release().await;

        let summary = result?;
        flushed?;
        released?;

        info!(
            total = summary.total,
            imported = summary.imported,
            skipped = summary.skipped,
            errored = summary.errored,
            "Topic import finished"
        );
        Ok(summary)
    }
}
