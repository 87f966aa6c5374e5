pub mod config;
pub mod modules;
pub use modules::forum;
pub use modules::importer;

#[cfg(test)]
mod tests;

use crate::config::ImportConfig;
use crate::forum::adapter::outgoing::{
    CategoryQueryPostgres, PostRepositoryPostgres, TagRepositoryPostgres, TopicRepositoryPostgres,
    UserQueryPostgres,
};
use crate::importer::adapter::incoming::csv_reader::{count_rows, locate_csv, rows};
use crate::importer::adapter::outgoing::{
    ImportLogFile, InProcessRateLimiter, IndicatifProgress, RedisRateLimiter, TracingLogLevel,
};
use crate::importer::application::ports::incoming::use_cases::{ImportTopicsUseCase, RowBatch};
use crate::importer::application::ports::outgoing::RateLimiter;
use crate::importer::application::services::{
    ImportRowService, ImportTopicsService, RowValidator, TagEnsurer, TopicPostCreator,
    UserResolver,
};
use anyhow::Context;
use deadpool_redis::{Config, Runtime};
use sea_orm::{ConnectOptions, Database};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Installs the global subscriber. The returned handle swaps the filter at
/// runtime.
fn init_tracing() -> reload::Handle<EnvFilter, Registry> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    handle
}

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> anyhow::Result<()> {
    let log_level = TracingLogLevel::new(init_tracing());
    let config = ImportConfig::from_env()?;

    info!("Starting topic import...");

    let csv_path = locate_csv(&config.source)?;
    let total = count_rows(&csv_path)?;
    info!("Found {} rows in {}", total, csv_path.display());

    // Database connection
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(5)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(false);

    let db_arc = Arc::new(
        Database::connect(opt)
            .await
            .context("Failed to connect to database")?,
    );

    // Rate limiter switch: Redis when configured, otherwise this process only
    let rate_limiter: Arc<dyn RateLimiter + Send + Sync> = match &config.redis_url {
        Some(redis_url) => {
            let redis_pool = Config::from_url(redis_url)
                .create_pool(Some(Runtime::Tokio1))
                .context("Failed to create Redis pool")?;
            Arc::new(RedisRateLimiter::new(Arc::new(redis_pool)))
        }
        None => Arc::new(InProcessRateLimiter::default()),
    };

    let tag_repo = Arc::new(TagRepositoryPostgres::new(Arc::clone(&db_arc)));
    let row_service = ImportRowService::new(
        RowValidator::new(
            Arc::new(CategoryQueryPostgres::new(Arc::clone(&db_arc))),
            config.validator_settings(),
        ),
        UserResolver::new(Arc::new(UserQueryPostgres::new(Arc::clone(&db_arc)))),
        TagEnsurer::new(tag_repo.clone()).with_drop_failed(config.drop_failed_tags),
        TopicPostCreator::new(
            Arc::new(TopicRepositoryPostgres::new(Arc::clone(&db_arc))),
            Arc::new(PostRepositoryPostgres::new(Arc::clone(&db_arc))),
            tag_repo,
        )
        .with_tag_rollback(config.format.rolls_back_tags()),
    );
    let import_topics = ImportTopicsService::new(row_service, rate_limiter, Arc::new(log_level));

    let mut log = ImportLogFile::create(&config.log_path)
        .with_context(|| format!("Cannot open log file {}", config.log_path.display()))?;
    let mut progress = IndicatifProgress::new(total);
    let batch = RowBatch::new(total, rows(&csv_path)?);

    let summary = import_topics
        .execute(batch, &mut log, &mut progress)
        .await?;

    println!("{summary}");
    info!(
        "CSV import completed. Check the log file at {} for errors.",
        log.path().display()
    );

    Ok(())
}

#[cfg(not(tarpaulin_include))]
fn main() {
    if let Err(e) = start() {
        eprintln!("Import failed: {e:#}");
        std::process::exit(1);
    }
}
