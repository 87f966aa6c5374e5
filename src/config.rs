use std::path::PathBuf;

use crate::importer::adapter::incoming::csv_reader::CsvSource;
use crate::importer::application::domain::entities::RowFormat;
use crate::importer::application::services::{RowDefaults, RowValidatorSettings};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Everything the importer reads from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub source: CsvSource,
    pub log_path: PathBuf,
    pub format: RowFormat,
    pub tag_delimiter: char,
    pub defaults: Option<RowDefaults>,
    pub drop_failed_tags: bool,
}

impl ImportConfig {
    pub const DEFAULT_LOG_PATH: &'static str = "import_errors.log";
    pub const DEFAULT_TAG_DELIMITER: char = '|';

    /// Loads `.env.{RUST_ENV}` (falling back to `.env`) and reads the
    /// process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = std::env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());

        // Try .env.{environment} first, then fall back to .env
        let env_file = format!(".env.{}", env);
        if dotenvy::from_filename(&env_file).is_err() {
            dotenvy::dotenv().ok();
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let source = match (get("IMPORT_CSV_PATH"), get("IMPORT_CSV_DIR")) {
            (Some(path), _) => CsvSource::File(PathBuf::from(path)),
            (None, Some(dir)) => CsvSource::Directory(PathBuf::from(dir)),
            (None, None) => return Err(ConfigError::Missing("IMPORT_CSV_PATH or IMPORT_CSV_DIR")),
        };

        let format = match get("IMPORT_FORMAT") {
            Some(raw) => raw.parse::<RowFormat>().map_err(|reason| ConfigError::Invalid {
                name: "IMPORT_FORMAT",
                reason,
            })?,
            None => RowFormat::Full,
        };

        let tag_delimiter = match lookup("IMPORT_TAG_DELIMITER").filter(|v| !v.is_empty()) {
            Some(raw) => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => {
                        return Err(ConfigError::Invalid {
                            name: "IMPORT_TAG_DELIMITER",
                            reason: format!("expected a single character, got '{raw}'"),
                        })
                    }
                }
            }
            None => Self::DEFAULT_TAG_DELIMITER,
        };

        let defaults = match format {
            RowFormat::Full => None,
            RowFormat::Minimal => {
                let category_raw = get("IMPORT_DEFAULT_CATEGORY_ID")
                    .ok_or(ConfigError::Missing("IMPORT_DEFAULT_CATEGORY_ID"))?;
                let category_id = category_raw
                    .parse::<i64>()
                    .ok()
                    .filter(|id| *id > 0)
                    .ok_or_else(|| ConfigError::Invalid {
                        name: "IMPORT_DEFAULT_CATEGORY_ID",
                        reason: format!("'{category_raw}' is not a positive integer"),
                    })?;

                Some(RowDefaults {
                    category_id,
                    creator_email: get("IMPORT_DEFAULT_CREATOR_EMAIL")
                        .ok_or(ConfigError::Missing("IMPORT_DEFAULT_CREATOR_EMAIL"))?,
                    replier_email: get("IMPORT_DEFAULT_REPLIER_EMAIL")
                        .ok_or(ConfigError::Missing("IMPORT_DEFAULT_REPLIER_EMAIL"))?,
                })
            }
        };

        let drop_failed_tags = match get("IMPORT_DROP_FAILED_TAGS") {
            Some(raw) => match raw.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "IMPORT_DROP_FAILED_TAGS",
                        reason: format!("expected true or false, got '{raw}'"),
                    })
                }
            },
            None => false,
        };

        Ok(Self {
            database_url,
            redis_url: get("REDIS_URL"),
            source,
            log_path: get("IMPORT_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_LOG_PATH)),
            format,
            tag_delimiter,
            defaults,
            drop_failed_tags,
        })
    }

    pub fn validator_settings(&self) -> RowValidatorSettings {
        RowValidatorSettings {
            format: self.format,
            tag_delimiter: self.tag_delimiter,
            defaults: self.defaults.clone(),
        }
    }
}
