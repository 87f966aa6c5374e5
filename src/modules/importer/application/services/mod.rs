mod import_row_error;
mod import_row_service;
mod import_topics_service;
mod row_validator;
mod run_guard;
mod tag_ensurer;
mod topic_post_creator;
mod user_resolver;

pub use import_row_error::ImportRowError;
pub use import_row_service::ImportRowService;
pub use import_topics_service::ImportTopicsService;
pub use row_validator::{
    parse_category_id, parse_datetime, split_tags, RowDefaults, RowValidator,
    RowValidatorSettings, DATETIME_FORMAT,
};
pub use run_guard::{RunGuard, QUIET_LOG_DIRECTIVE};
pub use tag_ensurer::TagEnsurer;
pub use topic_post_creator::{CreationFailure, CreationReport, TopicPostCreator};
pub use user_resolver::UserResolver;
