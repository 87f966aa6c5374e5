use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::forum::application::ports::outgoing::CategoryQuery;
use crate::importer::application::domain::entities::{
    MissingField, RowFormat, RowValidation, TopicCsvRecord, ValidatedRow,
};

use super::ImportRowError;

/// Strict timestamp layout of the date columns, read in local time.
pub const DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Values the minimal row format does not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDefaults {
    pub category_id: i64,
    pub creator_email: String,
    pub replier_email: String,
}

#[derive(Debug, Clone)]
pub struct RowValidatorSettings {
    pub format: RowFormat,
    pub tag_delimiter: char,
    pub defaults: Option<RowDefaults>,
}

impl Default for RowValidatorSettings {
    fn default() -> Self {
        Self {
            format: RowFormat::Full,
            tag_delimiter: '|',
            defaults: None,
        }
    }
}

pub fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT).ok()?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Splits on `delimiter`, trims, drops empty entries and repeats.
pub fn split_tags(raw: Option<&str>, delimiter: char) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.unwrap_or_default().split(delimiter).map(str::trim) {
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Reads the leading digits of the cell, so spreadsheet exports such as
/// `4.0` still name category 4. Zero, negatives and non-numbers are `None`.
pub fn parse_category_id(raw: Option<&str>) -> Option<i64> {
    let trimmed = raw?.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..end].parse::<i64>().ok().filter(|id| *id > 0)
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[derive(Clone)]
pub struct RowValidator {
    categories: Arc<dyn CategoryQuery + Send + Sync>,
    settings: RowValidatorSettings,
}

impl RowValidator {
    pub fn new(
        categories: Arc<dyn CategoryQuery + Send + Sync>,
        settings: RowValidatorSettings,
    ) -> Self {
        Self {
            categories,
            settings,
        }
    }

    /// Collects every missing field of the row, not only the first.
    /// The category existence check is the only platform call.
    pub async fn validate(
        &self,
        record: &TopicCsvRecord,
        now: DateTime<Utc>,
    ) -> Result<RowValidation, ImportRowError> {
        let defaults = self.settings.defaults.as_ref();

        let title = non_empty(record.title.as_deref());
        let body = non_empty(record.main_post.as_deref());
        let reply = non_empty(record.post_answer.as_deref());
        let tags = split_tags(record.tags.as_deref(), self.settings.tag_delimiter);

        let (creator_email, replier_email, category_raw, created_at, reply_created_at) =
            match self.settings.format {
                RowFormat::Full => (
                    non_empty(record.main_post_user_email.as_deref()),
                    non_empty(record.post_answer_user_email.as_deref()),
                    parse_category_id(record.category_id.as_deref()),
                    parse_datetime(record.main_post_datetime.as_deref()),
                    parse_datetime(record.post_answer_datetime.as_deref()),
                ),
                RowFormat::Minimal => (
                    defaults.and_then(|d| non_empty(Some(d.creator_email.as_str()))),
                    defaults.and_then(|d| non_empty(Some(d.replier_email.as_str()))),
                    defaults.map(|d| d.category_id).filter(|id| *id > 0),
                    Some(now),
                    Some(now),
                ),
            };

        let category_id = match category_raw {
            Some(id) if self.categories.exists(id).await? => Some(id),
            _ => None,
        };

        let mut missing = Vec::new();
        if title.is_none() {
            missing.push(MissingField::TopicTitle);
        }
        if body.is_none() {
            missing.push(MissingField::TopicMainPost);
        }
        if creator_email.is_none() {
            missing.push(MissingField::TopicMainPostUserEmail);
        }
        if category_id.is_none() {
            missing.push(MissingField::TopicCategoryId);
        }
        if created_at.is_none() {
            missing.push(MissingField::TopicMainPostDateTime);
        }
        if reply.is_none() {
            missing.push(MissingField::TopicPostAnswer);
        }
        if replier_email.is_none() {
            missing.push(MissingField::TopicPostAnswerUserEmail);
        }
        if reply_created_at.is_none() {
            missing.push(MissingField::TopicPostAnswerDateTime);
        }

        match (
            title,
            body,
            creator_email,
            category_id,
            created_at,
            reply,
            replier_email,
            reply_created_at,
        ) {
            (
                Some(title),
                Some(body),
                Some(creator_email),
                Some(category_id),
                Some(created_at),
                Some(reply),
                Some(replier_email),
                Some(reply_created_at),
            ) => Ok(RowValidation::Valid(ValidatedRow {
                title,
                body,
                tags,
                category_id,
                creator_email,
                replier_email,
                reply,
                created_at,
                reply_created_at,
            })),
            _ => Ok(RowValidation::Missing(missing)),
        }
    }
}
