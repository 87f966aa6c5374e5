use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::forum::application::domain::entities::ForumUser;

/// Input layout of the CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFormat {
    /// Every column present; dates, authors and category come from the row.
    Full,
    /// Title, body, tags and answer only; the rest comes from configuration.
    /// Failed rows also lose the tags they created.
    Minimal,
}

impl RowFormat {
    pub fn rolls_back_tags(&self) -> bool {
        matches!(self, RowFormat::Minimal)
    }
}

impl FromStr for RowFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(RowFormat::Full),
            "minimal" => Ok(RowFormat::Minimal),
            other => Err(format!("unknown row format '{other}' (expected full or minimal)")),
        }
    }
}

/// One CSV data line keyed by header. Absent columns and empty cells both
/// read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TopicCsvRecord {
    #[serde(rename = "Topic_Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Topic_Main_Post", default)]
    pub main_post: Option<String>,
    #[serde(rename = "Topic_Main_Post_User_Email", default)]
    pub main_post_user_email: Option<String>,
    #[serde(rename = "Topic_Category_ID", default)]
    pub category_id: Option<String>,
    #[serde(rename = "Topic_Tags", default)]
    pub tags: Option<String>,
    #[serde(rename = "Topic_Main_Post_DateTime", default)]
    pub main_post_datetime: Option<String>,
    #[serde(rename = "Topic_Post_Answer", default)]
    pub post_answer: Option<String>,
    #[serde(rename = "Topic_Post_Answer_User_Email", default)]
    pub post_answer_user_email: Option<String>,
    #[serde(rename = "Topic_Post_Answer_DateTime", default)]
    pub post_answer_datetime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based line in the file; the header is row 1.
    pub number: usize,
    pub record: TopicCsvRecord,
}

/// A data line the reader could not decode. Only that row is lost.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RowReadError {
    pub row_number: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MissingField {
    TopicTitle,
    TopicMainPost,
    TopicMainPostUserEmail,
    TopicCategoryId,
    TopicMainPostDateTime,
    TopicPostAnswer,
    TopicPostAnswerUserEmail,
    TopicPostAnswerDateTime,
}

impl MissingField {
    pub fn column(&self) -> &'static str {
        match self {
            MissingField::TopicTitle => "Topic_Title",
            MissingField::TopicMainPost => "Topic_Main_Post",
            MissingField::TopicMainPostUserEmail => "Topic_Main_Post_User_Email",
            MissingField::TopicCategoryId => "Topic_Category_ID",
            MissingField::TopicMainPostDateTime => "Topic_Main_Post_DateTime",
            MissingField::TopicPostAnswer => "Topic_Post_Answer",
            MissingField::TopicPostAnswerUserEmail => "Topic_Post_Answer_User_Email",
            MissingField::TopicPostAnswerDateTime => "Topic_Post_Answer_DateTime",
        }
    }
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRow {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub category_id: i64,
    pub creator_email: String,
    pub replier_email: String,
    pub reply: String,
    pub created_at: DateTime<Utc>,
    pub reply_created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowValidation {
    Valid(ValidatedRow),
    Missing(Vec<MissingField>),
}

#[derive(Debug, Clone)]
pub struct ResolvedUsers {
    pub creator: ForumUser,
    pub replier: ForumUser,
}

/// Result of making sure every requested tag exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagEnsureOutcome {
    /// Names handed to topic creation, in request order.
    pub names: Vec<String>,
    /// Names created during this row.
    pub created: Vec<String>,
    /// Creations that failed. The row goes on without them.
    pub failed: Vec<TagFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFailure {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportedRow {
    pub topic_id: Uuid,
    pub post_id: Uuid,
    pub reply_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingFields(Vec<MissingField>),
    UserNotFound {
        creator_email: String,
        replier_email: String,
    },
    TopicCreationFailed {
        title: String,
    },
    MainPostFailed {
        title: String,
    },
    ReplyFailed {
        title: String,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingFields(fields) => {
                let names: Vec<&str> = fields.iter().map(MissingField::column).collect();
                write!(f, "Missing {}", names.join(", "))
            }
            SkipReason::UserNotFound {
                creator_email,
                replier_email,
            } => write!(f, "User not found - {creator_email} or {replier_email}"),
            SkipReason::TopicCreationFailed { title } => {
                write!(f, "Failed to create topic '{title}'")
            }
            SkipReason::MainPostFailed { title } => {
                write!(f, "Failed to create main post for topic '{title}'")
            }
            SkipReason::ReplyFailed { title } => write!(f, "Failed to add reply to topic '{title}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Imported(ImportedRow),
    Skipped(SkipReason),
    Errored(String),
}

/// Everything that happened to one row, ready to be written to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReport {
    pub row_number: usize,
    pub outcome: RowOutcome,
    /// Tags the row asked for that could not be created.
    pub tag_failures: Vec<TagFailure>,
    /// Cleanup steps that failed after a partial creation.
    pub rollback_errors: Vec<String>,
}

impl RowReport {
    pub fn new(row_number: usize, outcome: RowOutcome) -> Self {
        Self {
            row_number,
            outcome,
            tag_failures: Vec::new(),
            rollback_errors: Vec::new(),
        }
    }

    pub fn is_imported(&self) -> bool {
        matches!(self.outcome, RowOutcome::Imported(_))
    }

    /// Tag failures first, in the order they happened, then the outcome
    /// line, then rollback failures.
    pub fn log_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .tag_failures
            .iter()
            .map(|t| {
                format!(
                    "Failed to create tag for row {}: {} - {}",
                    self.row_number, t.name, t.reason
                )
            })
            .collect();
        match &self.outcome {
            RowOutcome::Imported(_) => {}
            RowOutcome::Skipped(reason) => {
                lines.push(format!("Skipping row {}: {}", self.row_number, reason))
            }
            RowOutcome::Errored(message) => lines.push(format!(
                "Error processing row {}: {}",
                self.row_number, message
            )),
        }
        lines.extend(
            self.rollback_errors
                .iter()
                .map(|e| format!("Rollback failed for row {}: {}", self.row_number, e)),
        );
        lines
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errored: usize,
}

impl ImportSummary {
    pub fn record(&mut self, report: &RowReport) {
        match report.outcome {
            RowOutcome::Imported(_) => self.imported += 1,
            RowOutcome::Skipped(_) => self.skipped += 1,
            RowOutcome::Errored(_) => self.errored += 1,
        }
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Import Completed: {}/{} rows successfully imported.",
            self.imported, self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_listed_in_one_line() {
        let report = RowReport::new(
            7,
            RowOutcome::Skipped(SkipReason::MissingFields(vec![
                MissingField::TopicTitle,
                MissingField::TopicMainPostDateTime,
            ])),
        );

        assert_eq!(
            report.log_lines(),
            vec!["Skipping row 7: Missing Topic_Title, Topic_Main_Post_DateTime".to_string()]
        );
    }

    #[test]
    fn user_not_found_names_both_emails() {
        let reason = SkipReason::UserNotFound {
            creator_email: "a@x.io".to_string(),
            replier_email: "b@x.io".to_string(),
        };

        assert_eq!(reason.to_string(), "User not found - a@x.io or b@x.io");
    }

    #[test]
    fn imported_row_writes_nothing() {
        let report = RowReport::new(
            2,
            RowOutcome::Imported(ImportedRow {
                topic_id: Uuid::new_v4(),
                post_id: Uuid::new_v4(),
                reply_id: Uuid::new_v4(),
            }),
        );

        assert!(report.log_lines().is_empty());
        assert!(report.is_imported());
    }

    #[test]
    fn rollback_errors_follow_the_skip_line() {
        let mut report = RowReport::new(
            3,
            RowOutcome::Skipped(SkipReason::ReplyFailed {
                title: "Hello".to_string(),
            }),
        );
        report.rollback_errors.push("Topic not found".to_string());

        assert_eq!(
            report.log_lines(),
            vec![
                "Skipping row 3: Failed to add reply to topic 'Hello'".to_string(),
                "Rollback failed for row 3: Topic not found".to_string(),
            ]
        );
    }

    #[test]
    fn tag_failures_are_logged_even_for_imported_rows() {
        let mut report = RowReport::new(
            5,
            RowOutcome::Imported(ImportedRow {
                topic_id: Uuid::new_v4(),
                post_id: Uuid::new_v4(),
                reply_id: Uuid::new_v4(),
            }),
        );
        report.tag_failures.push(TagFailure {
            name: "bad".to_string(),
            reason: "Invalid tag name: bad".to_string(),
        });

        assert_eq!(
            report.log_lines(),
            vec!["Failed to create tag for row 5: bad - Invalid tag name: bad".to_string()]
        );
        assert!(report.is_imported());
    }

    #[test]
    fn row_format_parses_case_insensitively() {
        assert_eq!("FULL".parse::<RowFormat>(), Ok(RowFormat::Full));
        assert_eq!(" minimal ".parse::<RowFormat>(), Ok(RowFormat::Minimal));
        assert!("other".parse::<RowFormat>().is_err());
    }

    #[test]
    fn summary_counts_each_outcome() {
        let mut summary = ImportSummary {
            total: 3,
            ..Default::default()
        };
        summary.record(&RowReport::new(2, RowOutcome::Errored("boom".to_string())));
        summary.record(&RowReport::new(
            3,
            RowOutcome::Skipped(SkipReason::MissingFields(vec![MissingField::TopicTitle])),
        ));

        assert_eq!(summary.imported, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errored, 1);
        assert_eq!(
            summary.to_string(),
            "Import Completed: 0/3 rows successfully imported."
        );
    }
}
