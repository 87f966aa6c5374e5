use chrono::{DateTime, Utc};
use tracing::debug;

use crate::importer::application::domain::entities::{
    CsvRow, RowOutcome, RowReport, RowValidation, SkipReason,
};

use super::{
    CreationFailure, ImportRowError, RowValidator, TagEnsurer, TopicPostCreator, UserResolver,
};

/// Runs one row through validation, user lookup, tag creation and record
/// creation, and says what happened to it.
#[derive(Clone)]
pub struct ImportRowService {
    validator: RowValidator,
    users: UserResolver,
    tags: TagEnsurer,
    creator: TopicPostCreator,
}

impl ImportRowService {
    pub fn new(
        validator: RowValidator,
        users: UserResolver,
        tags: TagEnsurer,
        creator: TopicPostCreator,
    ) -> Self {
        Self {
            validator,
            users,
            tags,
            creator,
        }
    }

    pub async fn process(&self, row: &CsvRow, now: DateTime<Utc>) -> RowReport {
        match self.try_process(row, now).await {
            Ok(report) => report,
            Err(e) => RowReport::new(row.number, RowOutcome::Errored(e.to_string())),
        }
    }

    async fn try_process(
        &self,
        row: &CsvRow,
        now: DateTime<Utc>,
    ) -> Result<RowReport, ImportRowError> {
        let validated = match self.validator.validate(&row.record, now).await? {
            RowValidation::Valid(validated) => validated,
            RowValidation::Missing(fields) => {
                return Ok(RowReport::new(
                    row.number,
                    RowOutcome::Skipped(SkipReason::MissingFields(fields)),
                ))
            }
        };

        let Some(users) = self
            .users
            .resolve(&validated.creator_email, &validated.replier_email)
            .await?
        else {
            return Ok(RowReport::new(
                row.number,
                RowOutcome::Skipped(SkipReason::UserNotFound {
                    creator_email: validated.creator_email,
                    replier_email: validated.replier_email,
                }),
            ));
        };

        let tags = self.tags.ensure(&validated.tags).await?;
        let creation = self.creator.create(&validated, &users, &tags).await;

        let outcome = match creation.result {
            Ok(imported) => {
                debug!(row = row.number, topic_id = %imported.topic_id, "Row imported");
                RowOutcome::Imported(imported)
            }
            Err(failure) => {
                debug!(row = row.number, error = %failure, "Row creation failed");
                let title = validated.title;
                match &failure {
                    CreationFailure::Topic(_) => {
                        RowOutcome::Skipped(SkipReason::TopicCreationFailed { title })
                    }
                    CreationFailure::MainPost(_) => {
                        RowOutcome::Skipped(SkipReason::MainPostFailed { title })
                    }
                    CreationFailure::Reply(_) => {
                        RowOutcome::Skipped(SkipReason::ReplyFailed { title })
                    }
                    CreationFailure::TagAttach(_) => RowOutcome::Errored(failure.to_string()),
                }
            }
        };

        Ok(RowReport {
            row_number: row.number,
            outcome,
            tag_failures: tags.failed,
            rollback_errors: creation.rollback_errors,
        })
    }
}
