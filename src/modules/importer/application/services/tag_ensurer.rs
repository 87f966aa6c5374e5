use std::sync::Arc;

use tracing::{info, warn};

use crate::forum::application::ports::outgoing::TagRepository;
use crate::importer::application::domain::entities::{TagEnsureOutcome, TagFailure};

use super::ImportRowError;

/// Creates the tags a row asks for that the platform does not know yet.
#[derive(Clone)]
pub struct TagEnsurer {
    tags: Arc<dyn TagRepository + Send + Sync>,
    drop_failed: bool,
}

impl TagEnsurer {
    pub fn new(tags: Arc<dyn TagRepository + Send + Sync>) -> Self {
        Self {
            tags,
            drop_failed: false,
        }
    }

    /// Leave names whose creation failed out of the returned list.
    pub fn with_drop_failed(mut self, drop_failed: bool) -> Self {
        self.drop_failed = drop_failed;
        self
    }

    /// A failed creation is reported in the outcome and never fails the
    /// row. Only the existence lookup can.
    pub async fn ensure(&self, names: &[String]) -> Result<TagEnsureOutcome, ImportRowError> {
        if names.is_empty() {
            return Ok(TagEnsureOutcome::default());
        }

        let existing = self.tags.find_existing_names(names).await?;
        let mut outcome = TagEnsureOutcome::default();

        for name in names {
            if existing.iter().any(|e| e == name) {
                outcome.names.push(name.clone());
                continue;
            }

            match self.tags.create_tag(name).await {
                Ok(tag) => {
                    info!("Created new tag: {}", tag.name);
                    outcome.created.push(name.clone());
                    outcome.names.push(name.clone());
                }
                Err(e) => {
                    warn!("Failed to create tag: {} ({})", name, e);
                    outcome.failed.push(TagFailure {
                        name: name.clone(),
                        reason: e.to_string(),
                    });
                    if !self.drop_failed {
                        outcome.names.push(name.clone());
                    }
                }
            }
        }

        Ok(outcome)
    }
}
