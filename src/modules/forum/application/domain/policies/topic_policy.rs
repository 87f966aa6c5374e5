use crate::forum::application::domain::entities::Guardian;

/// Rules the platform applies to end-user topic creation. Bulk imports
/// (`import_mode`) bypass the content rules but never the hard limits the
/// schema enforces.
#[derive(Debug, Clone)]
pub struct TopicPolicy {
    pub min_title_len: usize,
    pub max_title_len: usize,
    pub min_body_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopicPolicyViolation {
    #[error("user is not allowed to create topics")]
    Forbidden,

    #[error("title must be at least {0} characters")]
    TitleTooShort(usize),

    #[error("title must be at most {0} characters")]
    TitleTooLong(usize),

    #[error("body must be at least {0} characters")]
    BodyTooShort(usize),
}

impl Default for TopicPolicy {
    fn default() -> Self {
        Self {
            min_title_len: 15,
            max_title_len: 255,
            min_body_len: 20,
        }
    }
}

impl TopicPolicy {
    pub fn check(
        &self,
        guardian: &Guardian,
        title: &str,
        raw: &str,
        import_mode: bool,
    ) -> Result<(), TopicPolicyViolation> {
        if !guardian.can_create_topic(import_mode) {
            return Err(TopicPolicyViolation::Forbidden);
        }

        let title_len = title.trim().chars().count();

        // Column limit, applies to imports too
        if title_len > self.max_title_len {
            return Err(TopicPolicyViolation::TitleTooLong(self.max_title_len));
        }

        if import_mode {
            return Ok(());
        }

        if title_len < self.min_title_len {
            return Err(TopicPolicyViolation::TitleTooShort(self.min_title_len));
        }

        if raw.trim().chars().count() < self.min_body_len {
            return Err(TopicPolicyViolation::BodyTooShort(self.min_body_len));
        }

        Ok(())
    }
}
