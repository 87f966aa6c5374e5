use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::forum::application::ports::outgoing::{
    CreatePostData, CreateTopicData, PostRepository, PostRepositoryError, TagRepository,
    TagRepositoryError, TopicRepository, TopicRepositoryError,
};
use crate::importer::application::domain::entities::{
    ImportedRow, ResolvedUsers, TagEnsureOutcome, ValidatedRow,
};

/// The creation step that failed. Everything created before it has been
/// rolled back by the time the caller sees this.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CreationFailure {
    #[error("{0}")]
    Topic(TopicRepositoryError),

    #[error("Could not attach tags: {0}")]
    TagAttach(TagRepositoryError),

    #[error("{0}")]
    MainPost(PostRepositoryError),

    #[error("{0}")]
    Reply(PostRepositoryError),
}

#[derive(Debug)]
pub struct CreationReport {
    pub result: Result<ImportedRow, CreationFailure>,
    /// Rollback steps that failed. The remaining steps still ran.
    pub rollback_errors: Vec<String>,
}

impl CreationReport {
    fn failed(failure: CreationFailure, rollback_errors: Vec<String>) -> Self {
        Self {
            result: Err(failure),
            rollback_errors,
        }
    }
}

/// Creates topic, opening post and reply for one row, undoing the partial
/// work when a later step fails.
#[derive(Clone)]
pub struct TopicPostCreator {
    topics: Arc<dyn TopicRepository + Send + Sync>,
    posts: Arc<dyn PostRepository + Send + Sync>,
    tags: Arc<dyn TagRepository + Send + Sync>,
    rollback_tags: bool,
}

impl TopicPostCreator {
    pub fn new(
        topics: Arc<dyn TopicRepository + Send + Sync>,
        posts: Arc<dyn PostRepository + Send + Sync>,
        tags: Arc<dyn TagRepository + Send + Sync>,
    ) -> Self {
        Self {
            topics,
            posts,
            tags,
            rollback_tags: false,
        }
    }

    /// Also detach the topic's tags and destroy the tags created for the
    /// row when rolling back.
    pub fn with_tag_rollback(mut self, rollback_tags: bool) -> Self {
        self.rollback_tags = rollback_tags;
        self
    }

    pub async fn create(
        &self,
        row: &ValidatedRow,
        users: &ResolvedUsers,
        tags: &TagEnsureOutcome,
    ) -> CreationReport {
        let topic = match self
            .topics
            .create_topic(CreateTopicData {
                creator: users.creator.id,
                guardian: users.creator.guardian(),
                title: row.title.clone(),
                raw: row.body.clone(),
                category_id: row.category_id,
                created_at: row.created_at,
                import_mode: true,
            })
            .await
        {
            Ok(topic) => topic,
            Err(e) => return CreationReport::failed(CreationFailure::Topic(e), Vec::new()),
        };

        if !tags.names.is_empty() {
            if let Err(e) = self.tags.attach_tags(topic.id, &tags.names).await {
                let rollback_errors = self.rollback(topic.id, None, tags).await;
                return CreationReport::failed(CreationFailure::TagAttach(e), rollback_errors);
            }
        }

        let post = match self
            .posts
            .create_post(CreatePostData {
                topic_id: topic.id,
                author: users.creator.id,
                raw: row.body.clone(),
                created_at: row.created_at,
            })
            .await
        {
            Ok(post) => post,
            Err(e) => {
                let rollback_errors = self.rollback(topic.id, None, tags).await;
                return CreationReport::failed(CreationFailure::MainPost(e), rollback_errors);
            }
        };

        let reply = match self
            .posts
            .create_post(CreatePostData {
                topic_id: topic.id,
                author: users.replier.id,
                raw: row.reply.clone(),
                created_at: row.reply_created_at,
            })
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                let rollback_errors = self.rollback(topic.id, Some(post.id), tags).await;
                return CreationReport::failed(CreationFailure::Reply(e), rollback_errors);
            }
        };

        CreationReport {
            result: Ok(ImportedRow {
                topic_id: topic.id,
                post_id: post.id,
                reply_id: reply.id,
            }),
            rollback_errors: Vec::new(),
        }
    }

    async fn rollback(
        &self,
        topic_id: Uuid,
        post_id: Option<Uuid>,
        tags: &TagEnsureOutcome,
    ) -> Vec<String> {
        let mut errors = Vec::new();
        debug!(%topic_id, "Rolling back partial row");

        if let Some(post_id) = post_id {
            match self.posts.destroy_post(post_id).await {
                Ok(()) | Err(PostRepositoryError::PostNotFound) => {}
                Err(e) => errors.push(format!("Could not delete post {post_id}: {e}")),
            }
        }

        if self.rollback_tags {
            if let Err(e) = self.tags.detach_tags(topic_id).await {
                errors.push(format!("Could not detach tags from topic {topic_id}: {e}"));
            }
        }

        match self.topics.destroy_topic(topic_id).await {
            Ok(()) | Err(TopicRepositoryError::TopicNotFound) => {}
            Err(e) => errors.push(format!("Could not delete topic {topic_id}: {e}")),
        }

        // Created tags only go once nothing links to them.
        if self.rollback_tags && !tags.created.is_empty() {
            if let Err(e) = self.tags.destroy_tags(&tags.created).await {
                errors.push(format!(
                    "Could not delete tags {}: {e}",
                    tags.created.join(", ")
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::fake_platform::FakePlatform;
    use crate::tests::support::fixtures::{seeded_platform, ASKER_EMAIL, CATEGORY_ID, HELPER_EMAIL};
    use chrono::{Duration, Utc};

    fn validated(title: &str) -> ValidatedRow {
        let now = Utc::now();
        ValidatedRow {
            title: title.to_string(),
            body: "How do I configure the thing?".to_string(),
            tags: vec!["rust".to_string(), "fresh".to_string()],
            category_id: CATEGORY_ID,
            creator_email: ASKER_EMAIL.to_string(),
            replier_email: HELPER_EMAIL.to_string(),
            reply: "Like this.".to_string(),
            created_at: now - Duration::hours(2),
            reply_created_at: now - Duration::hours(1),
        }
    }

    fn users(platform: &FakePlatform) -> ResolvedUsers {
        ResolvedUsers {
            creator: platform.user(ASKER_EMAIL).unwrap(),
            replier: platform.user(HELPER_EMAIL).unwrap(),
        }
    }

    fn tags_with_created() -> TagEnsureOutcome {
        TagEnsureOutcome {
            names: vec!["rust".to_string(), "fresh".to_string()],
            created: vec!["fresh".to_string()],
            failed: Vec::new(),
        }
    }

    fn creator(platform: &Arc<FakePlatform>, rollback_tags: bool) -> TopicPostCreator {
        TopicPostCreator::new(platform.clone(), platform.clone(), platform.clone())
            .with_tag_rollback(rollback_tags)
    }

    #[tokio::test]
    async fn creates_topic_post_and_reply_with_tags() {
        let platform = Arc::new(seeded_platform().with_tag("rust").with_tag("fresh"));
        let row = validated("Configuring the thing");

        let report = creator(&platform, false)
            .create(&row, &users(&platform), &tags_with_created())
            .await;

        let imported = report.result.unwrap();
        assert!(report.rollback_errors.is_empty());
        assert_eq!(platform.topic_count(), 1);
        assert_eq!(platform.tags_of(imported.topic_id), vec!["fresh", "rust"]);

        let posts = platform.posts_of(imported.topic_id);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, imported.post_id);
        assert_eq!(posts[0].author, users(&platform).creator.id);
        assert_eq!(posts[1].id, imported.reply_id);
        assert_eq!(posts[1].author, users(&platform).replier.id);
        assert_eq!(posts[1].created_at, row.reply_created_at);
    }

    #[tokio::test]
    async fn topic_failure_has_nothing_to_roll_back() {
        let platform = Arc::new(seeded_platform().failing(|f| {
            f.topic_titles.insert("Blocked".to_string());
        }));

        let report = creator(&platform, true)
            .create(&validated("Blocked"), &users(&platform), &TagEnsureOutcome::default())
            .await;

        assert!(matches!(report.result, Err(CreationFailure::Topic(_))));
        assert!(report.rollback_errors.is_empty());
        assert_eq!(platform.topic_count(), 0);
    }

    #[tokio::test]
    async fn main_post_failure_removes_the_topic() {
        let row = validated("Main post fails");
        let body = row.body.clone();
        let platform = Arc::new(seeded_platform().failing(move |f| {
            f.post_bodies.insert(body);
        }));

        let report = creator(&platform, false)
            .create(&row, &users(&platform), &TagEnsureOutcome::default())
            .await;

        assert!(matches!(report.result, Err(CreationFailure::MainPost(_))));
        assert_eq!(platform.topic_count(), 0);
        assert_eq!(platform.post_count(), 0);
    }

    #[tokio::test]
    async fn reply_failure_removes_topic_and_post_but_keeps_tags() {
        let row = validated("Reply fails");
        let reply = row.reply.clone();
        let platform = Arc::new(
            seeded_platform()
                .with_tag("rust")
                .with_tag("fresh")
                .failing(move |f| {
                    f.post_bodies.insert(reply);
                }),
        );

        let report = creator(&platform, false)
            .create(&row, &users(&platform), &tags_with_created())
            .await;

        assert!(matches!(report.result, Err(CreationFailure::Reply(_))));
        assert_eq!(platform.topic_count(), 0);
        assert_eq!(platform.post_count(), 0);
        assert_eq!(platform.tag_names(), vec!["fresh", "rust"]);
    }

    #[tokio::test]
    async fn reply_failure_with_tag_rollback_destroys_created_tags() {
        let row = validated("Reply fails");
        let reply = row.reply.clone();
        let platform = Arc::new(
            seeded_platform()
                .with_tag("rust")
                .with_tag("fresh")
                .failing(move |f| {
                    f.post_bodies.insert(reply);
                }),
        );

        let report = creator(&platform, true)
            .create(&row, &users(&platform), &tags_with_created())
            .await;

        assert!(matches!(report.result, Err(CreationFailure::Reply(_))));
        assert!(report.rollback_errors.is_empty());
        assert_eq!(platform.topic_count(), 0);
        assert_eq!(platform.tag_names(), vec!["rust"]);
    }

    #[tokio::test]
    async fn tag_attach_failure_removes_the_topic() {
        let platform = Arc::new(
            seeded_platform()
                .with_tag("rust")
                .with_tag("fresh")
                .failing(|f| f.attach = true),
        );

        let report = creator(&platform, false)
            .create(&validated("Attach fails"), &users(&platform), &tags_with_created())
            .await;

        assert!(matches!(report.result, Err(CreationFailure::TagAttach(_))));
        assert_eq!(platform.topic_count(), 0);
    }

    #[tokio::test]
    async fn failed_rollback_step_is_reported_and_others_still_run() {
        let row = validated("Reply fails");
        let reply = row.reply.clone();
        let platform = Arc::new(seeded_platform().failing(move |f| {
            f.post_bodies.insert(reply);
            f.destroy_topic = true;
        }));

        let report = creator(&platform, false)
            .create(&row, &users(&platform), &TagEnsureOutcome::default())
            .await;

        assert!(matches!(report.result, Err(CreationFailure::Reply(_))));
        assert_eq!(report.rollback_errors.len(), 1);
        assert!(report.rollback_errors[0].starts_with("Could not delete topic"));
        // The opening post was still removed
        assert_eq!(platform.post_count(), 0);
    }
}
