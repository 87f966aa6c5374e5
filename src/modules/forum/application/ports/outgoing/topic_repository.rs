use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::forum::application::domain::entities::{Guardian, TopicRecord, UserId};

// Input DTO for creating a topic
#[derive(Debug, Clone)]
pub struct CreateTopicData {
    pub creator: UserId,
    pub guardian: Guardian,
    pub title: String,
    pub raw: String,
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    /// Bypass end-user rate and content policy (bulk loads).
    pub import_mode: bool,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TopicRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Topic rejected: {0}")]
    Rejected(String),

    #[error("Topic not found")]
    TopicNotFound,
}

#[async_trait]
pub trait TopicRepository: Send + Sync {
    async fn create_topic(&self, data: CreateTopicData)
        -> Result<TopicRecord, TopicRepositoryError>;

    /// Hard delete. Posts and tag links go with the topic.
    async fn destroy_topic(&self, topic_id: Uuid) -> Result<(), TopicRepositoryError>;
}
