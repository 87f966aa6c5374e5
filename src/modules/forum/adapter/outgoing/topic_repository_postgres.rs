use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::forum::application::domain::entities::TopicRecord;
use crate::forum::application::domain::policies::TopicPolicy;
use crate::forum::application::ports::outgoing::{
    CreateTopicData, TopicRepository, TopicRepositoryError,
};

// SeaORM entity imports
use super::sea_orm_entity::topics::{
    ActiveModel as TopicActiveModel, Entity as TopicEntity, Model as TopicModel,
};

const EXCERPT_LEN: usize = 220;

#[derive(Debug, Clone)]
pub struct TopicRepositoryPostgres {
    db: Arc<DatabaseConnection>,
    policy: TopicPolicy,
}

impl TopicRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self::with_policy(db, TopicPolicy::default())
    }

    pub fn with_policy(db: Arc<DatabaseConnection>, policy: TopicPolicy) -> Self {
        Self { db, policy }
    }

    fn excerpt(raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(raw.chars().take(EXCERPT_LEN).collect())
    }
}

#[async_trait]
impl TopicRepository for TopicRepositoryPostgres {
    async fn create_topic(
        &self,
        data: CreateTopicData,
    ) -> Result<TopicRecord, TopicRepositoryError> {
        if data.guardian.user_id() != data.creator {
            return Err(TopicRepositoryError::Rejected(
                "guardian does not belong to the topic creator".to_string(),
            ));
        }

        self.policy
            .check(&data.guardian, &data.title, &data.raw, data.import_mode)
            .map_err(|v| TopicRepositoryError::Rejected(v.to_string()))?;

        let created_at = data.created_at.fixed_offset();

        let active = TopicActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(data.creator.into()),
            category_id: Set(data.category_id),
            title: Set(data.title.trim().to_string()),
            excerpt: Set(Self::excerpt(&data.raw)),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        };

        let inserted: TopicModel = active
            .insert(&*self.db)
            .await
            .map_err(|e| TopicRepositoryError::DatabaseError(e.to_string()))?;

        Ok(inserted.to_record())
    }

    async fn destroy_topic(&self, topic_id: Uuid) -> Result<(), TopicRepositoryError> {
        let result = TopicEntity::delete_by_id(topic_id)
            .exec(&*self.db)
            .await
            .map_err(|e| TopicRepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(TopicRepositoryError::TopicNotFound);
        }

        Ok(())
    }
}
