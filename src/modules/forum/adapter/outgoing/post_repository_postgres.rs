use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, SqlErr};
use std::sync::Arc;
use uuid::Uuid;

use crate::forum::application::domain::entities::PostRecord;
use crate::forum::application::ports::outgoing::{
    CreatePostData, PostRepository, PostRepositoryError,
};

use super::sea_orm_entity::posts::{
    ActiveModel as PostActiveModel, Entity as PostEntity, Model as PostModel,
};

#[derive(Debug, Clone)]
pub struct PostRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl PostRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PostRepositoryPostgres {
    async fn create_post(&self, data: CreatePostData) -> Result<PostRecord, PostRepositoryError> {
        if data.raw.trim().is_empty() {
            return Err(PostRepositoryError::Rejected("post body is empty".to_string()));
        }

        let created_at = data.created_at.fixed_offset();

        let active = PostActiveModel {
            id: Set(Uuid::new_v4()),
            topic_id: Set(data.topic_id),
            user_id: Set(data.author.into()),
            raw: Set(data.raw),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        };

        let inserted: PostModel = active.insert(&*self.db).await.map_err(|e| {
            match e.sql_err() {
                // Topic vanished between steps
                Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                    PostRepositoryError::Rejected(msg)
                }
                _ => PostRepositoryError::DatabaseError(e.to_string()),
            }
        })?;

        Ok(inserted.to_record())
    }

    async fn destroy_post(&self, post_id: Uuid) -> Result<(), PostRepositoryError> {
        let result = PostEntity::delete_by_id(post_id)
            .exec(&*self.db)
            .await
            .map_err(|e| PostRepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(PostRepositoryError::PostNotFound);
        }

        Ok(())
    }
}
