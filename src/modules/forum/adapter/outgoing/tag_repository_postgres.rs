use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::forum::application::domain::entities::TagRecord;
use crate::forum::application::ports::outgoing::{TagRepository, TagRepositoryError};

use super::sea_orm_entity::tags::{
    ActiveModel as TagActiveModel, Column as TagColumn, Entity as TagEntity, Model as TagModel,
};
use super::sea_orm_entity::topic_tags::{
    ActiveModel as TopicTagActiveModel, Column as TopicTagColumn, Entity as TopicTagEntity,
};

const MAX_TAG_NAME_LEN: usize = 100;

#[derive(Debug, Clone)]
pub struct TagRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl TagRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn validate_name(name: &str) -> Result<(), TagRepositoryError> {
        if name.trim().is_empty() {
            return Err(TagRepositoryError::InvalidName("name is empty".to_string()));
        }
        if name.chars().count() > MAX_TAG_NAME_LEN {
            return Err(TagRepositoryError::InvalidName(format!(
                "'{name}' is longer than {MAX_TAG_NAME_LEN} characters"
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(TagRepositoryError::InvalidName(format!(
                "'{}' contains control characters",
                name.escape_default()
            )));
        }
        Ok(())
    }

    fn map_db_err(e: DbErr) -> TagRepositoryError {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => TagRepositoryError::TagAlreadyExists,
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => TagRepositoryError::TopicNotFound,
            _ => TagRepositoryError::DatabaseError(e.to_string()),
        }
    }

    async fn find_models(&self, names: &[String]) -> Result<Vec<TagModel>, TagRepositoryError> {
        TagEntity::find()
            .filter(TagColumn::Name.is_in(names.iter().cloned()))
            .all(&*self.db)
            .await
            .map_err(Self::map_db_err)
    }
}

#[async_trait]
impl TagRepository for TagRepositoryPostgres {
    async fn find_existing_names(
        &self,
        names: &[String],
    ) -> Result<Vec<String>, TagRepositoryError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let models = self.find_models(names).await?;

        Ok(models.into_iter().map(|m| m.name).collect())
    }

    async fn create_tag(&self, name: &str) -> Result<TagRecord, TagRepositoryError> {
        Self::validate_name(name)?;

        let active = TagActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            ..Default::default()
        };

        let inserted = active.insert(&*self.db).await.map_err(Self::map_db_err)?;

        Ok(inserted.to_record())
    }

    async fn attach_tags(
        &self,
        topic_id: Uuid,
        names: &[String],
    ) -> Result<(), TagRepositoryError> {
        if names.is_empty() {
            return Ok(());
        }

        let tags = self.find_models(names).await?;
        if tags.is_empty() {
            return Ok(());
        }

        let links = tags.into_iter().map(|tag| TopicTagActiveModel {
            topic_id: Set(topic_id),
            tag_id: Set(tag.id),
            ..Default::default()
        });

        // Re-attaching an existing link is a no-op
        TopicTagEntity::insert_many(links)
            .on_conflict(
                OnConflict::columns([TopicTagColumn::TopicId, TopicTagColumn::TagId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await
            .map_err(Self::map_db_err)?;

        Ok(())
    }

    async fn detach_tags(&self, topic_id: Uuid) -> Result<(), TagRepositoryError> {
        TopicTagEntity::delete_many()
            .filter(TopicTagColumn::TopicId.eq(topic_id))
            .exec(&*self.db)
            .await
            .map_err(Self::map_db_err)?;

        Ok(())
    }

    async fn destroy_tags(&self, names: &[String]) -> Result<(), TagRepositoryError> {
        if names.is_empty() {
            return Ok(());
        }

        TagEntity::delete_many()
            .filter(TagColumn::Name.is_in(names.iter().cloned()))
            .exec(&*self.db)
            .await
            .map_err(Self::map_db_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn tag_model(name: &str) -> TagModel {
        TagModel {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_find_existing_names() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![tag_model("rust")]])
            .into_connection();

        let repo = TagRepositoryPostgres::new(Arc::new(db));

        let found = repo
            .find_existing_names(&names(&["rust", "sea-orm"]))
            .await
            .unwrap();

        assert_eq!(found, vec!["rust".to_string()]);
    }

    #[tokio::test]
    async fn test_find_existing_names_empty_input_skips_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = TagRepositoryPostgres::new(Arc::new(db));

        assert!(repo.find_existing_names(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_tag_success() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![tag_model("rust")]])
            .into_connection();

        let repo = TagRepositoryPostgres::new(Arc::new(db));

        let tag = repo.create_tag("rust").await.unwrap();

        assert_eq!(tag.name, "rust");
    }

    #[tokio::test]
    async fn test_create_tag_invalid_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = TagRepositoryPostgres::new(Arc::new(db));

        let too_long = "t".repeat(MAX_TAG_NAME_LEN + 1);

        assert!(matches!(
            repo.create_tag(&too_long).await,
            Err(TagRepositoryError::InvalidName(_))
        ));
        assert!(matches!(
            repo.create_tag("bad\tname").await,
            Err(TagRepositoryError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn test_create_tag_database_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![DbErr::Custom("disk full".to_string())])
            .into_connection();

        let repo = TagRepositoryPostgres::new(Arc::new(db));

        assert!(matches!(
            repo.create_tag("rust").await,
            Err(TagRepositoryError::DatabaseError(_))
        ));
    }

    #[tokio::test]
    async fn test_attach_tags_inserts_links() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![tag_model("rust"), tag_model("async")]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();

        let repo = TagRepositoryPostgres::new(Arc::new(db));

        let result = repo
            .attach_tags(Uuid::new_v4(), &names(&["rust", "async"]))
            .await;

        assert!(result.is_ok(), "Expected Ok, got {:?}", result);
    }

    #[tokio::test]
    async fn test_attach_tags_without_known_tags_is_noop() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<TagModel>::new()])
            .into_connection();

        let repo = TagRepositoryPostgres::new(Arc::new(db));

        assert!(repo
            .attach_tags(Uuid::new_v4(), &names(&["ghost"]))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_detach_and_destroy() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let repo = TagRepositoryPostgres::new(Arc::new(db));

        assert!(repo.detach_tags(Uuid::new_v4()).await.is_ok());
        assert!(repo.destroy_tags(&names(&["fresh"])).await.is_ok());
    }
}
