use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};
use std::sync::Arc;

use super::sea_orm_entity::categories::Entity as CategoryEntity;
use crate::forum::application::ports::outgoing::{CategoryQuery, CategoryQueryError};

#[derive(Debug, Clone)]
pub struct CategoryQueryPostgres {
    db: Arc<DatabaseConnection>,
}

impl CategoryQueryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryQuery for CategoryQueryPostgres {
    async fn exists(&self, category_id: i64) -> Result<bool, CategoryQueryError> {
        let found = CategoryEntity::find_by_id(category_id)
            .one(&*self.db)
            .await
            .map_err(|e| CategoryQueryError::DatabaseError(e.to_string()))?;

        Ok(found.is_some())
    }
}
