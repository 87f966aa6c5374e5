use super::sea_orm_entity::user_emails::{Column as UserEmailColumn, Entity as UserEmailEntity};
use super::sea_orm_entity::users::{Entity as UserEntity, Model as UserModel};
use crate::forum::application::domain::entities::ForumUser;
use crate::forum::application::ports::outgoing::{UserQuery, UserQueryError};
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct UserQueryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserQueryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Matching is case-insensitive, backed by the `lower(email)` index.
    fn normalize(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

#[async_trait]
impl UserQuery for UserQueryPostgres {
    async fn find_by_email(&self, email: &str) -> Result<Option<ForumUser>, UserQueryError> {
        let email = Self::normalize(email);
        if email.is_empty() {
            return Ok(None);
        }

        let user: Option<UserModel> = UserEntity::find()
            .inner_join(UserEmailEntity)
            .filter(
                Expr::expr(Func::lower(Expr::col((UserEmailEntity, UserEmailColumn::Email))))
                    .eq(email),
            )
            .one(&*self.db)
            .await
            .map_err(|e| UserQueryError::DatabaseError(e.to_string()))?;

        Ok(user.map(|m| m.to_forum_user()))
    }
}
