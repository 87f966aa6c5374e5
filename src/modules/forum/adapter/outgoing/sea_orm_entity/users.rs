use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::forum::application::domain::entities::{ForumUser, UserId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub full_name: String,
    pub is_deleted: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn to_forum_user(&self) -> ForumUser {
        ForumUser {
            id: UserId::from(self.id),
            username: self.username.clone(),
            is_deleted: self.is_deleted,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_emails::Entity")]
    UserEmails,
}

impl Related<super::user_emails::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserEmails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
