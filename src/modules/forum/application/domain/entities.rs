use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<UserId> for Uuid {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A platform account as seen by the importer. Read-only: users are
/// never created here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumUser {
    pub id: UserId,
    pub username: String,
    pub is_deleted: bool,
}

impl ForumUser {
    pub fn guardian(&self) -> Guardian {
        Guardian::new(self)
    }
}

/// Capability object describing what a user may do on the platform.
/// Topic creation requires one for the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guardian {
    user_id: UserId,
    is_active: bool,
}

impl Guardian {
    pub fn new(user: &ForumUser) -> Self {
        Self {
            user_id: user.id,
            is_active: !user.is_deleted,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Inactive accounts may only author topics through a bulk import.
    pub fn can_create_topic(&self, import_mode: bool) -> bool {
        self.is_active || import_mode
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRecord {
    pub id: Uuid,
    pub creator: UserId,
    pub category_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub author: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    pub id: Uuid,
    pub name: String,
}
