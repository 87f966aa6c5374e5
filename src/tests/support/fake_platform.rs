use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::forum::application::domain::entities::{
    ForumUser, PostRecord, TagRecord, TopicRecord, UserId,
};
use crate::forum::application::ports::outgoing::{
    CategoryQuery, CategoryQueryError, CreatePostData, CreateTopicData, PostRepository,
    PostRepositoryError, TagRepository, TagRepositoryError, TopicRepository,
    TopicRepositoryError, UserQuery, UserQueryError,
};

/// Forced failures, keyed by the value the call would carry.
#[derive(Default)]
pub struct Failures {
    pub topic_titles: HashSet<String>,
    pub post_bodies: HashSet<String>,
    pub tag_names: HashSet<String>,
    pub attach: bool,
    pub destroy_topic: bool,
    pub user_lookup: bool,
}

#[derive(Default)]
pub struct PlatformState {
    pub users: HashMap<String, ForumUser>,
    pub categories: HashSet<i64>,
    pub topics: HashMap<Uuid, TopicRecord>,
    pub posts: HashMap<Uuid, PostRecord>,
    pub tags: HashMap<String, TagRecord>,
    pub topic_tags: HashSet<(Uuid, String)>,
    pub fail: Failures,
}

/// In-memory forum implementing every outgoing forum port. Deleting a
/// topic removes its posts and tag links like the database cascade does.
#[derive(Default)]
pub struct FakePlatform {
    state: Mutex<PlatformState>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, email: &str, username: &str) -> Self {
        let user = ForumUser {
            id: UserId::from(Uuid::new_v4()),
            username: username.to_string(),
            is_deleted: false,
        };
        self.state
            .lock()
            .unwrap()
            .users
            .insert(email.to_lowercase(), user);
        self
    }

    pub fn with_category(self, id: i64) -> Self {
        self.state.lock().unwrap().categories.insert(id);
        self
    }

    pub fn with_tag(self, name: &str) -> Self {
        let tag = TagRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.state
            .lock()
            .unwrap()
            .tags
            .insert(name.to_string(), tag);
        self
    }

    /// Runs `f` against the failure switches.
    pub fn failing(self, f: impl FnOnce(&mut Failures)) -> Self {
        f(&mut self.state.lock().unwrap().fail);
        self
    }

    pub fn topic_count(&self) -> usize {
        self.state.lock().unwrap().topics.len()
    }

    pub fn post_count(&self) -> usize {
        self.state.lock().unwrap().posts.len()
    }

    pub fn topic_titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self
            .state
            .lock()
            .unwrap()
            .topics
            .values()
            .map(|t| t.title.clone())
            .collect();
        titles.sort();
        titles
    }

    pub fn tag_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.lock().unwrap().tags.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn tags_of(&self, topic_id: Uuid) -> Vec<String> {
        let mut names: Vec<String> = self
            .state
            .lock()
            .unwrap()
            .topic_tags
            .iter()
            .filter(|(id, _)| *id == topic_id)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn posts_of(&self, topic_id: Uuid) -> Vec<PostRecord> {
        let mut posts: Vec<PostRecord> = self
            .state
            .lock()
            .unwrap()
            .posts
            .values()
            .filter(|p| p.topic_id == topic_id)
            .cloned()
            .collect();
        posts.sort_by_key(|p| p.created_at);
        posts
    }

    pub fn user(&self, email: &str) -> Option<ForumUser> {
        self.state.lock().unwrap().users.get(email).cloned()
    }
}

#[async_trait]
impl UserQuery for FakePlatform {
    async fn find_by_email(&self, email: &str) -> Result<Option<ForumUser>, UserQueryError> {
        let state = self.state.lock().unwrap();
        if state.fail.user_lookup {
            return Err(UserQueryError::DatabaseError("connection reset".to_string()));
        }
        Ok(state.users.get(&email.trim().to_lowercase()).cloned())
    }
}

#[async_trait]
impl CategoryQuery for FakePlatform {
    async fn exists(&self, category_id: i64) -> Result<bool, CategoryQueryError> {
        Ok(self.state.lock().unwrap().categories.contains(&category_id))
    }
}

#[async_trait]
impl TopicRepository for FakePlatform {
    async fn create_topic(
        &self,
        data: CreateTopicData,
    ) -> Result<TopicRecord, TopicRepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.fail.topic_titles.contains(&data.title) {
            return Err(TopicRepositoryError::Rejected("title is blocked".to_string()));
        }
        if !data.guardian.can_create_topic(data.import_mode) {
            return Err(TopicRepositoryError::Rejected("forbidden".to_string()));
        }

        let topic = TopicRecord {
            id: Uuid::new_v4(),
            creator: data.creator,
            category_id: data.category_id,
            title: data.title,
            created_at: data.created_at,
        };
        state.topics.insert(topic.id, topic.clone());
        Ok(topic)
    }

    async fn destroy_topic(&self, topic_id: Uuid) -> Result<(), TopicRepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.fail.destroy_topic {
            return Err(TopicRepositoryError::DatabaseError("lock timeout".to_string()));
        }
        if state.topics.remove(&topic_id).is_none() {
            return Err(TopicRepositoryError::TopicNotFound);
        }
        state.posts.retain(|_, p| p.topic_id != topic_id);
        state.topic_tags.retain(|(id, _)| *id != topic_id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for FakePlatform {
    async fn create_post(&self, data: CreatePostData) -> Result<PostRecord, PostRepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.fail.post_bodies.contains(&data.raw) {
            return Err(PostRepositoryError::Rejected("body is blocked".to_string()));
        }
        if !state.topics.contains_key(&data.topic_id) {
            return Err(PostRepositoryError::Rejected("topic does not exist".to_string()));
        }

        let post = PostRecord {
            id: Uuid::new_v4(),
            topic_id: data.topic_id,
            author: data.author,
            created_at: data.created_at,
        };
        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn destroy_post(&self, post_id: Uuid) -> Result<(), PostRepositoryError> {
        match self.state.lock().unwrap().posts.remove(&post_id) {
            Some(_) => Ok(()),
            None => Err(PostRepositoryError::PostNotFound),
        }
    }
}

#[async_trait]
impl TagRepository for FakePlatform {
    async fn find_existing_names(
        &self,
        names: &[String],
    ) -> Result<Vec<String>, TagRepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(names
            .iter()
            .filter(|n| state.tags.contains_key(*n))
            .cloned()
            .collect())
    }

    async fn create_tag(&self, name: &str) -> Result<TagRecord, TagRepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.fail.tag_names.contains(name) {
            return Err(TagRepositoryError::InvalidName(name.to_string()));
        }
        if state.tags.contains_key(name) {
            return Err(TagRepositoryError::TagAlreadyExists);
        }

        let tag = TagRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        state.tags.insert(name.to_string(), tag.clone());
        Ok(tag)
    }

    async fn attach_tags(&self, topic_id: Uuid, names: &[String]) -> Result<(), TagRepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.fail.attach {
            return Err(TagRepositoryError::DatabaseError("deadlock detected".to_string()));
        }
        if !state.topics.contains_key(&topic_id) {
            return Err(TagRepositoryError::TopicNotFound);
        }
        let known: Vec<String> = names
            .iter()
            .filter(|n| state.tags.contains_key(*n))
            .cloned()
            .collect();
        for name in known {
            state.topic_tags.insert((topic_id, name));
        }
        Ok(())
    }

    async fn detach_tags(&self, topic_id: Uuid) -> Result<(), TagRepositoryError> {
        self.state
            .lock()
            .unwrap()
            .topic_tags
            .retain(|(id, _)| *id != topic_id);
        Ok(())
    }

    async fn destroy_tags(&self, names: &[String]) -> Result<(), TagRepositoryError> {
        let mut state = self.state.lock().unwrap();
        for name in names {
            state.tags.remove(name);
        }
        state.topic_tags.retain(|(_, n)| !names.contains(n));
        Ok(())
    }
}
