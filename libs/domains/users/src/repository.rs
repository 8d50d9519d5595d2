use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserDocument};

/// Data access for the `users` collection.
///
/// Email uniqueness is exact and case-sensitive; a collision on create or
/// update is [`UserError::DuplicateEmail`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    async fn find(&self) -> UserResult<Vec<User>>;

    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn update(&self, id: ObjectId, input: UpdateUser) -> UserResult<Option<User>>;

    async fn delete(&self, id: ObjectId) -> UserResult<Option<User>>;
}

/// In-memory user store for tests
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<ObjectId, UserDocument>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == input.email) {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let doc = UserDocument::new(input);
        users.insert(doc.id, doc.clone());

        tracing::info!(user_id = %doc.id, "Created user");
        Ok(doc.into())
    }

    async fn find(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().map(User::from).collect())
    }

    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned().map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .map(User::from))
    }

    async fn update(&self, id: ObjectId, input: UpdateUser) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;

        if let Some(email) = &input.email {
            if users.values().any(|u| u.id != id && &u.email == email) {
                return Err(UserError::DuplicateEmail(email.clone()));
            }
        }

        Ok(users.get_mut(&id).map(|doc| {
            doc.apply(input);
            User::from(doc.clone())
        }))
    }

    async fn delete(&self, id: ObjectId) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.remove(&id).map(User::from))
    }
}
