use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};
use crate::provisioning::{ProvisioningOutcome, ensure_user};
use crate::repository::UserRepository;

/// User operations and sign-in provisioning
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.find().await
    }

    /// Uniqueness is left to the store, so two concurrent creates with the
    /// same email cannot both succeed.
    #[instrument(skip(self, input))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: ObjectId) -> UserResult<Option<User>> {
        self.repository.find_by_id(id).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: ObjectId, input: UpdateUser) -> UserResult<User> {
        self.repository
            .update(id, input)
            .await?
            .ok_or(UserError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: ObjectId) -> UserResult<User> {
        self.repository.delete(id).await?.ok_or(UserError::NotFound)
    }

    pub async fn ensure_user(&self, email: &str) -> ProvisioningOutcome {
        ensure_user(self.repository.as_ref(), email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;

    #[tokio::test]
    async fn test_delete_absent_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().times(1).returning(|_| Ok(None));

        let service = UserService::new(repo);
        let result = service.delete_user(ObjectId::new()).await;

        assert!(matches!(result, Err(UserError::NotFound)));
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .returning(|input| Err(UserError::DuplicateEmail(input.email)));

        let service = UserService::new(repo);
        let result = service
            .create_user(CreateUser::placeholder("dup@example.com"))
            .await;

        assert!(matches!(
            result,
            Err(UserError::DuplicateEmail(email)) if email == "dup@example.com"
        ));
    }

    #[tokio::test]
    async fn test_update_store_error_propagates() {
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .returning(|_, _| Err(UserError::Database("not primary".into())));

        let service = UserService::new(repo);
        let result = service.update_user(ObjectId::new(), UpdateUser::default()).await;

        assert!(matches!(result, Err(UserError::Database(_))));
    }
}
