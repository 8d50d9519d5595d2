//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use database::mongodb::is_duplicate_key;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{doc, oid::ObjectId},
    options::{IndexOptions, ReturnDocument},
};
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserDocument};
use crate::repository::UserRepository;

pub const USERS_COLLECTION: &str = "users";

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USERS_COLLECTION),
        }
    }

    /// Unique index on `email` with the default binary collation, so
    /// uniqueness is case-sensitive.
    pub async fn init_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let doc = UserDocument::new(input);

        match self.collection.insert_one(&doc).await {
            Ok(_) => {
                tracing::info!(user_id = %doc.id, "User created");
                Ok(doc.into())
            }
            Err(e) if is_duplicate_key(&e) => Err(UserError::DuplicateEmail(doc.email)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn find(&self) -> UserResult<Vec<User>> {
        let cursor = self.collection.find(doc! {}).await?;
        let docs: Vec<UserDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>> {
        let doc = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(doc.map(User::from))
    }

    #[instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let doc = self.collection.find_one(doc! { "email": email }).await?;
        Ok(doc.map(User::from))
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateUser) -> UserResult<Option<User>> {
        if input.is_empty() {
            return self.find_by_id(id).await;
        }

        let result = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": input.to_set_document() })
            .return_document(ReturnDocument::After)
            .await;

        match result {
            Ok(doc) => Ok(doc.map(User::from)),
            Err(e) if is_duplicate_key(&e) => Err(UserError::DuplicateEmail(
                input.email.unwrap_or_default(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> UserResult<Option<User>> {
        let doc = self.collection.find_one_and_delete(doc! { "_id": id }).await?;

        if doc.is_some() {
            tracing::info!(user_id = %id, "User deleted");
        }
        Ok(doc.map(User::from))
    }
}
