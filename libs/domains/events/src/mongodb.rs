//! MongoDB implementations of the event and registration repositories

use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{doc, oid::ObjectId},
    options::{FindOptions, IndexOptions, ReturnDocument},
};
use tracing::instrument;

use crate::error::EventResult;
use crate::models::{
    CreateEvent, Event, EventDocument, EventFilter, Registration, RegistrationDocument,
    UpdateEvent, to_bson_datetime,
};
use crate::repository::{EventRepository, RegistrationRepository};

pub const EVENTS_COLLECTION: &str = "events";
pub const REGISTRATIONS_COLLECTION: &str = "registrations";

/// MongoDB implementation of [`EventRepository`]
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<EventDocument>,
}

impl MongoEventRepository {
    /// ```ignore
    /// let client = database::mongodb::connect_from_config(&config).await?;
    /// let repo = MongoEventRepository::new(&client.database("airDND"));
    /// ```
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(EVENTS_COLLECTION),
        }
    }

    /// Secondary index for the `gameType` filter.
    pub async fn init_indexes(&self) -> EventResult<()> {
        let index = IndexModel::builder().keys(doc! { "gameType": 1 }).build();
        self.collection.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, input), fields(event_name = %input.name))]
    async fn create(&self, input: CreateEvent) -> EventResult<Event> {
        let doc = EventDocument::new(input);
        self.collection.insert_one(&doc).await?;

        tracing::info!(event_id = %doc.id, "Event created");
        Ok(doc.into())
    }

    #[instrument(skip(self))]
    async fn find(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        let cursor = self.collection.find(filter.to_document()).await?;
        let docs: Vec<EventDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Event::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> EventResult<Option<Event>> {
        let doc = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(doc.map(Event::from))
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateEvent) -> EventResult<Option<Event>> {
        if input.is_empty() {
            return self.find_by_id(id).await;
        }

        let doc = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": input.to_set_document() })
            .return_document(ReturnDocument::After)
            .await?;

        if doc.is_some() {
            tracing::info!(event_id = %id, "Event updated");
        }
        Ok(doc.map(Event::from))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> EventResult<Option<Event>> {
        let doc = self.collection.find_one_and_delete(doc! { "_id": id }).await?;

        if doc.is_some() {
            tracing::info!(event_id = %id, "Event deleted");
        }
        Ok(doc.map(Event::from))
    }
}

/// MongoDB implementation of [`RegistrationRepository`]
#[derive(Clone)]
pub struct MongoRegistrationRepository {
    collection: Collection<RegistrationDocument>,
}

impl MongoRegistrationRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(REGISTRATIONS_COLLECTION),
        }
    }

    /// Unique `(eventId, email)` so concurrent re-joins collapse into one document.
    pub async fn init_indexes(&self) -> EventResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "eventId": 1, "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl RegistrationRepository for MongoRegistrationRepository {
    #[instrument(skip(self, email, name))]
    async fn register(
        &self,
        event_id: ObjectId,
        email: &str,
        name: &str,
    ) -> EventResult<Registration> {
        let filter = doc! { "eventId": event_id, "email": email };
        let update = doc! {
            "$setOnInsert": {
                "eventId": event_id,
                "email": email,
                "name": name,
                "joinedAt": to_bson_datetime(Utc::now()),
            }
        };

        let upserted = self
            .collection
            .find_one_and_update(filter.clone(), update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await;

        let doc = match upserted {
            Ok(Some(doc)) => doc,
            Ok(None) => self.read_back(filter).await?,
            // Lost an upsert race on the unique index: the other writer's document stands.
            Err(e) if database::mongodb::is_duplicate_key(&e) => self.read_back(filter).await?,
            Err(e) => return Err(e.into()),
        };

        Ok(doc.into())
    }

    #[instrument(skip(self))]
    async fn list_for_event(&self, event_id: ObjectId) -> EventResult<Vec<Registration>> {
        let options = FindOptions::builder().sort(doc! { "joinedAt": 1 }).build();
        let cursor = self
            .collection
            .find(doc! { "eventId": event_id })
            .with_options(options)
            .await?;
        let docs: Vec<RegistrationDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Registration::from).collect())
    }
}

impl MongoRegistrationRepository {
    async fn read_back(
        &self,
        filter: mongodb::bson::Document,
    ) -> EventResult<RegistrationDocument> {
        self.collection.find_one(filter).await?.ok_or_else(|| {
            crate::error::EventError::Database("registration vanished after upsert".into())
        })
    }
}
