use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::EventResult;
use crate::models::{
    CreateEvent, Event, EventDocument, EventFilter, Registration, RegistrationDocument,
    UpdateEvent, to_bson_datetime,
};

/// Data access for the `events` collection.
///
/// Ids arrive already parsed; malformed ids are rejected at the HTTP
/// boundary. Absent documents are `Ok(None)`, never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert with a fresh id and `createdAt` set to now
    async fn create(&self, input: CreateEvent) -> EventResult<Event>;

    /// All events matching the filter, in no guaranteed order
    async fn find(&self, filter: EventFilter) -> EventResult<Vec<Event>>;

    async fn find_by_id(&self, id: ObjectId) -> EventResult<Option<Event>>;

    /// Partial update returning the post-update document
    async fn update(&self, id: ObjectId, input: UpdateEvent) -> EventResult<Option<Event>>;

    /// Remove and return the document
    async fn delete(&self, id: ObjectId) -> EventResult<Option<Event>>;
}

/// Data access for the `registrations` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Idempotent upsert keyed by `(event_id, email)`. The first `joinedAt` wins.
    async fn register(&self, event_id: ObjectId, email: &str, name: &str)
    -> EventResult<Registration>;

    /// Registrations for one event, oldest first
    async fn list_for_event(&self, event_id: ObjectId) -> EventResult<Vec<Registration>>;
}

/// In-memory event store for tests and local runs without MongoDB
#[derive(Clone, Default)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<ObjectId, EventDocument>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, input: CreateEvent) -> EventResult<Event> {
        let doc = EventDocument::new(input);
        self.events.write().await.insert(doc.id, doc.clone());

        tracing::info!(event_id = %doc.id, "Created event");
        Ok(doc.into())
    }

    async fn find(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        let events = self.events.read().await;
        Ok(events
            .values()
            .cloned()
            .map(Event::from)
            .filter(|event| filter.matches(event))
            .collect())
    }

    async fn find_by_id(&self, id: ObjectId) -> EventResult<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.get(&id).cloned().map(Event::from))
    }

    async fn update(&self, id: ObjectId, input: UpdateEvent) -> EventResult<Option<Event>> {
        let mut events = self.events.write().await;
        Ok(events.get_mut(&id).map(|doc| {
            doc.apply(input);
            Event::from(doc.clone())
        }))
    }

    async fn delete(&self, id: ObjectId) -> EventResult<Option<Event>> {
        let mut events = self.events.write().await;
        Ok(events.remove(&id).map(Event::from))
    }
}

/// In-memory registration store
#[derive(Clone, Default)]
pub struct InMemoryRegistrationRepository {
    registrations: Arc<RwLock<Vec<RegistrationDocument>>>,
}

impl InMemoryRegistrationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryRegistrationRepository {
    async fn register(
        &self,
        event_id: ObjectId,
        email: &str,
        name: &str,
    ) -> EventResult<Registration> {
        let mut registrations = self.registrations.write().await;

        if let Some(existing) = registrations
            .iter()
            .find(|r| r.event_id == event_id && r.email == email)
        {
            return Ok(existing.clone().into());
        }

        let doc = RegistrationDocument {
            id: Some(ObjectId::new()),
            event_id,
            email: email.to_string(),
            name: name.to_string(),
            joined_at: to_bson_datetime(Utc::now()),
        };
        registrations.push(doc.clone());
        Ok(doc.into())
    }

    async fn list_for_event(&self, event_id: ObjectId) -> EventResult<Vec<Registration>> {
        let registrations = self.registrations.read().await;
        let mut matching: Vec<RegistrationDocument> = registrations
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.joined_at);
        Ok(matching.into_iter().map(Registration::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chess_night() -> CreateEvent {
        CreateEvent {
            name: "Chess night".to_string(),
            location: "Library".to_string(),
            coordinates: [2.3522, 48.8566],
            game_type: "Chess".to_string(),
            date: "2026-12-01T18:30:00Z".to_string(),
            participants: None,
            description: Some("Bring a clock".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_then_find_by_id() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(chess_night()).await.unwrap();

        let id = ObjectId::parse_str(&created.id).unwrap();
        let fetched = repo.find_by_id(id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.description.as_deref(), Some("Bring a clock"));
    }

    #[tokio::test]
    async fn test_update_changes_only_given_field() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(chess_night()).await.unwrap();
        let id = ObjectId::parse_str(&created.id).unwrap();

        let updated = repo
            .update(
                id,
                UpdateEvent {
                    location: Some("Cafe".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.location, "Cafe");
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_absent_return_none() {
        let repo = InMemoryEventRepository::new();
        let id = ObjectId::new();

        assert!(repo.update(id, UpdateEvent::default()).await.unwrap().is_none());
        assert!(repo.delete(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_then_find_returns_none() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(chess_night()).await.unwrap();
        let id = ObjectId::parse_str(&created.id).unwrap();

        let deleted = repo.delete(id).await.unwrap();
        assert_eq!(deleted.map(|e| e.id), Some(created.id));
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_filters_by_game_type() {
        let repo = InMemoryEventRepository::new();
        repo.create(chess_night()).await.unwrap();
        let mut catan = chess_night();
        catan.game_type = "Settlers of Catan".to_string();
        repo.create(catan).await.unwrap();

        assert_eq!(repo.find(EventFilter::default()).await.unwrap().len(), 2);

        let only_catan = repo
            .find(EventFilter {
                game_type: Some("Settlers of Catan".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(only_catan.len(), 1);
        assert_eq!(only_catan[0].game_type, "Settlers of Catan");
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let repo = InMemoryRegistrationRepository::new();
        let event_id = ObjectId::new();

        let first = repo.register(event_id, "ada@example.com", "Ada").await.unwrap();
        let again = repo.register(event_id, "ada@example.com", "Ada L.").await.unwrap();

        assert_eq!(first, again);
        assert_eq!(repo.list_for_event(event_id).await.unwrap().len(), 1);
        assert!(repo.list_for_event(ObjectId::new()).await.unwrap().is_empty());
    }
}
