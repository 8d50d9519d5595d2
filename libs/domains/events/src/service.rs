use email::{JoinConfirmation, JoinNotifier};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{EventError, EventResult};
use crate::models::{CreateEvent, Event, EventFilter, JoinEvent, Registration, UpdateEvent};
use crate::repository::{EventRepository, RegistrationRepository};

/// Event operations plus the join flow.
///
/// Input validation happens in the `ValidatedJson` extractor, so the
/// service only deals with existence and side effects.
pub struct EventService<R: EventRepository, G: RegistrationRepository> {
    events: Arc<R>,
    registrations: Arc<G>,
    notifier: JoinNotifier,
}

impl<R: EventRepository, G: RegistrationRepository> EventService<R, G> {
    pub fn new(events: R, registrations: G, notifier: JoinNotifier) -> Self {
        Self {
            events: Arc::new(events),
            registrations: Arc::new(registrations),
            notifier,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_events(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        self.events.find(filter).await
    }

    #[instrument(skip(self, input), fields(event_name = %input.name))]
    pub async fn create_event(&self, input: CreateEvent) -> EventResult<Event> {
        self.events.create(input).await
    }

    /// `None` when absent; GET renders that as a `null` body.
    #[instrument(skip(self))]
    pub async fn get_event(&self, id: ObjectId) -> EventResult<Option<Event>> {
        self.events.find_by_id(id).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_event(&self, id: ObjectId, input: UpdateEvent) -> EventResult<Event> {
        self.events
            .update(id, input)
            .await?
            .ok_or(EventError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: ObjectId) -> EventResult<Event> {
        self.events.delete(id).await?.ok_or(EventError::NotFound)
    }

    /// Sends the confirmation email. With an `eventId` the event must exist,
    /// and the join is recorded before anything is sent.
    #[instrument(skip(self, join), fields(event_id = ?join.event_id))]
    pub async fn join_event(&self, join: JoinEvent) -> EventResult<()> {
        let mut confirmation = JoinConfirmation {
            to_email: join.email,
            recipient_name: join.name,
            event_name: join.event_name,
            event_date: join.event_date,
            event_time: join.event_time,
        };

        if let Some(raw_id) = join.event_id {
            let id = ObjectId::parse_str(&raw_id).map_err(|_| EventError::InvalidId(raw_id))?;
            let event = self
                .events
                .find_by_id(id)
                .await?
                .ok_or(EventError::NotFound)?;

            self.registrations
                .register(id, &confirmation.to_email, &confirmation.recipient_name)
                .await?;

            if confirmation.event_name.is_empty() {
                confirmation.event_name = event.name;
            }
            if confirmation.event_date.is_empty() {
                confirmation.event_date = event.date;
            }
        }

        self.notifier.send_join_confirmation(&confirmation).await?;
        Ok(())
    }

    /// Registrations for an event. An unknown event simply has none.
    #[instrument(skip(self))]
    pub async fn list_registrations(&self, event_id: ObjectId) -> EventResult<Vec<Registration>> {
        self.registrations.list_for_event(event_id).await
    }
}
