//! Events Domain
//!
//! Board-game meetup events stored in MongoDB, plus the join flow that
//! records a registration and emails a confirmation.
//!
//! ```text
//! POST /events/join ─┬─► events (existence check, when eventId is given)
//!                    ├─► registrations (idempotent upsert)
//!                    └─► JoinNotifier ─► SMTP relay
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_events::{EventService, MongoEventRepository, MongoRegistrationRepository, handlers};
//!
//! let db = client.database("airDND");
//! let service = EventService::new(
//!     MongoEventRepository::new(&db),
//!     MongoRegistrationRepository::new(&db),
//!     notifier,
//! );
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{EventError, EventResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateEvent, Event, EventFilter, JoinEvent, JoinResponse, Registration, SUGGESTED_GAME_TYPES,
    UpdateEvent,
};
pub use self::mongodb::{MongoEventRepository, MongoRegistrationRepository};
pub use repository::{
    EventRepository, InMemoryEventRepository, InMemoryRegistrationRepository,
    RegistrationRepository,
};
pub use service::EventService;
