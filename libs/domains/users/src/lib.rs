//! Users Domain
//!
//! User records in MongoDB and the find-or-create step that runs when the
//! external sign-in provider reports a session.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │ Handlers                 │  ← /users CRUD, /auth/session hook
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │ Service / provisioning   │  ← NotFound mapping, ensure_user
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │ Repository               │  ← trait, MongoDB and in-memory
//! └──────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_users::{MongoUserRepository, UserService, handlers};
//!
//! let repository = MongoUserRepository::new(&client.database("airDND"));
//! repository.init_indexes().await?;
//! let router = handlers::router(UserService::new(repository));
//! ```

pub mod auth_handlers;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod provisioning;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{CreateUser, DEFAULT_ROLE, UpdateUser, User};
pub use self::mongodb::MongoUserRepository;
pub use provisioning::{OUTCOME_SKIPPED, ProvisioningOutcome, ensure_user};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
