//! MongoDB connector, configuration and health checks.

mod config;
mod connector;
mod errors;
mod health;

pub use config::MongoConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use errors::is_duplicate_key;
pub use health::check_health;

pub use mongodb::{Client, Collection, Database};
