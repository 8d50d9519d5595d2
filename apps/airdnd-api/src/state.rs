//! Shared application state.

use email::JoinNotifier;
use mongodb::{Client, Database};

/// Built once in `main` and handed to the route builders.
///
/// Cloning is cheap: the Mongo client and the notifier share their pools.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Pooled client; dropped during shutdown cleanup
    pub mongo_client: Client,
    pub db: Database,
    pub notifier: JoinNotifier,
}
