//! Events, joins and registrations backed by MongoDB

use axum::Router;
use domain_events::{EventService, MongoEventRepository, MongoRegistrationRepository, handlers};
use eyre::WrapErr;
use tracing::info;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let service = EventService::new(
        MongoEventRepository::new(&state.db),
        MongoRegistrationRepository::new(&state.db),
        state.notifier.clone(),
    );

    handlers::router(service)
}

pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoEventRepository::new(db)
        .init_indexes()
        .await
        .wrap_err("Failed to create event indexes")?;
    MongoRegistrationRepository::new(db)
        .init_indexes()
        .await
        .wrap_err("Failed to create registration indexes")?;
    info!("Event and registration indexes ready");
    Ok(())
}
