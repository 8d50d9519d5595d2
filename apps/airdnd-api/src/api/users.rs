use axum::Router;
use domain_users::{MongoUserRepository, UserService, handlers};
use eyre::WrapErr;
use tracing::info;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    handlers::router(UserService::new(MongoUserRepository::new(&state.db)))
}

/// The unique email index is what turns duplicate sign-ups into 409s.
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoUserRepository::new(db)
        .init_indexes()
        .await
        .wrap_err("Failed to create user indexes")?;
    info!("User indexes ready");
    Ok(())
}
