use axum_helpers::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use email::{EmailProvider, JoinNotifier, MockSmtpProvider, SmtpProvider, TemplateEngine};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, EmailConfig};
use state::AppState;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

fn build_notifier(config: &EmailConfig) -> eyre::Result<JoinNotifier> {
    let provider: Arc<dyn EmailProvider> = match config {
        EmailConfig::Smtp(smtp) => Arc::new(SmtpProvider::new(smtp.clone())?),
        EmailConfig::Mock => {
            warn!("EMAIL_PROVIDER=mock, join confirmations are captured in memory");
            Arc::new(MockSmtpProvider::new())
        }
    };

    Ok(JoinNotifier::new(provider, Arc::new(TemplateEngine::new()?)))
}

/// Ends every pooled connection once the server has stopped serving.
/// Returns `false` if the driver did not finish within `timeout`.
async fn close_mongo(client: mongodb::Client, timeout: Duration) -> bool {
    info!("Closing MongoDB connections");
    match tokio::time::timeout(timeout, client.shutdown()).await {
        Ok(()) => {
            info!("MongoDB connections closed");
            true
        }
        Err(_) => {
            warn!(?timeout, "MongoDB shutdown timed out");
            false
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());
    info!(database = config.mongodb.database(), "Connected to MongoDB");

    api::init_indexes(&db).await?;

    let notifier = build_notifier(&config.email)?;
    if let Err(e) = notifier.health_check().await {
        warn!(
            provider = notifier.provider_name(),
            error = %e,
            "Mail provider unreachable at startup"
        );
    }

    let state = AppState {
        config,
        mongo_client,
        db,
        notifier,
    };

    let api_routes = api::routes(&state);
    let router =
        create_router::<openapi::ApiDoc>(api_routes, state.config.server.request_timeout()).await?;
    let app = router.merge(health_router(state.config.app));

    info!(
        name = state.config.app.name,
        version = state.config.app.version,
        "Starting AirDND API"
    );

    let server = state.config.server.clone();
    let mongo_client = state.mongo_client.clone();
    create_production_app(app, &server, SHUTDOWN_TIMEOUT, async move {
        drop(state);
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    close_mongo(mongo_client, SHUTDOWN_TIMEOUT).await;
    info!("AirDND API shutdown complete");
    Ok(())
}
