use axum::Router;
use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_events::{EventService, FsImageStore, MongoEventRepository, events_router};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod config;
mod openapi;
mod readiness;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.url());

    // Connect before binding the listener: the service never accepts
    // traffic it cannot serve
    let mongo_client = database::mongodb::connect_from_config(&config.mongodb).await?;
    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    let repository = MongoEventRepository::new(&db);
    repository.create_indexes().await?;

    let images = FsImageStore::new(&config.upload_dir).await?;
    let service = Arc::new(EventService::new(repository, images));

    // Build router with API routes
    let api_routes = Router::new().nest("/v3/app/events", events_router().with_state(service));

    // Create a router with OpenAPI docs
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes);

    // Merge the readiness endpoint (pings MongoDB, unlike /health)
    let app = router.merge(readiness::ready_router(mongo_client.clone()));

    info!("Starting events API with production-ready shutdown (30s timeout)");

    // Production-ready server with graceful shutdown
    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing MongoDB connections");
        // MongoDB client closes automatically on drop
        drop(mongo_client);
        info!("MongoDB connection closed successfully");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Events API shutdown complete");
    Ok(())
}
