//! Cardio Assist
//!
//! Main entry point for the heart-attack risk prediction service.

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use cardio_assist::{api, config, RiskModel};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = config::load_config().context("failed to load configuration")?;

    // Load the classifier artifact; a missing or corrupt artifact prevents
    // the service from starting at all.
    let model = RiskModel::load(&config.model.path)
        .with_context(|| format!("failed to load model artifact from {}", config.model.path.display()))?;
    tracing::info!(path = %config.model.path.display(), "classifier artifact loaded");

    // Create app state
    let app_state = web::Data::new(api::AppState { model });

    tracing::info!("listening on {}:{}", config.server.host, config.server.port);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            // Add app state
            .app_data(app_state.clone())
            // Request logging
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            // Routes
            .configure(api::configure)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
