use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::info;

use cs_api::telemetry::init_tracing;
use cs_api::{create_app, AppState};
use cs_core::{NotificationChannel, VerificationService};
use cs_infra::create_notification_channel;
use cs_shared::{AppConfig, Environment};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Environment-specific file first; dotenvy never overrides a set variable
    dotenvy::from_filename(Environment::from_env().env_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    init_tracing(&config.logging)?;

    info!(
        environment = %config.environment,
        sms_provider = ?config.notification.sms_provider,
        email_provider = ?config.notification.email_provider,
        "Starting ChangeSentinel API server"
    );

    let router = create_notification_channel(&config.notification, &config.verification)
        .context("Failed to configure notification providers")?;
    let notifier: Arc<dyn NotificationChannel> = Arc::new(router);
    let service = Arc::new(VerificationService::new(
        notifier,
        (&config.verification).into(),
    ));
    let sweeper = service.start_sweeper();

    let state = web::Data::new(AppState::new(service));
    let environment = config.environment;
    let server_config = config.server.clone();
    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Server will bind");

    let mut server =
        HttpServer::new(move || create_app(state.clone(), environment, &server_config));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    sweeper.shutdown().await;
    info!("Server stopped");
    Ok(())
}
