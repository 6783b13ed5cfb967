use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use access_control::TokenKeys;
use auth_service::store::{PgUserStore, SharedUserStore};
use auth_service::{AppState, Settings};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env().context("Failed to load configuration")?;

    tracing::info!(
        "Starting auth service on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .acquire_timeout(Duration::from_secs(settings.database.acquire_timeout))
        .connect(&settings.database.url)
        .await
        .context("Failed to connect to Postgres")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!("Database connection pool initialized");

    let store: SharedUserStore = Arc::new(PgUserStore::new(pool));
    let tokens = Arc::new(TokenKeys::new(
        &settings.jwt.secret,
        settings.jwt.ttl_seconds,
    ));
    let state = AppState::new(store, tokens, settings.auth.clone());

    let bind_addr = (settings.server.host.clone(), settings.server.port);

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .configure(|cfg| auth_service::routes::configure(cfg, &state))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
