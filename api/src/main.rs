use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sh_api::{create_app, AppState};
use sh_core::services::{
    AuthService, AuthServiceConfig, ProductService, StoreService, TokenService,
    TokenServiceConfig, UserService,
};
use sh_infra::database::{
    DatabasePool, MySqlActivityRepository, MySqlProductRepository, MySqlRatingRepository,
    MySqlStoreRepository, MySqlUserRepository,
};
use sh_infra::{BcryptPasswordHasher, LocalImageStorage, NominatimGeocoder, SmtpEmailSender};
use sh_shared::config::{AppConfig, LogFormat, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);
    config
        .validate()
        .map_err(|message| anyhow::anyhow!(message))
        .context("Invalid configuration")?;

    tracing::info!(environment = %config.environment, "Starting SaleHunter API server");

    let pool = DatabasePool::connect(&config.database)
        .await
        .context("Failed to connect to the database")?;
    pool.run_migrations()
        .await
        .context("Failed to run database migrations")?;
    let db = pool.get_pool().clone();

    let user_repo = Arc::new(MySqlUserRepository::new(db.clone()));
    let store_repo = Arc::new(MySqlStoreRepository::new(db.clone()));
    let product_repo = Arc::new(MySqlProductRepository::new(db.clone()));
    let rating_repo = Arc::new(MySqlRatingRepository::new(db.clone()));
    let activity_repo = Arc::new(MySqlActivityRepository::new(db));

    let password_hasher = Arc::new(BcryptPasswordHasher::default());
    let image_storage = Arc::new(LocalImageStorage::new(&config.storage));
    let geocoder =
        Arc::new(NominatimGeocoder::new(&config.geocoding).context("Failed to build geocoder")?);
    let email_sender =
        Arc::new(SmtpEmailSender::new(&config.email).context("Failed to build SMTP transport")?);

    let token_service = Arc::new(TokenService::new(TokenServiceConfig::from(&config.jwt)));

    let state = web::Data::new(AppState {
        auth_service: Arc::new(AuthService::new(
            user_repo.clone(),
            password_hasher,
            token_service.clone(),
            email_sender,
            AuthServiceConfig::from(&config.app),
        )),
        store_service: Arc::new(StoreService::new(
            store_repo.clone(),
            product_repo.clone(),
            image_storage.clone(),
            geocoder,
        )),
        product_service: Arc::new(ProductService::new(
            product_repo,
            store_repo,
            rating_repo,
            activity_repo,
            image_storage.clone(),
        )),
        user_service: Arc::new(UserService::new(user_repo, image_storage)),
        token_service,
    });

    let bind_address = config.server.bind_address();
    let max_payload_size = config.server.max_payload_size;
    tracing::info!(%bind_address, "Server will bind");

    let mut server = HttpServer::new(move || create_app(state.clone(), max_payload_size));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).init(),
    }
}
