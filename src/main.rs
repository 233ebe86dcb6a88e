use std::net::TcpListener;
use std::sync::Arc;

use authlane::auth::AuthService;
use authlane::cache::RedisTokenCache;
use authlane::configuration::get_configuration;
use authlane::startup::run;
use authlane::store::PgCredentialStore;
use authlane::telemetry::init_telemetry;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = init_telemetry() {
        eprintln!("Failed to initialise logging: {}", e);
    }

    tracing::info!("Starting application");

    let configuration = match get_configuration().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(configuration.auth.request_timeout())
        .connect_lazy(&configuration.database.connection_string())
        .map_err(|e| {
            tracing::error!("Failed to create connection pool: {}", e);
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "Database configuration error")
        })?;

    let cache = RedisTokenCache::new(&configuration.redis).map_err(|e| {
        tracing::error!("Failed to create cache pool: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Cache configuration error")
    })?;

    let auth = AuthService::new(
        &configuration.jwt,
        &configuration.auth,
        Arc::new(PgCredentialStore::new(pool)),
        Arc::new(cache),
    );

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    run(listener, auth)?.await
}
