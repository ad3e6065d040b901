//! Shared application state

use crate::{
    auth::CredentialVerifier,
    config::{Config, StoreBackend},
    db::{DocumentStore, InMemoryDocumentStore, PostgresDocumentStore},
    notify::{HttpNotificationRelay, NotificationRelay},
    services::{
        CascadeService, Dispatcher, OperationHandlers, OperationRegistry, ProfileService,
        SurveyService,
    },
    Result,
};
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DocumentStore>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Initialize the application state: open the configured store and wire
    /// every service to it.
    pub async fn new(config: Config) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let store: Arc<dyn DocumentStore> = match config.store.backend {
            StoreBackend::Memory => {
                tracing::warn!("Using the in-memory store; data is lost on restart");
                Arc::new(InMemoryDocumentStore::new())
            }
            StoreBackend::Postgres => {
                let pool = create_db_pool(&config).await?;
                if config.store.run_migrations {
                    tracing::info!("Running database migrations...");
                    sqlx::migrate!("./migrations").run(&pool).await?;
                }
                Arc::new(PostgresDocumentStore::new(pool))
            }
        };

        let relay: Arc<dyn NotificationRelay> =
            Arc::new(HttpNotificationRelay::new(&config.notification)?);

        Ok(Self::with_components(config, store, relay))
    }

    /// Build the state around an existing store and relay (tests inject fakes here).
    pub fn with_components(
        config: Config,
        store: Arc<dyn DocumentStore>,
        relay: Arc<dyn NotificationRelay>,
    ) -> Self {
        let config = Arc::new(config);

        let profiles = Arc::new(ProfileService::new(
            store.clone(),
            config.profile.default_avatar_url.clone(),
        ));
        let surveys = Arc::new(SurveyService::new(store.clone()));
        let cascade = Arc::new(CascadeService::new(store.clone()));

        let handlers = Arc::new(OperationHandlers::new(
            CredentialVerifier::new(&config.auth),
            profiles,
            surveys,
            cascade,
            relay,
            config.notification.clone(),
        ));
        let registry = Arc::new(OperationRegistry::standard(handlers));

        tracing::info!(
            store = store.backend_name(),
            operations = registry.len(),
            "Application state ready"
        );

        Self {
            config,
            store,
            dispatcher: Arc::new(Dispatcher::new(registry)),
        }
    }
}

async fn create_db_pool(config: &Config) -> Result<PgPool> {
    tracing::info!("Creating database connection pool...");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .min_connections(config.store.pool_min_size)
        .max_connections(config.store.pool_max_size)
        .acquire_timeout(std::time::Duration::from_secs(
            config.store.pool_timeout_seconds,
        ))
        .connect(&config.store.url)
        .await?;

    tracing::info!(
        "Database pool created (min: {}, max: {})",
        config.store.pool_min_size,
        config.store.pool_max_size
    );

    Ok(pool)
}
