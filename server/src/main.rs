use roster_server::config::{Config, StoreKind};
use roster_server::db::{self, MemoryUserStore, PgUserStore, UserStore};
use roster_server::{build_router, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Roster Server on {}:{}", config.host, config.port);

    let store: Arc<dyn UserStore> = match (config.store, config.database_url.as_deref()) {
        (StoreKind::Postgres, Some(url)) => {
            let store = PgUserStore::connect(url).await?;
            tracing::info!("Running database migrations...");
            store.migrate().await?;
            Arc::new(store)
        }
        // Config::from_env rejects postgres without a URL
        (StoreKind::Postgres, None) => return Err("DATABASE_URL is required".into()),
        (StoreKind::Memory, _) => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryUserStore::new())
        }
    };

    if config.seed_demo_users {
        let inserted = db::seed_demo_users(store.as_ref()).await?;
        tracing::info!("Seeded {} demo users", inserted);
    }

    let app = build_router(AppState::new(store), config.request_timeout);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
