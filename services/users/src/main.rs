use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::database::{DatabaseConfig, health_check, init_pool};
use users::{
    hashing::PasswordHasher, repositories::PgUserStore, routes, service::UserService,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting user management service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Bootstrap the schema and wire up the service
    let store = PgUserStore::new(pool);
    store.ensure_schema().await?;

    let user_service = UserService::new(Arc::new(store), PasswordHasher::new());
    let app_state = AppState { user_service };

    info!("User management service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3002".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("User management service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
