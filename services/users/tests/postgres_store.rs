//! PostgreSQL store integration test
//!
//! Requires a running PostgreSQL instance reachable through
//! `DATABASE_URL`; run with `cargo test -- --ignored`.

use std::time::{SystemTime, UNIX_EPOCH};

use common::database::{DatabaseConfig, init_pool};
use users::models::NewUser;
use users::repositories::{PgUserStore, UserStore};

#[tokio::test]
#[ignore]
async fn postgres_store_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    let pool = init_pool(&config).await?;

    let store = PgUserStore::new(pool);
    store.ensure_schema().await?;

    // Unique email per run so reruns do not collide
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
    let email = format!("round-trip-{nanos}@example.com");

    let created = store
        .insert(NewUser {
            name: Some("Round Trip".to_string()),
            email: email.clone(),
            password_hash: "digest".to_string(),
        })
        .await?;
    assert!(created.id > 0);

    assert!(store.email_exists(&email, None).await?);
    assert!(!store.email_exists(&email, Some(created.id)).await?);

    let fetched = store.find_by_id(created.id).await?;
    assert_eq!(fetched.as_ref().map(|u| u.email.as_str()), Some(email.as_str()));

    assert!(store.delete(created.id).await?);
    assert_eq!(store.find_by_id(created.id).await?, None);

    Ok(())
}
