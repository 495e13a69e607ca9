//! Behavioral tests for the user service, run against the in-memory store

use std::sync::Arc;

use users::hashing::PasswordHasher;
use users::models::UserWrite;
use users::repositories::{InMemoryUserStore, UserStore};
use users::service::{UserError, UserService};

fn service_with_store() -> (UserService, Arc<InMemoryUserStore>) {
    let store = Arc::new(InMemoryUserStore::new());
    let service = UserService::new(store.clone(), PasswordHasher::new());
    (service, store)
}

fn write(id: i64, name: &str, email: &str, password: Option<&str>) -> UserWrite {
    UserWrite {
        id,
        name: name.to_string(),
        email: email.to_string(),
        password: password.map(str::to_string),
    }
}

#[tokio::test]
async fn create_returns_fresh_id_and_reads_back() -> Result<(), UserError> {
    let (service, _store) = service_with_store();

    let ada = service
        .add_or_edit_user(write(0, "Ada", "ada@example.com", Some("Secret#123")))
        .await?;
    let grace = service
        .add_or_edit_user(write(0, "Grace", "grace@example.com", Some("Secret#123")))
        .await?;

    assert!(ada.id > 0);
    assert!(grace.id > ada.id);

    let fetched = service.get_user_by_id(ada.id).await?;
    assert_eq!(fetched, Some(ada));

    Ok(())
}

#[tokio::test]
async fn read_model_carries_no_digest() -> Result<(), UserError> {
    let (service, _store) = service_with_store();

    let ada = service
        .add_or_edit_user(write(0, "Ada", "ada@example.com", Some("Secret#123")))
        .await?;

    let json = serde_json::to_value(&ada).expect("serializing UserRead");
    let object = json.as_object().expect("UserRead serializes to an object");
    assert!(!object.contains_key("password"));
    assert!(!object.contains_key("password_hash"));
    assert_eq!(object.len(), 3);

    Ok(())
}

#[tokio::test]
async fn creating_a_duplicate_email_is_rejected() -> Result<(), UserError> {
    let (service, _store) = service_with_store();

    service
        .add_or_edit_user(write(0, "Ada", "ada@example.com", Some("Secret#123")))
        .await?;

    let second = service
        .add_or_edit_user(write(0, "Impostor", "ada@example.com", Some("Other#456")))
        .await;
    assert!(matches!(second, Err(UserError::DuplicateEmail)));

    Ok(())
}

#[tokio::test]
async fn updating_to_another_users_email_is_rejected() -> Result<(), UserError> {
    let (service, _store) = service_with_store();

    let ada = service
        .add_or_edit_user(write(0, "Ada", "ada@example.com", Some("Secret#123")))
        .await?;
    service
        .add_or_edit_user(write(0, "Grace", "grace@example.com", Some("Secret#123")))
        .await?;

    let clash = service
        .add_or_edit_user(write(ada.id, "Ada", "grace@example.com", None))
        .await;
    assert!(matches!(clash, Err(UserError::DuplicateEmail)));

    // Keeping its own email is not a conflict
    let same = service
        .add_or_edit_user(write(ada.id, "Ada L.", "ada@example.com", None))
        .await?;
    assert_eq!(same.id, ada.id);
    assert_eq!(same.name.as_deref(), Some("Ada L."));

    Ok(())
}

#[tokio::test]
async fn blank_password_on_update_preserves_the_digest() -> Result<(), UserError> {
    let (service, store) = service_with_store();
    let hasher = PasswordHasher::new();

    let ada = service
        .add_or_edit_user(write(0, "Ada", "ada@example.com", Some("Secret#123")))
        .await?;

    let original = store
        .find_by_id(ada.id)
        .await
        .expect("store lookup")
        .expect("row exists")
        .password_hash;
    assert_eq!(original, hasher.hash("Secret#123"));

    // Absent and blank passwords both leave the digest alone
    service
        .add_or_edit_user(write(ada.id, "Ada", "ada@example.com", None))
        .await?;
    service
        .add_or_edit_user(write(ada.id, "Ada", "ada@example.com", Some("   ")))
        .await?;

    let unchanged = store
        .find_by_id(ada.id)
        .await
        .expect("store lookup")
        .expect("row exists")
        .password_hash;
    assert_eq!(unchanged, original);

    // A real password re-hashes
    service
        .add_or_edit_user(write(ada.id, "Ada", "ada@example.com", Some("Another#456")))
        .await?;

    let rehashed = store
        .find_by_id(ada.id)
        .await
        .expect("store lookup")
        .expect("row exists")
        .password_hash;
    assert_eq!(rehashed, hasher.hash("Another#456"));
    assert_ne!(rehashed, original);

    Ok(())
}

#[tokio::test]
async fn stale_positive_id_falls_back_to_create() -> Result<(), UserError> {
    let (service, _store) = service_with_store();

    let created = service
        .add_or_edit_user(write(999, "Ada", "ada@example.com", Some("Secret#123")))
        .await?;

    assert_ne!(created.id, 999);
    assert!(created.id > 0);

    Ok(())
}

#[tokio::test]
async fn delete_reports_whether_a_row_was_removed() -> Result<(), UserError> {
    let (service, _store) = service_with_store();

    assert!(!service.delete_user(42).await?);

    let ada = service
        .add_or_edit_user(write(0, "Ada", "ada@example.com", Some("Secret#123")))
        .await?;

    assert!(service.delete_user(ada.id).await?);
    assert_eq!(service.get_user_by_id(ada.id).await?, None);
    assert!(!service.delete_user(ada.id).await?);

    Ok(())
}

#[tokio::test]
async fn paged_listing_orders_clamps_and_counts() -> Result<(), UserError> {
    let (service, _store) = service_with_store();

    let mut ids = Vec::new();
    for i in 1..=5 {
        let user = service
            .add_or_edit_user(write(
                0,
                &format!("User {i}"),
                &format!("user{i}@example.com"),
                Some("Secret#123"),
            ))
            .await?;
        ids.push(user.id);
    }

    let first = service.get_all_users(Some(1), Some(2)).await?;
    assert_eq!(first.total_count, 5);
    assert_eq!(first.page_number, 1);
    assert_eq!(first.page_size, 2);
    let first_ids: Vec<i64> = first.items.iter().map(|u| u.id).collect();
    assert_eq!(first_ids, ids[..2]);

    let last = service.get_all_users(Some(3), Some(2)).await?;
    assert_eq!(last.total_count, 5);
    let last_ids: Vec<i64> = last.items.iter().map(|u| u.id).collect();
    assert_eq!(last_ids, ids[4..]);

    let beyond = service.get_all_users(Some(10), Some(2)).await?;
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_count, 5);

    // Non-positive inputs fall back to page 1 / size 10
    let clamped = service.get_all_users(Some(0), Some(0)).await?;
    assert_eq!(clamped.page_number, 1);
    assert_eq!(clamped.page_size, 10);
    assert_eq!(clamped.items.len(), 5);

    let defaulted = service.get_all_users(None, None).await?;
    assert_eq!(defaulted.page_number, 1);
    assert_eq!(defaulted.page_size, 10);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_with_one_email_have_one_winner() {
    let (service, _store) = service_with_store();

    // Line the tasks up so the creates overlap instead of running
    // back to back on a single thread
    let barrier = Arc::new(tokio::sync::Barrier::new(8));

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            service
                .add_or_edit_user(write(
                    0,
                    &format!("Racer {i}"),
                    "race@example.com",
                    Some("Secret#123"),
                ))
                .await
        }));
    }

    let mut created = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => created += 1,
            Err(UserError::DuplicateEmail) => rejected += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(rejected, 7);
}
