//! Stall management tests against the in-memory document store

use campus_core::domain::{CreateStallInput, UpdateStallInput};
use campus_core::error::AppError;

mod common;

fn input(name: &str, email: &str) -> CreateStallInput {
    CreateStallInput {
        name: name.to_string(),
        email: email.to_string(),
    }
}

#[tokio::test]
async fn test_stall_lifecycle() {
    let (_, stalls) = common::memory_services();

    let created = stalls
        .create(input("Dosa Corner", "owner@dosa.in"), "admin-1")
        .await
        .unwrap();
    assert!(!created.is_verified);

    let updated = stalls
        .update(
            &created.id,
            UpdateStallInput {
                name: "Dosa Palace".to_string(),
                email: "palace@dosa.in".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Dosa Palace");
    assert_eq!(updated.email, "palace@dosa.in");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let verified = stalls
        .toggle_verification(&created.id, updated.is_verified)
        .await
        .unwrap();
    assert!(verified.is_verified);

    let unverified = stalls
        .toggle_verification(&created.id, verified.is_verified)
        .await
        .unwrap();
    assert!(!unverified.is_verified);

    stalls.delete(&created.id).await.unwrap();
    assert!(matches!(
        stalls.get(&created.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        stalls.delete(&created.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let (_, stalls) = common::memory_services();

    let first = stalls
        .create(input("First", "first@stalls.in"), "admin")
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = stalls
        .create(input("Second", "second@stalls.in"), "admin")
        .await
        .unwrap();

    let listed = stalls.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

#[tokio::test]
async fn test_invalid_stall_is_not_stored() {
    let (_, stalls) = common::memory_services();

    assert!(matches!(
        stalls.create(input("", "owner@dosa.in"), "admin").await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        stalls.create(input("Dosa", "owner.dosa.in"), "admin").await,
        Err(AppError::Validation(_))
    ));
    assert!(stalls.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_operations_on_missing_stall() {
    let (_, stalls) = common::memory_services();

    assert!(matches!(
        stalls.toggle_verification("missing", false).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        stalls
            .update(
                "missing",
                UpdateStallInput {
                    name: "Dosa".to_string(),
                    email: "owner@dosa.in".to_string(),
                },
            )
            .await,
        Err(AppError::NotFound(_))
    ));
}
