//! Macro-generated test suite for `DataService<TestRecord>` contract validation.
//!
//! The `data_service_tests!` macro generates a test module that validates any
//! `DataService<TestRecord>` implementation against the full contract:
//! CRUD operations, trash scopes, uniqueness, and concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use panel::storage::InMemoryDataService;
//!
//! data_service_tests!(InMemoryDataService::<TestRecord>::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_get`: create then retrieve, verify all fields
//! - `test_get_nonexistent`: get with random UUID returns None
//! - `test_list_in_insertion_order`: list returns rows oldest first
//! - `test_update_existing` / `test_update_nonexistent`
//!
//! ## Soft delete
//! - `test_soft_delete_hides_row`: trashed rows leave the default scope
//! - `test_soft_delete_many_reports_deleted`: only live ids are reported
//! - `test_restore`: restoring brings the row back
//!
//! ## Uniqueness
//! - `test_unique_field_rejected_on_create` / `test_unique_field_counts_trashed_rows`
//! - `test_exists_with_ignores_given_record`
//!
//! ## Edge Cases
//! - `test_concurrent_access`: parallel creates from spawned tasks

/// Generate a full `DataService<TestRecord>` conformance test suite.
///
/// `$factory` is re-evaluated for each test to ensure isolation. For the
/// concurrent access test, the returned service must also implement
/// `Clone + 'static` (shared state via Arc pattern).
macro_rules! data_service_tests {
    ($factory:expr) => {
        mod data_service_contract_tests {
            use super::*;
            use panel::core::entity::{Data, Entity};
            use panel::core::service::{DataService, TrashScope};
            use uuid::Uuid;

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let service = $factory;
                let record = create_test_record("Lamp", "SKU-LAMP");
                let original_id = record.id;

                let created = service.create(record).await.unwrap();
                assert_eq!(created.id(), original_id);
                assert_eq!(created.name(), "Lamp");

                let retrieved = service.get(&original_id).await.unwrap();
                assert!(retrieved.is_some(), "Record should exist after create");
                let retrieved = retrieved.unwrap();
                assert_eq!(retrieved.sku, "SKU-LAMP");
                assert_eq!(retrieved.stock, 10);
                assert!(retrieved.active);
                assert!(!retrieved.is_deleted());
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let service = $factory;

                let result = service.get(&Uuid::new_v4()).await.unwrap();
                assert!(result.is_none(), "Getting a nonexistent record should return None");
            }

            #[tokio::test]
            async fn test_list_in_insertion_order() {
                let service = $factory;
                let batch = sample_batch(5);
                for record in batch.clone() {
                    service.create(record).await.unwrap();
                }

                let all = service.list(TrashScope::WithoutTrashed).await.unwrap();
                assert_count(&all, 5);
                let ids: Vec<Uuid> = all.iter().map(|r| r.id()).collect();
                let expected: Vec<Uuid> = batch.iter().map(|r| r.id()).collect();
                assert_eq!(ids, expected);
            }

            #[tokio::test]
            async fn test_update_existing() {
                let service = $factory;
                let created = service
                    .create(create_test_record("Lamp", "SKU-LAMP"))
                    .await
                    .unwrap();

                let mut changed = created.clone();
                changed.name = "Floor Lamp".to_string();
                changed.stock = 3;
                service.update(&created.id, changed).await.unwrap();

                let stored = service.get(&created.id).await.unwrap().unwrap();
                assert_eq!(stored.name, "Floor Lamp");
                assert_eq!(stored.stock, 3);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let service = $factory;
                let record = create_test_record("Ghost", "SKU-GHOST");

                let result = service.update(&record.id.clone(), record).await;
                assert!(result.is_err(), "Updating an unknown record should fail");
            }

            #[tokio::test]
            async fn test_update_trashed_fails() {
                let service = $factory;
                let created = service
                    .create(create_test_record("Lamp", "SKU-LAMP"))
                    .await
                    .unwrap();
                service.soft_delete(&created.id).await.unwrap();

                assert!(service.update(&created.id, created.clone()).await.is_err());
            }

            // ==================================================================
            // Soft delete
            // ==================================================================

            #[tokio::test]
            async fn test_soft_delete_hides_row() {
                let service = $factory;
                let created = service
                    .create(create_test_record("Lamp", "SKU-LAMP"))
                    .await
                    .unwrap();

                assert!(service.soft_delete(&created.id).await.unwrap());
                assert!(!service.soft_delete(&created.id).await.unwrap());

                assert!(service.get(&created.id).await.unwrap().is_none());
                assert_count(&service.list(TrashScope::WithoutTrashed).await.unwrap(), 0);

                let trashed = service.list(TrashScope::OnlyTrashed).await.unwrap();
                assert_count(&trashed, 1);
                assert!(trashed[0].deleted_at().is_some());
                assert_count(&service.list(TrashScope::WithTrashed).await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_soft_delete_nonexistent() {
                let service = $factory;
                assert!(!service.soft_delete(&Uuid::new_v4()).await.unwrap());
            }

            #[tokio::test]
            async fn test_soft_delete_many_reports_deleted() {
                let service = $factory;
                let batch = sample_batch(4);
                for record in batch.clone() {
                    service.create(record).await.unwrap();
                }
                service.soft_delete(&batch[0].id).await.unwrap();

                let selection = vec![batch[0].id, batch[1].id, batch[2].id, Uuid::new_v4()];
                let deleted = service.soft_delete_many(&selection).await.unwrap();

                assert_eq!(deleted, vec![batch[1].id, batch[2].id]);
                let live = service.list(TrashScope::WithoutTrashed).await.unwrap();
                assert_count(&live, 1);
                assert_eq!(live[0].id, batch[3].id);
            }

            #[tokio::test]
            async fn test_restore() {
                let service = $factory;
                let created = service
                    .create(create_test_record("Lamp", "SKU-LAMP"))
                    .await
                    .unwrap();

                assert!(service.restore(&created.id).await.unwrap().is_none());

                service.soft_delete(&created.id).await.unwrap();
                let restored = service.restore(&created.id).await.unwrap();
                assert!(restored.is_some());
                assert!(service.get(&created.id).await.unwrap().is_some());
            }

            // ==================================================================
            // Uniqueness
            // ==================================================================

            #[tokio::test]
            async fn test_unique_field_rejected_on_create() {
                let service = $factory;
                service
                    .create(create_test_record("Lamp", "SKU-1"))
                    .await
                    .unwrap();

                let result = service.create(create_test_record("Other", "SKU-1")).await;
                assert!(result.is_err(), "A repeated sku must be rejected");
            }

            #[tokio::test]
            async fn test_unique_field_rejected_on_update() {
                let service = $factory;
                service
                    .create(create_test_record("Lamp", "SKU-1"))
                    .await
                    .unwrap();
                let second = service
                    .create(create_test_record("Desk", "SKU-2"))
                    .await
                    .unwrap();

                let mut changed = second.clone();
                changed.sku = "SKU-1".to_string();
                assert!(service.update(&second.id, changed).await.is_err());

                let mut same = second.clone();
                same.stock = 99;
                assert!(service.update(&second.id, same).await.is_ok());
            }

            #[tokio::test]
            async fn test_unique_field_counts_trashed_rows() {
                let service = $factory;
                let created = service
                    .create(create_test_record("Lamp", "SKU-1"))
                    .await
                    .unwrap();
                service.soft_delete(&created.id).await.unwrap();

                assert!(service.create(create_test_record("Lamp", "SKU-1")).await.is_err());
            }

            #[tokio::test]
            async fn test_exists_with_ignores_given_record() {
                let service = $factory;
                let created = service
                    .create(create_test_record("Lamp", "SKU-1"))
                    .await
                    .unwrap();

                assert!(service.exists_with("sku", "SKU-1", None).await.unwrap());
                assert!(
                    !service
                        .exists_with("sku", "SKU-1", Some(created.id))
                        .await
                        .unwrap()
                );
                assert!(!service.exists_with("sku", "SKU-2", None).await.unwrap());
                assert!(!service.exists_with("unknown", "SKU-1", None).await.unwrap());
            }

            // ==================================================================
            // Edge Cases
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_access() {
                let service = std::sync::Arc::new($factory);
                let mut handles = Vec::new();

                for record in sample_batch(10) {
                    let service = service.clone();
                    handles.push(tokio::spawn(async move { service.create(record).await }));
                }
                for handle in handles {
                    handle.await.unwrap().unwrap();
                }

                let all = service.list(TrashScope::WithTrashed).await.unwrap();
                assert_count(&all, 10);
            }
        }
    };
}
