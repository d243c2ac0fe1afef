//! Macro-generated test suite for `PivotService` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! pivot_service_tests!(InMemoryPivotService::new());
//! ```

/// Generate a `PivotService` conformance test suite.
///
/// `$factory` is re-evaluated for each test to ensure isolation.
macro_rules! pivot_service_tests {
    ($factory:expr) => {
        mod pivot_service_contract_tests {
            use super::*;
            use panel::core::service::PivotService;
            use uuid::Uuid;

            const RELATION: &str = "record_tag";

            #[tokio::test]
            async fn test_attach_and_list() {
                let service = $factory;
                let source = Uuid::new_v4();
                let first = Uuid::new_v4();
                let second = Uuid::new_v4();

                let pivot = service.attach(RELATION, source, first).await.unwrap();
                assert_eq!(pivot.relation, RELATION);
                assert_eq!(pivot.source_id, source);
                assert_eq!(pivot.target_id, first);
                service.attach(RELATION, source, second).await.unwrap();

                let related = service.related_ids(RELATION, &source).await.unwrap();
                assert_eq!(related, vec![first, second]);
            }

            #[tokio::test]
            async fn test_attach_twice_is_idempotent() {
                let service = $factory;
                let source = Uuid::new_v4();
                let target = Uuid::new_v4();

                let a = service.attach(RELATION, source, target).await.unwrap();
                let b = service.attach(RELATION, source, target).await.unwrap();

                assert_eq!(a.id, b.id);
                assert_count(&service.related_ids(RELATION, &source).await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_relations_are_isolated() {
                let service = $factory;
                let source = Uuid::new_v4();
                service
                    .attach(RELATION, source, Uuid::new_v4())
                    .await
                    .unwrap();
                service
                    .attach("record_label", source, Uuid::new_v4())
                    .await
                    .unwrap();

                assert_count(&service.related_ids(RELATION, &source).await.unwrap(), 1);
                assert_count(
                    &service.related_ids(RELATION, &Uuid::new_v4()).await.unwrap(),
                    0,
                );
            }

            #[tokio::test]
            async fn test_detach() {
                let service = $factory;
                let source = Uuid::new_v4();
                let target = Uuid::new_v4();
                service.attach(RELATION, source, target).await.unwrap();

                assert!(service.detach(RELATION, source, target).await.unwrap());
                assert!(!service.detach(RELATION, source, target).await.unwrap());
                assert_count(&service.related_ids(RELATION, &source).await.unwrap(), 0);
            }
        }
    };
}
