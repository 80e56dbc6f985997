//! Macro-generated test suite for `DataService<Posting>` contract validation.
//!
//! The `data_service_tests!` macro generates a test module that validates
//! any `DataService<Posting>` implementation against the full contract:
//! CRUD operations, ordering, search across `FieldValue` variants, edge
//! cases, and concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use jobboard::storage::RecordStore;
//!
//! data_service_tests!(RecordStore::<Posting>::new());
//! ```

/// Generate a full `DataService<Posting>` conformance test suite.
///
/// `$factory` is re-evaluated for each test to ensure isolation. For the
/// concurrent access test, the returned service must also implement
/// `Clone + 'static` (shared state via Arc pattern).
macro_rules! data_service_tests {
    ($factory:expr) => {
        mod data_service_contract_tests {
            use super::*;
            use jobboard::core::{DataService, Record};

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let service = $factory;
                let posting = create_full_posting("p1", "Engineer", "Austin", 3, 4.5, true);

                let created = service.create(posting.clone()).await.unwrap();
                assert_eq!(created, posting);

                let retrieved = service.get("p1").await.unwrap();
                assert_eq!(retrieved, Some(posting));
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let service = $factory;
                assert!(service.get("missing").await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_list_empty() {
                let service = $factory;
                let all = service.list().await.unwrap();
                assert!(all.is_empty(), "List on empty store should return empty vec");
            }

            #[tokio::test]
            async fn test_list_keeps_insertion_order() {
                let service = $factory;
                let batch = sample_batch(5);
                for posting in batch.clone() {
                    service.create(posting).await.unwrap();
                }

                let all = service.list().await.unwrap();
                assert_eq!(ids(&all), ids(&batch));
            }

            #[tokio::test]
            async fn test_update_existing() {
                let service = $factory;
                let mut posting = create_posting("p1", "Engineer", Some("Austin"));
                service.create(posting.clone()).await.unwrap();
                service
                    .create(create_posting("p2", "Designer", None))
                    .await
                    .unwrap();

                posting.title = "Senior Engineer".to_string();
                posting.applicants = 9;
                let updated = service.update("p1", posting).await.unwrap();
                assert_eq!(updated.title, "Senior Engineer");

                let all = service.list().await.unwrap();
                assert_eq!(ids(&all), vec!["p1", "p2"], "update must not move the record");
                assert_eq!(all[0].applicants, 9);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let service = $factory;
                let result = service
                    .update("ghost", create_posting("ghost", "Ghost", None))
                    .await;
                assert!(result.is_err(), "Updating a nonexistent record should fail");
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let service = $factory;
                service
                    .create(create_posting("p1", "Engineer", None))
                    .await
                    .unwrap();

                let removed = service.delete("p1").await.unwrap();
                assert_eq!(removed.map(|p| p.id), Some("p1".to_string()));
                assert!(service.get("p1").await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let service = $factory;
                assert!(service.delete("missing").await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_create_duplicate_id() {
                let service = $factory;
                service
                    .create(create_posting("p1", "First", None))
                    .await
                    .unwrap();

                let result = service.create(create_posting("p1", "Second", None)).await;
                assert!(result.is_err());
                assert_eq!(service.get("p1").await.unwrap().unwrap().title, "First");
            }

            // ==================================================================
            // Search
            // ==================================================================

            async fn seeded() -> impl DataService<Posting> {
                let service = $factory;
                service
                    .create(create_full_posting("p1", "Engineer", "Austin", 25, 4.0, true))
                    .await
                    .unwrap();
                service
                    .create(create_full_posting("p2", "Designer", "Paris", 30, 9.5, false))
                    .await
                    .unwrap();
                service
                    .create(create_full_posting("p3", "Analyst", "austin", 25, 1.0, false))
                    .await
                    .unwrap();
                service
            }

            #[tokio::test]
            async fn test_search_string_field_case_insensitive() {
                let service = seeded().await;
                let results = service.search("location", "AUSTIN").await.unwrap();
                assert_eq!(ids(&results), vec!["p1", "p3"]);
            }

            #[tokio::test]
            async fn test_search_integer_field() {
                let service = seeded().await;
                let results = service.search("applicants", "25").await.unwrap();
                assert_count(&results, 2);
            }

            #[tokio::test]
            async fn test_search_float_field() {
                let service = seeded().await;
                let results = service.search("salary", "9.5").await.unwrap();
                assert_eq!(ids(&results), vec!["p2"]);
            }

            #[tokio::test]
            async fn test_search_boolean_field() {
                let service = seeded().await;
                let results = service.search("remote", "true").await.unwrap();
                assert_eq!(ids(&results), vec!["p1"]);
            }

            #[tokio::test]
            async fn test_search_no_results() {
                let service = seeded().await;
                assert!(service.search("title", "Pilot").await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_search_unknown_field() {
                let service = seeded().await;
                assert!(service.search("nope", "Engineer").await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_field_values_exposed() {
                let service = seeded().await;
                let posting = service.get("p2").await.unwrap().unwrap();
                assert_field_value_string(&posting.field_value("title").unwrap(), "Designer");
                assert!(posting.field_value("nope").is_none());
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_access() {
                let service = $factory;
                let mut handles = Vec::new();

                for posting in sample_batch(20) {
                    let service = service.clone();
                    handles.push(tokio::spawn(async move {
                        service.create(posting).await.unwrap();
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }

                assert_count(&service.list().await.unwrap(), 20);
            }
        }
    };
}
