// src/services/batch_service_tests.rs
//
// Batch Service tests
//
// Store-backed tests run against an in-memory SQLite pool; failure paths
// (store outages, lost insert races) use a mocked repository.

#[cfg(test)]
mod window_tests {
    use crate::services::batch_service::tests_support::*;
    use crate::domain::BatchOption;
    use crate::error::AppError;

    #[test]
    fn test_window_has_exact_count_in_ascending_order() {
        let (service, _bus) = sqlite_service();

        let options = service.generate_options(2025, 5, date(2025, 10, 1)).unwrap();

        assert_eq!(options.len(), 5);
        let years: Vec<i32> = options.iter().map(|o| o.batch().start_year()).collect();
        assert_eq!(years, vec![2023, 2024, 2025, 2026, 2027]);
        let ids: Vec<&str> = options.iter().map(|o| o.batch().id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4", "5", "6", "7"]);
        assert!(options.iter().all(|o| !o.is_persisted()));
    }

    #[test]
    fn test_zero_count_is_empty() {
        let (service, _bus) = sqlite_service();
        assert!(service.generate_options(2025, 0, date(2025, 10, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_candidates_use_calendar_conventions() {
        let (service, _bus) = sqlite_service();

        let options = service.generate_options(2025, 1, date(2025, 10, 1)).unwrap();
        let batch = options[0].batch();

        assert_eq!(batch.start_date.to_rfc3339(), "2023-09-01T00:00:00+00:00");
        assert_eq!(batch.end_date.to_rfc3339(), "2026-06-30T00:00:00+00:00");
        assert!(batch.active);
        assert!(batch.notes.is_empty());
    }

    #[test]
    fn test_candidate_labels_carry_current_grade() {
        let (service, _bus) = sqlite_service();

        // March 2026 belongs to school year 2025
        let options = service.generate_options(2025, 5, date(2026, 3, 10)).unwrap();
        let names: Vec<&str> = options.iter().map(|o| o.batch().display_name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "Batch 2023-2026 (Grade 12)",
                "Batch 2024-2027 (Grade 11)",
                "Batch 2025-2028 (Grade 10)",
                "Batch 2026-2029",
                "Batch 2027-2030",
            ]
        );
    }

    #[test]
    fn test_grade_thirteen_gets_no_annotation() {
        let (service, _bus) = sqlite_service();

        // school year 2025, intake 2022 -> three years in -> graduated
        let options = service.generate_options(2024, 1, date(2025, 11, 2)).unwrap();
        assert_eq!(options[0].batch().display_name, "Batch 2022-2025");
    }

    #[test]
    fn test_stored_batch_is_returned_unchanged() {
        let (service, _bus) = sqlite_service();
        let stored = service
            .create_if_absent(named_request_for_years(2024, "Evening cohort"), date(2024, 9, 1))
            .unwrap()
            .0;

        let options = service.generate_options(2025, 5, date(2025, 10, 1)).unwrap();

        assert_eq!(options.len(), 5);
        // intake 2024 sits at index 2024 - (2025 - 2)
        match &options[1] {
            BatchOption::Persisted(batch) => assert_eq!(batch, &stored),
            other => panic!("expected persisted batch, got {:?}", other),
        }
        assert_eq!(options.iter().filter(|o| o.is_persisted()).count(), 1);
    }

    #[test]
    fn test_stored_batches_outside_window_are_ignored() {
        let (service, _bus) = sqlite_service();
        service
            .create_if_absent(request_for_years(2021), date(2021, 9, 1))
            .unwrap();

        let options = service.generate_options(2025, 3, date(2025, 10, 1)).unwrap();
        assert!(options.iter().all(|o| !o.is_persisted()));
    }

    #[test]
    fn test_oversized_count_is_invalid_input() {
        let (service, _bus) = sqlite_service();

        let result = service.generate_options(2026, usize::MAX, date(2026, 3, 10));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_window_before_minimum_year_is_invalid_input() {
        let (service, _bus) = sqlite_service();

        let result = service.generate_options(i32::MIN, 1, date(2026, 3, 10));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_pre_epoch_candidates_are_described() {
        let (service, _bus) = sqlite_service();

        let options = service.generate_options(2020, 2, date(2020, 10, 1)).unwrap();
        let ids: Vec<&str> = options.iter().map(|o| o.batch().id.as_str()).collect();
        assert_eq!(ids, vec!["-2", "-1"]);
    }
}

#[cfg(test)]
mod creation_tests {
    use crate::services::batch_service::tests_support::*;
    use crate::services::{BatchIdentity, CreateBatchRequest};
    use crate::error::AppError;
    use crate::events::BatchCreated;
    use chrono::{Datelike, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_create_is_idempotent() {
        let (service, _bus) = sqlite_service();
        let today = date(2025, 10, 1);
        let request = || {
            CreateBatchRequest::new(BatchIdentity::ByYears {
                start_year: 2025,
                end_year: Some(2028),
            })
        };

        let (first, created_first) = service.create_if_absent(request(), today).unwrap();
        let (second, created_second) = service.create_if_absent(request(), today).unwrap();

        assert!(created_first);
        assert!(!created_second);
        assert_eq!(first.id, "5");
        assert_eq!(first.id, second.id);
        assert_eq!(first, second);
        assert_eq!(service.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_defaults_for_new_batch() {
        let (service, _bus) = sqlite_service();

        let (batch, created) = service
            .create_if_absent(request_for_years(2024), date(2025, 1, 5))
            .unwrap();

        assert!(created);
        assert_eq!(batch.id, "4");
        // stored labels never carry a grade
        assert_eq!(batch.display_name, "Batch 2024-2027");
        assert!(batch.active);
        assert!(batch.notes.is_empty());
        assert_eq!(batch.end_year(), batch.start_year() + 3);
    }

    #[test]
    fn test_explicit_fields_are_kept() {
        let (service, _bus) = sqlite_service();
        let mut request = named_request_for_years(2024, "Evening cohort");
        request.active = Some(false);
        request.notes = Some("part-time".to_string());

        let (batch, _) = service.create_if_absent(request, date(2025, 1, 5)).unwrap();

        assert_eq!(batch.display_name, "Evening cohort");
        assert!(!batch.active);
        assert_eq!(batch.notes, "part-time");
    }

    #[test]
    fn test_blank_name_falls_back_to_label() {
        let (service, _bus) = sqlite_service();
        let (batch, _) = service
            .create_if_absent(named_request_for_years(2023, "   "), date(2025, 1, 5))
            .unwrap();
        assert_eq!(batch.display_name, "Batch 2023-2026");
    }

    #[test]
    fn test_existing_batch_is_never_updated() {
        let (service, _bus) = sqlite_service();
        service
            .create_if_absent(named_request_for_years(2024, "Original"), date(2025, 1, 5))
            .unwrap();

        let mut request = named_request_for_years(2024, "Renamed");
        request.active = Some(false);
        let (batch, created) = service.create_if_absent(request, date(2025, 1, 5)).unwrap();

        assert!(!created);
        assert_eq!(batch.display_name, "Original");
        assert!(batch.active);
    }

    #[test]
    fn test_by_dates_keeps_exact_dates() {
        let (service, _bus) = sqlite_service();
        let start = Utc.with_ymd_and_hms(2026, 8, 15, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2029, 5, 31, 0, 0, 0).unwrap();

        let (batch, created) = service
            .create_if_absent(
                CreateBatchRequest::new(BatchIdentity::ByDates {
                    start_date: start,
                    end_date: end,
                }),
                date(2026, 1, 1),
            )
            .unwrap();

        assert!(created);
        assert_eq!(batch.id, "6");
        assert_eq!(batch.start_date, start);
        assert_eq!(batch.end_date, end);

        // same intake year, different dates: same batch
        let other_start = Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap();
        let (again, created) = service
            .create_if_absent(
                CreateBatchRequest::new(BatchIdentity::ByDates {
                    start_date: other_start,
                    end_date: end,
                }),
                date(2026, 1, 1),
            )
            .unwrap();
        assert!(!created);
        assert_eq!(again.start_date, start);
    }

    #[test]
    fn test_by_legacy_year_range_id() {
        let (service, _bus) = sqlite_service();

        let (batch, created) = service
            .create_if_absent(
                CreateBatchRequest::new(BatchIdentity::ById {
                    id: "2025-2028".to_string(),
                }),
                date(2025, 10, 1),
            )
            .unwrap();

        assert!(created);
        assert_eq!(batch.start_date.year(), 2025);
        assert_eq!(batch.end_date.year(), 2028);
        assert_eq!(batch.id, "5");
    }

    #[test]
    fn test_by_numeric_id() {
        let (service, _bus) = sqlite_service();

        let (batch, _) = service
            .create_if_absent(
                CreateBatchRequest::new(BatchIdentity::ById { id: "04".to_string() }),
                date(2025, 10, 1),
            )
            .unwrap();

        assert_eq!(batch.id, "4");
        assert_eq!(batch.start_year(), 2024);
        assert_eq!(batch.end_year(), 2027);
    }

    #[test]
    fn test_unparseable_id_is_invalid_input() {
        let (service, _bus) = sqlite_service();

        let result = service.create_if_absent(
            CreateBatchRequest::new(BatchIdentity::ById {
                id: "spring".to_string(),
            }),
            date(2025, 10, 1),
        );

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_out_of_range_id_is_invalid_input() {
        let (service, _bus) = sqlite_service();

        for id in [i64::MIN.to_string(), i64::MAX.to_string()] {
            let result = service.create_if_absent(
                CreateBatchRequest::new(BatchIdentity::ById { id }),
                date(2025, 10, 1),
            );
            assert!(matches!(result, Err(AppError::InvalidInput(_))));
        }
        assert!(service.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_current_year_identity() {
        let (service, _bus) = sqlite_service();

        let (batch, _) = service
            .create_if_absent(CreateBatchRequest::new(BatchIdentity::CurrentYear), date(2026, 2, 1))
            .unwrap();

        assert_eq!(batch.id, "6");
        assert_eq!(batch.start_year(), 2026);
        assert_eq!(batch.end_year(), 2029);
    }

    #[test]
    fn test_pre_epoch_creation_is_rejected() {
        let (service, _bus) = sqlite_service();

        let result = service.create_if_absent(request_for_years(2018), date(2025, 1, 1));

        assert!(matches!(result, Err(AppError::Domain(_))));
        assert!(service.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_inverted_years_are_rejected() {
        let (service, _bus) = sqlite_service();

        let result = service.create_if_absent(
            CreateBatchRequest::new(BatchIdentity::ByYears {
                start_year: 2025,
                end_year: Some(2024),
            }),
            date(2025, 1, 1),
        );

        assert!(matches!(result, Err(AppError::Domain(_))));
    }

    #[test]
    fn test_creation_emits_event_once() {
        let (service, bus) = sqlite_service();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);
        bus.subscribe::<BatchCreated, _>(move |event| {
            assert_eq!(event.batch_id, "3");
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        service.create_if_absent(request_for_years(2023), date(2025, 1, 1)).unwrap();
        service.create_if_absent(request_for_years(2023), date(2025, 1, 1)).unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_get_by_id() {
        let (service, _bus) = sqlite_service();
        service.create_if_absent(request_for_years(2022), date(2025, 1, 1)).unwrap();

        assert_eq!(service.get_by_id("2").unwrap().unwrap().start_year(), 2022);
        assert_eq!(service.get_by_id(" 2 ").unwrap().unwrap().id, "2");
        assert!(service.get_by_id("9").unwrap().is_none());
    }
}

#[cfg(test)]
mod failure_tests {
    use crate::services::batch_service::tests_support::*;
    use crate::domain::Batch;
    use crate::error::AppError;
    use crate::repositories::MockBatchRepository;

    fn store_down() -> AppError {
        AppError::Pool("connection refused".to_string())
    }

    #[test]
    fn test_store_failure_fails_whole_window() {
        let mut repo = MockBatchRepository::new();
        repo.expect_find_all().times(1).returning(|| Err(store_down()));
        let (service, _bus) = mock_service(repo);

        let result = service.generate_options(2025, 5, date(2025, 10, 1));

        assert!(matches!(result, Err(AppError::Pool(ref m)) if m == "connection refused"));
    }

    #[test]
    fn test_window_reads_store_once() {
        let mut repo = MockBatchRepository::new();
        repo.expect_find_all().times(1).returning(|| Ok(Vec::new()));
        repo.expect_find_one().never();
        let (service, _bus) = mock_service(repo);

        assert_eq!(service.generate_options(2025, 8, date(2025, 10, 1)).unwrap().len(), 8);
    }

    #[test]
    fn test_lookup_failure_prevents_insert() {
        let mut repo = MockBatchRepository::new();
        repo.expect_find_one().returning(|_| Err(store_down()));
        repo.expect_insert().never();
        let (service, _bus) = mock_service(repo);

        let result = service.create_if_absent(request_for_years(2025), date(2025, 10, 1));
        assert!(matches!(result, Err(AppError::Pool(_))));
    }

    #[test]
    fn test_lost_race_surfaces_duplicate_key() {
        let mut repo = MockBatchRepository::new();
        repo.expect_find_one().times(1).returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .returning(|batch: &Batch| Err(AppError::DuplicateKey(batch.id.clone())));
        let (service, bus) = mock_service(repo);

        let result = service.create_if_absent(request_for_years(2025), date(2025, 10, 1));

        assert!(matches!(result, Err(AppError::DuplicateKey(ref id)) if id == "5"));
        assert!(bus.get_event_log().is_empty());
    }

    #[test]
    fn test_create_or_fetch_returns_race_winner() {
        let winner = stored_batch("5", 2025, "Winner");
        let winner_clone = winner.clone();

        let mut repo = MockBatchRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_find_one()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|batch: &Batch| Err(AppError::DuplicateKey(batch.id.clone())));
        repo.expect_find_one()
            .withf(|id: &str| id == "5")
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(winner_clone.clone())));
        let (service, bus) = mock_service(repo);

        let (batch, created) = service
            .create_or_fetch(request_for_years(2025), date(2025, 10, 1))
            .unwrap();

        assert!(!created);
        assert_eq!(batch, winner);
        let log = bus.get_event_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].event_type, "BatchCreationConflicted");
    }

    #[test]
    fn test_create_or_fetch_passes_other_errors_through() {
        let mut repo = MockBatchRepository::new();
        repo.expect_find_one().times(1).returning(|_| Ok(None));
        repo.expect_insert().times(1).returning(|_| Err(store_down()));
        let (service, _bus) = mock_service(repo);

        let result = service.create_or_fetch(request_for_years(2025), date(2025, 10, 1));
        assert!(matches!(result, Err(AppError::Pool(_))));
    }

    #[test]
    fn test_create_or_fetch_without_race_creates() {
        let (service, _bus) = sqlite_service();

        let (first, created) = service
            .create_or_fetch(request_for_years(2026), date(2025, 10, 1))
            .unwrap();
        assert!(created);

        let (second, created) = service
            .create_or_fetch(request_for_years(2026), date(2025, 10, 1))
            .unwrap();
        assert!(!created);
        assert_eq!(first, second);
    }
}
