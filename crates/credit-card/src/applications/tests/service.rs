use super::common::*;
use crate::applications::domain::{CreditCardApplication, Status};
use crate::applications::repository::RepositoryError;
use crate::applications::service::{ApplicationServiceError, CreditCardApplicationService};
use crate::applications::validation::PersonalIdError;
use std::sync::Arc;

#[tokio::test]
async fn add_then_get_returns_the_same_application() {
    let (service, _) = build_service();

    let stored = service.add(john_doe()).await.expect("add succeeds");
    assert!(stored.id.is_some(), "store assigns a surrogate key");

    let fetched = service
        .get_by_personal_id(PERSONAL_ID)
        .await
        .expect("application found");
    assert!(fetched.same_application(&john_doe()));
}

#[tokio::test]
async fn add_rejects_duplicate_personal_id() {
    let (service, repository) = build_service();
    service.add(john_doe()).await.expect("first add succeeds");

    let mut duplicate = john_doe();
    duplicate.applicant_name = "Johnny".to_string();

    match service.add(duplicate).await {
        Err(err @ ApplicationServiceError::DuplicateEntry) => {
            assert_eq!(
                err.to_string(),
                "An entry with the given personal id already exists."
            );
        }
        other => panic!("expected duplicate entry, got {other:?}"),
    }
    assert_eq!(repository.records().len(), 1);
}

#[tokio::test]
async fn padded_personal_id_is_stored_trimmed() {
    let (service, repository) = build_service();
    let mut padded = john_doe();
    padded.applicant_id = format!("\t{PERSONAL_ID} ");

    let stored = service.add(padded).await.expect("add succeeds");

    assert_eq!(stored.applicant_id, PERSONAL_ID);
    assert_eq!(repository.records()[0].applicant_id, PERSONAL_ID);
    service
        .get_by_personal_id(&format!(" {PERSONAL_ID}"))
        .await
        .expect("lookup trims the path id");
}

#[tokio::test]
async fn padded_duplicate_is_rejected() {
    let (service, repository) = build_service();
    service.add(john_doe()).await.expect("first add succeeds");

    for padded in [format!(" {PERSONAL_ID}"), format!("{PERSONAL_ID} ")] {
        let mut duplicate = john_doe();
        duplicate.applicant_id = padded;
        match service.add(duplicate).await {
            Err(ApplicationServiceError::DuplicateEntry) => {}
            other => panic!("expected duplicate entry, got {other:?}"),
        }
    }
    assert_eq!(repository.records().len(), 1);
}

#[tokio::test]
async fn add_validates_before_touching_the_store() {
    let (service, repository) = build_service();
    let mut application = john_doe();
    application.applicant_id = "1234567890x".to_string();

    match service.add(application).await {
        Err(ApplicationServiceError::InvalidPersonalId(PersonalIdError::NonNumeric)) => {}
        other => panic!("expected non-numeric failure, got {other:?}"),
    }
    assert!(repository.records().is_empty());
}

#[tokio::test]
async fn add_returns_submission_when_store_reports_no_key() {
    let repository = Arc::new(MemoryRepository::without_generated_keys());
    let service = CreditCardApplicationService::new(repository.clone());

    let returned = service.add(john_doe()).await.expect("add succeeds");

    assert_eq!(returned, john_doe());
    assert_eq!(repository.records().len(), 1, "row is still persisted");
}

#[tokio::test]
async fn get_reports_missing_application() {
    let (service, _) = build_service();

    match service.get_by_personal_id(PERSONAL_ID).await {
        Err(err @ ApplicationServiceError::NotFound) => {
            assert_eq!(
                err.to_string(),
                "No credit card application with given personal id was found."
            );
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn get_rejects_malformed_ids() {
    let (service, _) = build_service();

    for (id, expected) in [
        ("", PersonalIdError::Empty),
        ("123", PersonalIdError::Length),
        ("abcdefghijk", PersonalIdError::NonNumeric),
    ] {
        match service.get_by_personal_id(id).await {
            Err(ApplicationServiceError::InvalidPersonalId(err)) => assert_eq!(err, expected),
            other => panic!("expected invalid personal id for {id:?}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn update_requires_matching_path_id() {
    let (service, repository) = build_service();
    service.add(john_doe()).await.expect("add succeeds");

    let mut changed = john_doe();
    changed.status = Status::Cancelled;

    for path_id in ["10987654321", " 12345678901", "missing"] {
        match service.update_by_personal_id(path_id, changed.clone()).await {
            Err(err @ ApplicationServiceError::PersonalIdMismatch) => {
                assert_eq!(
                    err.to_string(),
                    "Personal ID in the path and in the request body do not match."
                );
            }
            other => panic!("expected mismatch for {path_id:?}, got {other:?}"),
        }
    }

    assert_eq!(repository.records()[0].status, Status::Approved);
}

#[tokio::test]
async fn update_mismatch_is_reported_for_unknown_records_too() {
    let (service, _) = build_service();

    match service.update_by_personal_id("10987654321", john_doe()).await {
        Err(ApplicationServiceError::PersonalIdMismatch) => {}
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn update_returns_submitted_record() {
    let (service, repository) = build_service();
    service.add(john_doe()).await.expect("add succeeds");

    let changed = CreditCardApplication::new("John", "Doe-Smith", PERSONAL_ID, Status::OnHold);
    let returned = service
        .update_by_personal_id(PERSONAL_ID, changed.clone())
        .await
        .expect("update succeeds");

    assert_eq!(returned, changed);
    let stored = &repository.records()[0];
    assert_eq!(stored.applicant_surname, "Doe-Smith");
    assert_eq!(stored.status, Status::OnHold);
}

#[tokio::test]
async fn update_with_padded_ids_targets_trimmed_record() {
    let (service, repository) = build_service();
    service.add(john_doe()).await.expect("add succeeds");

    let padded = format!("{PERSONAL_ID} ");
    let changed = CreditCardApplication::new("John", "Doe", padded.as_str(), Status::Expired);
    let returned = service
        .update_by_personal_id(&padded, changed)
        .await
        .expect("update succeeds");

    assert_eq!(returned.applicant_id, PERSONAL_ID);
    let records = repository.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, Status::Expired);
}

#[tokio::test]
async fn update_of_missing_application_is_not_found() {
    let (service, _) = build_service();

    match service.update_by_personal_id(PERSONAL_ID, john_doe()).await {
        Err(ApplicationServiceError::NotFound) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn second_delete_is_not_found() {
    let (service, _) = build_service();
    service.add(john_doe()).await.expect("add succeeds");

    service
        .delete_by_personal_id(PERSONAL_ID)
        .await
        .expect("first delete succeeds");

    match service.delete_by_personal_id(PERSONAL_ID).await {
        Err(ApplicationServiceError::NotFound) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn john_doe_lifecycle() {
    let (service, _) = build_service();
    service.add(john_doe()).await.expect("add succeeds");

    let listed = service.list().await.expect("list succeeds");
    assert_eq!(listed.len(), 1);
    assert!(listed[0].same_application(&john_doe()));

    let fetched = service
        .get_by_personal_id(PERSONAL_ID)
        .await
        .expect("application found");
    assert!(fetched.same_application(&john_doe()));

    service
        .delete_by_personal_id(PERSONAL_ID)
        .await
        .expect("delete succeeds");

    assert!(matches!(
        service.get_by_personal_id(PERSONAL_ID).await,
        Err(ApplicationServiceError::NotFound)
    ));
}

#[tokio::test]
async fn list_propagates_store_failures() {
    let service = CreditCardApplicationService::new(Arc::new(UnavailableRepository));

    match service.list().await {
        Err(ApplicationServiceError::Repository(RepositoryError::Unavailable(message))) => {
            assert!(message.contains("refused"));
        }
        other => panic!("expected repository failure, got {other:?}"),
    }
}

#[tokio::test]
async fn list_keeps_store_order() {
    let (service, _) = build_service();
    service.add(john_doe()).await.expect("add succeeds");
    service.add(jane_roe()).await.expect("add succeeds");

    let ids: Vec<_> = service
        .list()
        .await
        .expect("list succeeds")
        .into_iter()
        .map(|application| application.applicant_id)
        .collect();
    assert_eq!(ids, vec![PERSONAL_ID.to_string(), "10987654321".to_string()]);
}
