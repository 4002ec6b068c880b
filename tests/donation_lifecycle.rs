mod common;

use chrono::NaiveDate;
use common::{donation_input, seed_beneficiary, seed_references, test_pool};
use darua_backend::error::AppError;
use darua_backend::models::{DistributionRequest, DonationStatus, DonationType, Unit};
use darua_backend::services::{DistributionService, DonationService, StatsService};

#[tokio::test]
async fn new_donation_is_stored_as_received() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let service = DonationService::new(pool.clone());

    let id = service
        .create(&donation_input(donor, point, volunteer))
        .await
        .unwrap();

    let donation = service.get(id).await.unwrap();
    assert_eq!(donation.status, DonationStatus::Received);

    // The persisted text must be the Portuguese label, not the enum name.
    let raw: String = sqlx::query_scalar("SELECT status FROM donations WHERE id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(raw, "Recebida");
}

#[tokio::test]
async fn stored_donation_round_trips_unchanged() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let service = DonationService::new(pool.clone());

    let mut input = donation_input(donor, point, volunteer);
    input.donation_type = DonationType::Medicine;
    input.item_description = "Dipirona 500mg".to_string();
    input.quantity = 3.0;
    input.unit = Unit::Boxes;
    input.notes = Some("Validade 12/2027".to_string());
    input.created_at = NaiveDate::from_ymd_opt(2026, 2, 1);

    let id = service.create(&input).await.unwrap();
    let stored = service.get(id).await.unwrap();

    assert_eq!(stored.donation_type, DonationType::Medicine);
    assert_eq!(stored.item_description, "Dipirona 500mg");
    assert_eq!(stored.quantity, 3.0);
    assert_eq!(stored.unit, Unit::Boxes);
    assert_eq!(stored.notes.as_deref(), Some("Validade 12/2027"));
    assert_eq!(stored.created_at, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    assert_eq!(stored.delivered_at, None);
}

#[tokio::test]
async fn invalid_donation_writes_nothing() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let service = DonationService::new(pool.clone());

    let mut input = donation_input(donor, point, volunteer);
    input.quantity = 0.0;

    let err = service.create(&input).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM donations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn past_delivery_without_creation_date_is_rejected() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let service = DonationService::new(pool.clone());

    // The omitted creation date defaults to today, so a delivery in the
    // past would put the row in delivered-before-created state.
    let mut input = donation_input(donor, point, volunteer);
    input.delivered_at = NaiveDate::from_ymd_opt(2020, 1, 1);

    let err = service.create(&input).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM donations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn update_without_creation_date_keeps_stored_date() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let service = DonationService::new(pool.clone());

    let mut input = donation_input(donor, point, volunteer);
    input.created_at = NaiveDate::from_ymd_opt(2024, 5, 1);
    let id = service.create(&input).await.unwrap();

    // Touch only the description; the creation date must survive.
    let mut changed = donation_input(donor, point, volunteer);
    changed.item_description = "Feijão 2kg".to_string();
    service.update(id, &changed).await.unwrap();

    let stored = service.get(id).await.unwrap();
    assert_eq!(stored.item_description, "Feijão 2kg");
    assert_eq!(stored.created_at, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
}

#[tokio::test]
async fn update_delivery_is_checked_against_stored_creation_date() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let service = DonationService::new(pool.clone());

    let mut input = donation_input(donor, point, volunteer);
    input.created_at = NaiveDate::from_ymd_opt(2024, 5, 1);
    let id = service.create(&input).await.unwrap();

    // Delivery before the stored creation date, creation date omitted.
    let mut changed = donation_input(donor, point, volunteer);
    changed.delivered_at = NaiveDate::from_ymd_opt(2024, 4, 1);
    let err = service.update(id, &changed).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // A delivery after it is fine even without an explicit creation date.
    changed.delivered_at = NaiveDate::from_ymd_opt(2024, 6, 1);
    service.update(id, &changed).await.unwrap();
    let stored = service.get(id).await.unwrap();
    assert_eq!(stored.created_at, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    assert_eq!(stored.delivered_at, NaiveDate::from_ymd_opt(2024, 6, 1));
}

#[tokio::test]
async fn donation_with_unknown_donor_is_rejected() {
    let pool = test_pool().await;
    let (_, point, volunteer) = seed_references(&pool).await;
    let service = DonationService::new(pool.clone());

    let input = donation_input(999, point, volunteer);
    let err = service.create(&input).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(msg) if msg.contains("999")));
}

#[tokio::test]
async fn update_cannot_change_status() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let beneficiary = seed_beneficiary(&pool, "Pedro").await;
    let donations = DonationService::new(pool.clone());
    let distribution = DistributionService::new(pool.clone());

    let id = donations
        .create(&donation_input(donor, point, volunteer))
        .await
        .unwrap();
    distribution
        .distribute(
            id,
            &DistributionRequest {
                beneficiary_ids: vec![beneficiary],
                volunteer_ids: vec![],
                delivery_date: None,
            },
        )
        .await
        .unwrap();

    let mut input = donation_input(donor, point, volunteer);
    input.item_description = "Feijão 2kg".to_string();
    donations.update(id, &input).await.unwrap();

    let updated = donations.get(id).await.unwrap();
    assert_eq!(updated.item_description, "Feijão 2kg");
    assert_eq!(updated.status, DonationStatus::Distributed);
}

#[tokio::test]
async fn distribute_marks_donation_distributed() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let ana = seed_beneficiary(&pool, "Ana").await;
    let bia = seed_beneficiary(&pool, "Bia").await;
    let donations = DonationService::new(pool.clone());
    let distribution = DistributionService::new(pool.clone());

    let id = donations
        .create(&donation_input(donor, point, volunteer))
        .await
        .unwrap();

    let outcome = distribution
        .distribute(
            id,
            &DistributionRequest {
                beneficiary_ids: vec![ana, bia, ana],
                volunteer_ids: vec![volunteer],
                delivery_date: NaiveDate::from_ymd_opt(2026, 3, 15),
            },
        )
        .await
        .unwrap();

    // Duplicate ids collapse into one association.
    assert_eq!(outcome.beneficiaries, 2);
    assert_eq!(outcome.volunteers, 1);
    assert_eq!(outcome.status, DonationStatus::Distributed);

    let donation = donations.get(id).await.unwrap();
    assert_eq!(donation.status, DonationStatus::Distributed);
    assert_eq!(
        donation.delivered_at,
        NaiveDate::from_ymd_opt(2026, 3, 15)
    );

    let raw: String = sqlx::query_scalar("SELECT status FROM donations WHERE id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(raw, "Distribuída");
}

#[tokio::test]
async fn redistribute_replaces_prior_associations() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let ana = seed_beneficiary(&pool, "Ana").await;
    let bia = seed_beneficiary(&pool, "Bia").await;
    let caio = seed_beneficiary(&pool, "Caio").await;
    let donations = DonationService::new(pool.clone());
    let distribution = DistributionService::new(pool.clone());

    let id = donations
        .create(&donation_input(donor, point, volunteer))
        .await
        .unwrap();

    distribution
        .distribute(
            id,
            &DistributionRequest {
                beneficiary_ids: vec![ana, bia],
                volunteer_ids: vec![],
                delivery_date: None,
            },
        )
        .await
        .unwrap();

    distribution
        .distribute(
            id,
            &DistributionRequest {
                beneficiary_ids: vec![caio],
                volunteer_ids: vec![],
                delivery_date: None,
            },
        )
        .await
        .unwrap();

    let current = distribution.list_beneficiaries(id).await.unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].id, caio);
    assert_eq!(
        donations.get(id).await.unwrap().status,
        DonationStatus::Distributed
    );
}

#[tokio::test]
async fn empty_beneficiary_set_is_rejected_without_changes() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let ana = seed_beneficiary(&pool, "Ana").await;
    let donations = DonationService::new(pool.clone());
    let distribution = DistributionService::new(pool.clone());

    let id = donations
        .create(&donation_input(donor, point, volunteer))
        .await
        .unwrap();
    distribution
        .distribute(
            id,
            &DistributionRequest {
                beneficiary_ids: vec![ana],
                volunteer_ids: vec![],
                delivery_date: None,
            },
        )
        .await
        .unwrap();

    let err = distribution
        .distribute(
            id,
            &DistributionRequest {
                beneficiary_ids: vec![],
                volunteer_ids: vec![],
                delivery_date: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EmptyBeneficiarySet));

    // The earlier distribution is untouched.
    assert_eq!(distribution.list_beneficiaries(id).await.unwrap().len(), 1);
    assert_eq!(
        donations.get(id).await.unwrap().status,
        DonationStatus::Distributed
    );
}

#[tokio::test]
async fn failed_distribution_rolls_back_entirely() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let ana = seed_beneficiary(&pool, "Ana").await;
    let donations = DonationService::new(pool.clone());
    let distribution = DistributionService::new(pool.clone());

    let id = donations
        .create(&donation_input(donor, point, volunteer))
        .await
        .unwrap();
    distribution
        .distribute(
            id,
            &DistributionRequest {
                beneficiary_ids: vec![ana],
                volunteer_ids: vec![],
                delivery_date: None,
            },
        )
        .await
        .unwrap();

    // A nonexistent beneficiary trips the foreign key mid-transaction.
    let err = distribution
        .distribute(
            id,
            &DistributionRequest {
                beneficiary_ids: vec![ana, 9999],
                volunteer_ids: vec![],
                delivery_date: NaiveDate::from_ymd_opt(2026, 4, 1),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Distribution(_)));

    // Prior state survives: same single association, no delivery date.
    let current = distribution.list_beneficiaries(id).await.unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].id, ana);
    let donation = donations.get(id).await.unwrap();
    assert_eq!(donation.status, DonationStatus::Distributed);
    assert_eq!(donation.delivered_at, None);
}

#[tokio::test]
async fn distribute_unknown_donation_is_not_found() {
    let pool = test_pool().await;
    let _ = seed_references(&pool).await;
    let ana = seed_beneficiary(&pool, "Ana").await;
    let distribution = DistributionService::new(pool.clone());

    let err = distribution
        .distribute(
            42,
            &DistributionRequest {
                beneficiary_ids: vec![ana],
                volunteer_ids: vec![],
                delivery_date: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn recompute_status_is_idempotent() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let ana = seed_beneficiary(&pool, "Ana").await;
    let donations = DonationService::new(pool.clone());
    let distribution = DistributionService::new(pool.clone());

    let id = donations
        .create(&donation_input(donor, point, volunteer))
        .await
        .unwrap();

    assert_eq!(
        distribution.recompute_status(id).await.unwrap(),
        DonationStatus::Received
    );
    assert_eq!(
        distribution.recompute_status(id).await.unwrap(),
        DonationStatus::Received
    );

    distribution
        .distribute(
            id,
            &DistributionRequest {
                beneficiary_ids: vec![ana],
                volunteer_ids: vec![],
                delivery_date: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(
        distribution.recompute_status(id).await.unwrap(),
        DonationStatus::Distributed
    );
    assert_eq!(
        distribution.recompute_status(id).await.unwrap(),
        DonationStatus::Distributed
    );
}

#[tokio::test]
async fn deleting_a_donation_removes_its_associations() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let ana = seed_beneficiary(&pool, "Ana").await;
    let donations = DonationService::new(pool.clone());
    let distribution = DistributionService::new(pool.clone());

    let id = donations
        .create(&donation_input(donor, point, volunteer))
        .await
        .unwrap();
    distribution
        .distribute(
            id,
            &DistributionRequest {
                beneficiary_ids: vec![ana],
                volunteer_ids: vec![volunteer],
                delivery_date: None,
            },
        )
        .await
        .unwrap();

    donations.delete(id).await.unwrap();

    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM donation_beneficiaries WHERE donation_id = ?")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn listing_filters_by_status_and_type() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let ana = seed_beneficiary(&pool, "Ana").await;
    let donations = DonationService::new(pool.clone());
    let distribution = DistributionService::new(pool.clone());

    let food = donations
        .create(&donation_input(donor, point, volunteer))
        .await
        .unwrap();
    let mut clothing = donation_input(donor, point, volunteer);
    clothing.donation_type = DonationType::Clothing;
    clothing.item_description = "Agasalhos".to_string();
    clothing.quantity = 10.0;
    clothing.unit = Unit::Units;
    donations.create(&clothing).await.unwrap();

    distribution
        .distribute(
            food,
            &DistributionRequest {
                beneficiary_ids: vec![ana],
                volunteer_ids: vec![],
                delivery_date: None,
            },
        )
        .await
        .unwrap();

    let distributed = donations
        .list_by_status(DonationStatus::Distributed)
        .await
        .unwrap();
    assert_eq!(distributed.len(), 1);
    assert_eq!(distributed[0].id, food);

    let received = donations
        .list_by_status(DonationStatus::Received)
        .await
        .unwrap();
    assert_eq!(received.len(), 1);

    let clothes = donations.list_by_type(DonationType::Clothing).await.unwrap();
    assert_eq!(clothes.len(), 1);
    assert_eq!(clothes[0].item_description, "Agasalhos");

    assert_eq!(donations.list_by_donor(donor).await.unwrap().len(), 2);
}

#[tokio::test]
async fn stats_reflect_the_donation_table() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    let ana = seed_beneficiary(&pool, "Ana").await;
    let donations = DonationService::new(pool.clone());
    let distribution = DistributionService::new(pool.clone());
    let stats = StatsService::new(pool.clone());

    let empty = stats.stats().await.unwrap();
    assert_eq!(empty.total, 0);
    assert_eq!(empty.total_quantity, 0.0);

    let first = donations
        .create(&donation_input(donor, point, volunteer))
        .await
        .unwrap();
    let mut second = donation_input(donor, point, volunteer);
    second.quantity = 2.5;
    donations.create(&second).await.unwrap();

    distribution
        .distribute(
            first,
            &DistributionRequest {
                beneficiary_ids: vec![ana],
                volunteer_ids: vec![],
                delivery_date: None,
            },
        )
        .await
        .unwrap();

    let current = stats.stats().await.unwrap();
    assert_eq!(current.total, 2);
    assert_eq!(current.received, 1);
    assert_eq!(current.distributed, 1);
    assert_eq!(current.total_quantity, 7.5);
}

#[tokio::test]
async fn dashboard_metrics_aggregate_everything() {
    let pool = test_pool().await;
    let (donor, point, volunteer) = seed_references(&pool).await;
    seed_beneficiary(&pool, "Ana").await;
    let donations = DonationService::new(pool.clone());
    let stats = StatsService::new(pool.clone());

    donations
        .create(&donation_input(donor, point, volunteer))
        .await
        .unwrap();
    let mut clothing = donation_input(donor, point, volunteer);
    clothing.donation_type = DonationType::Clothing;
    clothing.unit = Unit::Units;
    donations.create(&clothing).await.unwrap();
    donations
        .create(&donation_input(donor, point, volunteer))
        .await
        .unwrap();

    let metrics = stats.dashboard_metrics().await.unwrap();
    assert_eq!(metrics.total_donors, 1);
    assert_eq!(metrics.total_beneficiaries, 1);
    assert_eq!(metrics.total_donations, 3);
    assert_eq!(metrics.active_campaigns, 0);
    // Most common type first.
    assert_eq!(metrics.donations_by_type[0].donation_type, DonationType::Food);
    assert_eq!(metrics.donations_by_type[0].total, 2);
    assert_eq!(metrics.recent_donations.len(), 3);
    assert_eq!(metrics.recent_donations[0].donor_name, "Maria Silva");
}
