use darua_backend::config::DatabaseConfig;
use darua_backend::database::{DbPool, create_pool, run_migrations};
use darua_backend::models::{DonationInput, DonationType, NewBeneficiary, NewCollectionPoint, NewDonor, NewVolunteer, Unit};
use darua_backend::services::{
    BeneficiaryService, CollectionPointService, DonorService, VolunteerService,
};

/// Fresh in-memory database, migrated and isolated per test.
pub async fn test_pool() -> DbPool {
    let config = DatabaseConfig {
        url: format!(
            "sqlite:file:memdb_{}?mode=memory&cache=shared",
            uuid::Uuid::new_v4()
        ),
        max_connections: 5,
    };
    let pool = create_pool(&config).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

/// Minimal reference rows most donation tests need: one donor, one
/// collection point, one receiving volunteer. Returns their ids.
pub async fn seed_references(pool: &DbPool) -> (i64, i64, i64) {
    let donor_id = DonorService::new(pool.clone())
        .create(&NewDonor {
            name: "Maria Silva".to_string(),
            email: Some("maria@example.com".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let point_id = CollectionPointService::new(pool.clone())
        .create(&NewCollectionPoint {
            responsible: "João Santos".to_string(),
            city: Some("São Paulo".to_string()),
            state: Some("SP".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let volunteer_id = VolunteerService::new(pool.clone())
        .create(&NewVolunteer {
            name: "Carlos Lima".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    (donor_id, point_id, volunteer_id)
}

pub async fn seed_beneficiary(pool: &DbPool, name: &str) -> i64 {
    BeneficiaryService::new(pool.clone())
        .create(&NewBeneficiary {
            name: name.to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
}

pub fn donation_input(donor_id: i64, point_id: i64, volunteer_id: i64) -> DonationInput {
    DonationInput {
        donor_id,
        collection_point_id: point_id,
        receiving_volunteer_id: volunteer_id,
        campaign_id: None,
        donation_type: DonationType::Food,
        item_description: "Arroz 5kg".to_string(),
        quantity: 5.0,
        unit: Unit::Kilograms,
        notes: None,
        created_at: None,
        delivered_at: None,
    }
}
