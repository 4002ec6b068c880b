use crate::error::{AppError, AppResult};
use crate::models::{Donation, DonationInput, DonationStatus, DonationType};
use chrono::{Local, NaiveDate};
use sqlx::SqlitePool;

const DONATION_COLUMNS: &str = "id, donor_id, collection_point_id, receiving_volunteer_id, \
     campaign_id, donation_type, item_description, quantity, unit, notes, \
     created_at, delivered_at, status";

/// Field-level validation of a candidate donation. Reports the first
/// violated invariant and touches nothing.
pub fn validate_donation(input: &DonationInput) -> AppResult<()> {
    if input.donor_id <= 0 {
        return Err(AppError::Validation("Donor is required".to_string()));
    }
    if input.collection_point_id <= 0 {
        return Err(AppError::Validation(
            "Collection point is required".to_string(),
        ));
    }
    if input.receiving_volunteer_id <= 0 {
        return Err(AppError::Validation(
            "Receiving volunteer is required".to_string(),
        ));
    }
    if input.item_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Item description must not be blank".to_string(),
        ));
    }
    if input.quantity <= 0.0 {
        return Err(AppError::Validation(
            "Quantity must be greater than zero".to_string(),
        ));
    }
    if let Some(created) = input.created_at {
        delivery_not_before(created, input.delivered_at)?;
    }
    Ok(())
}

/// The date-pair half of the invariant, checked against whatever
/// creation date actually ends up in the row: today on create when the
/// caller omitted one, the stored date on update.
fn delivery_not_before(created: NaiveDate, delivered: Option<NaiveDate>) -> AppResult<()> {
    if let Some(delivered) = delivered {
        if delivered < created {
            return Err(AppError::Validation(
                "Delivery date cannot precede the creation date".to_string(),
            ));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct DonationService {
    pool: SqlitePool,
}

impl DonationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new donation. Status is always persisted as `Recebida`
    /// regardless of caller intent; only distribution changes it.
    pub async fn create(&self, input: &DonationInput) -> AppResult<i64> {
        validate_donation(input)?;
        let created_at = effective_creation_date(input);
        delivery_not_before(created_at, input.delivered_at)?;
        self.check_references(input).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO donations (
                donor_id, collection_point_id, receiving_volunteer_id, campaign_id,
                donation_type, item_description, quantity, unit, notes,
                created_at, delivered_at, status
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(input.donor_id)
        .bind(input.collection_point_id)
        .bind(input.receiving_volunteer_id)
        .bind(input.campaign_id)
        .bind(input.donation_type)
        .bind(&input.item_description)
        .bind(input.quantity)
        .bind(input.unit)
        .bind(&input.notes)
        .bind(created_at)
        .bind(input.delivered_at)
        .bind(DonationStatus::Received)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        log::info!(
            "Registered donation {}: {} {} of {}",
            id,
            input.quantity,
            input.unit,
            input.item_description
        );
        Ok(id)
    }

    /// Overwrite all mutable fields of an existing donation. Status is
    /// deliberately not part of the contract; it stays whatever the
    /// distribution workflow last derived. An omitted creation date
    /// keeps the stored one rather than resetting it.
    pub async fn update(&self, id: i64, input: &DonationInput) -> AppResult<()> {
        validate_donation(input)?;
        let existing = self.get(id).await?;
        let created_at = input.created_at.unwrap_or(existing.created_at);
        delivery_not_before(created_at, input.delivered_at)?;
        self.check_references(input).await?;

        sqlx::query(
            r#"
            UPDATE donations SET
                donor_id = ?, collection_point_id = ?, receiving_volunteer_id = ?,
                campaign_id = ?, donation_type = ?, item_description = ?,
                quantity = ?, unit = ?, notes = ?, created_at = ?, delivered_at = ?
            WHERE id = ?
            "#,
        )
        .bind(input.donor_id)
        .bind(input.collection_point_id)
        .bind(input.receiving_volunteer_id)
        .bind(input.campaign_id)
        .bind(input.donation_type)
        .bind(&input.item_description)
        .bind(input.quantity)
        .bind(input.unit)
        .bind(&input.notes)
        .bind(created_at)
        .bind(input.delivered_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a donation. The store cascades the removal of its
    /// beneficiary and volunteer association rows.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM donations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Donation {id} not found")));
        }
        log::info!("Deleted donation {id}");
        Ok(())
    }

    pub async fn get(&self, id: i64) -> AppResult<Donation> {
        let query = format!("SELECT {DONATION_COLUMNS} FROM donations WHERE id = ?");
        sqlx::query_as::<_, Donation>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Donation {id} not found")))
    }

    pub async fn list(&self) -> AppResult<Vec<Donation>> {
        let query = format!("SELECT {DONATION_COLUMNS} FROM donations ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Donation>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn list_by_status(&self, status: DonationStatus) -> AppResult<Vec<Donation>> {
        let query = format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE status = ? ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Donation>(&query)
            .bind(status)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn list_by_donor(&self, donor_id: i64) -> AppResult<Vec<Donation>> {
        let query = format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE donor_id = ? ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Donation>(&query)
            .bind(donor_id)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn list_by_type(&self, donation_type: DonationType) -> AppResult<Vec<Donation>> {
        let query = format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE donation_type = ? ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Donation>(&query)
            .bind(donation_type)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Referenced donor, collection point, receiving volunteer and
    /// campaign (when given) must all exist before any write.
    async fn check_references(&self, input: &DonationInput) -> AppResult<()> {
        self.ensure_exists("donors", "Donor", input.donor_id).await?;
        self.ensure_exists(
            "collection_points",
            "Collection point",
            input.collection_point_id,
        )
        .await?;
        self.ensure_exists("volunteers", "Volunteer", input.receiving_volunteer_id)
            .await?;
        if let Some(campaign_id) = input.campaign_id {
            self.ensure_exists("campaigns", "Campaign", campaign_id)
                .await?;
        }
        Ok(())
    }

    async fn ensure_exists(&self, table: &str, label: &str, id: i64) -> AppResult<()> {
        let query = format!("SELECT id FROM {table} WHERE id = ?");
        let found = sqlx::query_scalar::<_, i64>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if found.is_none() {
            return Err(AppError::Validation(format!("{label} {id} does not exist")));
        }
        Ok(())
    }
}

fn effective_creation_date(input: &DonationInput) -> NaiveDate {
    input
        .created_at
        .unwrap_or_else(|| Local::now().date_naive())
}
