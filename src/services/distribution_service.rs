use crate::error::{AppError, AppResult};
use crate::models::{Beneficiary, DistributionOutcome, DistributionRequest, DonationStatus, Volunteer};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::BTreeSet;

/// Owns the donation state machine: `Recebida` until at least one
/// beneficiary association exists, `Distribuída` from then on. All
/// association writes go through `distribute`, which replaces the prior
/// set wholesale inside a single transaction.
#[derive(Clone)]
pub struct DistributionService {
    pool: SqlitePool,
}

impl DistributionService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Distribute a donation to the given beneficiaries, optionally via
    /// the given volunteers. Prior associations are replaced, not merged.
    ///
    /// The whole sequence runs in one transaction: on any failure the
    /// donation's associations and status are left exactly as they were.
    /// Callers must not invoke this concurrently for the same donation;
    /// the store's isolation then decides which call's set wins.
    pub async fn distribute(
        &self,
        donation_id: i64,
        request: &DistributionRequest,
    ) -> AppResult<DistributionOutcome> {
        let beneficiary_ids: BTreeSet<i64> = request.beneficiary_ids.iter().copied().collect();
        if beneficiary_ids.is_empty() {
            return Err(AppError::EmptyBeneficiarySet);
        }
        let volunteer_ids: BTreeSet<i64> = request.volunteer_ids.iter().copied().collect();

        // The donation must exist before any write happens.
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM donations WHERE id = ?")
            .bind(donation_id)
            .fetch_optional(&self.pool)
            .await?;
        if found.is_none() {
            return Err(AppError::NotFound(format!("Donation {donation_id} not found")));
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM donation_beneficiaries WHERE donation_id = ?")
            .bind(donation_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Distribution)?;

        sqlx::query("DELETE FROM donation_volunteers WHERE donation_id = ?")
            .bind(donation_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Distribution)?;

        for beneficiary_id in &beneficiary_ids {
            sqlx::query(
                "INSERT INTO donation_beneficiaries (donation_id, beneficiary_id) VALUES (?, ?)",
            )
            .bind(donation_id)
            .bind(beneficiary_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Distribution)?;
        }

        for volunteer_id in &volunteer_ids {
            sqlx::query(
                "INSERT INTO donation_volunteers (donation_id, volunteer_id) VALUES (?, ?)",
            )
            .bind(donation_id)
            .bind(volunteer_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Distribution)?;
        }

        if let Some(delivery_date) = request.delivery_date {
            sqlx::query("UPDATE donations SET delivered_at = ? WHERE id = ?")
                .bind(delivery_date)
                .bind(donation_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Distribution)?;
        }

        let status = derive_and_store_status(&mut *tx, donation_id)
            .await
            .map_err(AppError::Distribution)?;

        tx.commit().await.map_err(AppError::Distribution)?;

        log::info!(
            "Distributed donation {} to {} beneficiaries ({} volunteers), status {}",
            donation_id,
            beneficiary_ids.len(),
            volunteer_ids.len(),
            status
        );

        Ok(DistributionOutcome {
            donation_id,
            beneficiaries: beneficiary_ids.len(),
            volunteers: volunteer_ids.len(),
            status,
        })
    }

    /// Re-derive a donation's status from its beneficiary associations
    /// and persist it. Safe to call repeatedly; with unchanged
    /// associations the stored status does not change.
    pub async fn recompute_status(&self, donation_id: i64) -> AppResult<DonationStatus> {
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM donations WHERE id = ?")
            .bind(donation_id)
            .fetch_optional(&self.pool)
            .await?;
        if found.is_none() {
            return Err(AppError::NotFound(format!("Donation {donation_id} not found")));
        }

        let mut tx = self.pool.begin().await?;
        let status = derive_and_store_status(&mut *tx, donation_id).await?;
        tx.commit().await?;
        Ok(status)
    }

    /// Beneficiaries currently associated with a donation, ordered by name.
    pub async fn list_beneficiaries(&self, donation_id: i64) -> AppResult<Vec<Beneficiary>> {
        Ok(sqlx::query_as::<_, Beneficiary>(
            r#"
            SELECT b.id, b.name, b.age, b.gender, b.description
            FROM beneficiaries b
            INNER JOIN donation_beneficiaries r ON b.id = r.beneficiary_id
            WHERE r.donation_id = ?
            ORDER BY b.name
            "#,
        )
        .bind(donation_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Volunteers recorded as having performed the delivery, ordered by name.
    pub async fn list_volunteers(&self, donation_id: i64) -> AppResult<Vec<Volunteer>> {
        Ok(sqlx::query_as::<_, Volunteer>(
            r#"
            SELECT v.id, v.name, v.email, v.phone
            FROM volunteers v
            INNER JOIN donation_volunteers p ON v.id = p.volunteer_id
            WHERE p.donation_id = ?
            ORDER BY v.name
            "#,
        )
        .bind(donation_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

/// Status is a pure function of the beneficiary association: any rows
/// means distributed, none means received.
async fn derive_and_store_status(
    conn: &mut SqliteConnection,
    donation_id: i64,
) -> Result<DonationStatus, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM donation_beneficiaries WHERE donation_id = ?")
            .bind(donation_id)
            .fetch_one(&mut *conn)
            .await?;

    let status = if count > 0 {
        DonationStatus::Distributed
    } else {
        DonationStatus::Received
    };

    sqlx::query("UPDATE donations SET status = ? WHERE id = ?")
        .bind(status)
        .bind(donation_id)
        .execute(&mut *conn)
        .await?;

    Ok(status)
}
