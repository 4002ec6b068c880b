use crate::error::AppResult;
use crate::models::{DashboardMetrics, DonationStats, DonationStatus, RecentDonation, TypeCount};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct StatsService {
    pool: SqlitePool,
}

impl StatsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Aggregate counters over all donations. An empty table yields
    /// all-zero aggregates, never an error.
    pub async fn stats(&self) -> AppResult<DonationStats> {
        Ok(sqlx::query_as::<_, DonationStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0) AS received,
                COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0) AS distributed,
                COALESCE(SUM(quantity), 0.0) AS total_quantity
            FROM donations
            "#,
        )
        .bind(DonationStatus::Received)
        .bind(DonationStatus::Distributed)
        .fetch_one(&self.pool)
        .await?)
    }

    /// Everything the main dashboard needs: entity totals, active
    /// campaign count, per-type breakdown and the ten newest donations.
    pub async fn dashboard_metrics(&self) -> AppResult<DashboardMetrics> {
        let total_donors = self.count("donors").await?;
        let total_beneficiaries = self.count("beneficiaries").await?;
        let total_donations = self.count("donations").await?;

        let active_campaigns: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM campaigns WHERE ends_at IS NULL OR ends_at >= date('now')",
        )
        .fetch_one(&self.pool)
        .await?;

        let donations_by_type = sqlx::query_as::<_, TypeCount>(
            r#"
            SELECT donation_type, COUNT(*) AS total
            FROM donations
            GROUP BY donation_type
            ORDER BY total DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let recent_donations = sqlx::query_as::<_, RecentDonation>(
            r#"
            SELECT d.created_at, donors.name AS donor_name, d.item_description,
                   d.quantity, d.unit, d.status
            FROM donations d
            INNER JOIN donors ON d.donor_id = donors.id
            ORDER BY d.created_at DESC, d.id DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardMetrics {
            total_donors,
            total_beneficiaries,
            total_donations,
            active_campaigns,
            donations_by_type,
            recent_donations,
        })
    }

    async fn count(&self, table: &str) -> AppResult<i64> {
        let query = format!("SELECT COUNT(*) FROM {table}");
        Ok(sqlx::query_scalar(&query).fetch_one(&self.pool).await?)
    }
}
