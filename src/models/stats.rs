use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::donation::{DonationStatus, DonationType, Unit};

/// Aggregate counters over the donation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DonationStats {
    pub total: i64,
    pub received: i64,
    pub distributed: i64,
    pub total_quantity: f64,
}

/// Donation count for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TypeCount {
    pub donation_type: DonationType,
    pub total: i64,
}

/// A recent donation joined with its donor's name, for dashboard listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecentDonation {
    pub created_at: NaiveDate,
    pub donor_name: String,
    pub item_description: String,
    pub quantity: f64,
    pub unit: Unit,
    pub status: DonationStatus,
}

/// Everything the main dashboard shows in one fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_donors: i64,
    pub total_beneficiaries: i64,
    pub total_donations: i64,
    pub active_campaigns: i64,
    pub donations_by_type: Vec<TypeCount>,
    pub recent_donations: Vec<RecentDonation>,
}
