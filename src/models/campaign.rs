use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A donation campaign. A campaign with no end date, or an end date in
/// the future, counts as active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    pub starts_at: Option<NaiveDate>,
    pub ends_at: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCampaign {
    pub name: String,
    #[serde(default)]
    pub starts_at: Option<NaiveDate>,
    #[serde(default)]
    pub ends_at: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
}
