use serde::{Deserialize, Serialize};

/// A person who receives donations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Beneficiary {
    pub id: i64,
    pub name: String,
    pub age: Option<i64>,
    /// One of "M", "F", "O" or "N" when present.
    pub gender: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewBeneficiary {
    pub name: String,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
