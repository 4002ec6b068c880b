use crate::error::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a donated item. The string values are the ones callers and
/// the store exchange; they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum DonationType {
    #[serde(rename = "Alimentos")]
    #[sqlx(rename = "Alimentos")]
    Food,
    #[serde(rename = "Roupas")]
    #[sqlx(rename = "Roupas")]
    Clothing,
    #[serde(rename = "Medicamentos")]
    #[sqlx(rename = "Medicamentos")]
    Medicine,
    #[serde(rename = "Dinheiro")]
    #[sqlx(rename = "Dinheiro")]
    Money,
    #[serde(rename = "Outros")]
    #[sqlx(rename = "Outros")]
    Other,
}

impl DonationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationType::Food => "Alimentos",
            DonationType::Clothing => "Roupas",
            DonationType::Medicine => "Medicamentos",
            DonationType::Money => "Dinheiro",
            DonationType::Other => "Outros",
        }
    }
}

impl fmt::Display for DonationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DonationType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Alimentos" => Ok(DonationType::Food),
            "Roupas" => Ok(DonationType::Clothing),
            "Medicamentos" => Ok(DonationType::Medicine),
            "Dinheiro" => Ok(DonationType::Money),
            "Outros" => Ok(DonationType::Other),
            other => Err(AppError::Validation(format!(
                "Unknown donation type: {other}"
            ))),
        }
    }
}

/// Measurement unit for the donated quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum Unit {
    #[serde(rename = "Kg")]
    #[sqlx(rename = "Kg")]
    Kilograms,
    #[serde(rename = "Litros")]
    #[sqlx(rename = "Litros")]
    Liters,
    #[serde(rename = "Unidades")]
    #[sqlx(rename = "Unidades")]
    Units,
    #[serde(rename = "Caixas")]
    #[sqlx(rename = "Caixas")]
    Boxes,
    #[serde(rename = "R$")]
    #[sqlx(rename = "R$")]
    Currency,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kilograms => "Kg",
            Unit::Liters => "Litros",
            Unit::Units => "Unidades",
            Unit::Boxes => "Caixas",
            Unit::Currency => "R$",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Kg" => Ok(Unit::Kilograms),
            "Litros" => Ok(Unit::Liters),
            "Unidades" => Ok(Unit::Units),
            "Caixas" => Ok(Unit::Boxes),
            "R$" => Ok(Unit::Currency),
            other => Err(AppError::Validation(format!("Unknown unit: {other}"))),
        }
    }
}

/// Lifecycle state of a donation. Derived from the beneficiary
/// association: a donation with at least one beneficiary is distributed,
/// otherwise it is received. Never written directly by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum DonationStatus {
    #[serde(rename = "Recebida")]
    #[sqlx(rename = "Recebida")]
    Received,
    #[serde(rename = "Distribuída")]
    #[sqlx(rename = "Distribuída")]
    Distributed,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Received => "Recebida",
            DonationStatus::Distributed => "Distribuída",
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DonationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Recebida" => Ok(DonationStatus::Received),
            "Distribuída" => Ok(DonationStatus::Distributed),
            other => Err(AppError::Validation(format!("Unknown status: {other}"))),
        }
    }
}

/// A persisted donation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Donation {
    pub id: i64,
    pub donor_id: i64,
    pub collection_point_id: i64,
    pub receiving_volunteer_id: i64,
    pub campaign_id: Option<i64>,
    pub donation_type: DonationType,
    pub item_description: String,
    pub quantity: f64,
    pub unit: Unit,
    pub notes: Option<String>,
    pub created_at: NaiveDate,
    pub delivered_at: Option<NaiveDate>,
    pub status: DonationStatus,
}

/// Caller-supplied donation fields, used for both create and update.
/// Carries no id and no status: ids are generated by the store and status
/// is owned by the distribution workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationInput {
    pub donor_id: i64,
    pub collection_point_id: i64,
    pub receiving_volunteer_id: i64,
    #[serde(default)]
    pub campaign_id: Option<i64>,
    pub donation_type: DonationType,
    pub item_description: String,
    pub quantity: f64,
    pub unit: Unit,
    #[serde(default)]
    pub notes: Option<String>,
    /// Defaults to today when omitted.
    #[serde(default)]
    pub created_at: Option<NaiveDate>,
    #[serde(default)]
    pub delivered_at: Option<NaiveDate>,
}

/// Arguments for distributing a donation to beneficiaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionRequest {
    pub beneficiary_ids: Vec<i64>,
    #[serde(default)]
    pub volunteer_ids: Vec<i64>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
}

/// Confirmation returned by a successful distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionOutcome {
    pub donation_id: i64,
    pub beneficiaries: usize,
    pub volunteers: usize,
    pub status: DonationStatus,
}
