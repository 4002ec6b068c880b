use crate::error::{AppError, AppResult, is_foreign_key_violation};
use crate::models::{Beneficiary, NewBeneficiary};
use sqlx::SqlitePool;

const GENDERS: [&str; 4] = ["M", "F", "O", "N"];

fn validate_beneficiary(input: &NewBeneficiary) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if let Some(age) = input.age {
        if age < 0 {
            return Err(AppError::Validation("Age cannot be negative".to_string()));
        }
    }
    if let Some(gender) = &input.gender {
        if !GENDERS.contains(&gender.as_str()) {
            return Err(AppError::Validation(
                "Gender must be one of M, F, O or N".to_string(),
            ));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct BeneficiaryService {
    pool: SqlitePool,
}

impl BeneficiaryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &NewBeneficiary) -> AppResult<i64> {
        validate_beneficiary(input)?;

        let result = sqlx::query(
            "INSERT INTO beneficiaries (name, age, gender, description) VALUES (?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.gender)
        .bind(&input.description)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update(&self, id: i64, input: &NewBeneficiary) -> AppResult<()> {
        validate_beneficiary(input)?;
        self.get(id).await?;

        sqlx::query(
            "UPDATE beneficiaries SET name = ?, age = ?, gender = ?, description = ? WHERE id = ?",
        )
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.gender)
        .bind(&input.description)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fails with `ReferentialConstraint` while the beneficiary is still
    /// associated with distributed donations.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM beneficiaries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(r) if r.rows_affected() == 0 => {
                Err(AppError::NotFound(format!("Beneficiary {id} not found")))
            }
            Ok(_) => Ok(()),
            Err(e) if is_foreign_key_violation(&e) => Err(AppError::ReferentialConstraint(
                format!("Beneficiary {id} has received donations"),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, id: i64) -> AppResult<Beneficiary> {
        sqlx::query_as::<_, Beneficiary>(
            "SELECT id, name, age, gender, description FROM beneficiaries WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Beneficiary {id} not found")))
    }

    pub async fn list(&self) -> AppResult<Vec<Beneficiary>> {
        Ok(sqlx::query_as::<_, Beneficiary>(
            "SELECT id, name, age, gender, description FROM beneficiaries ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?)
    }
}
