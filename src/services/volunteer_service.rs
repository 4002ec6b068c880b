use crate::error::{AppError, AppResult, is_foreign_key_violation};
use crate::models::{NewVolunteer, Volunteer};
use crate::utils::validate_email;
use sqlx::SqlitePool;

fn validate_volunteer(input: &NewVolunteer) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct VolunteerService {
    pool: SqlitePool,
}

impl VolunteerService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &NewVolunteer) -> AppResult<i64> {
        validate_volunteer(input)?;

        let result = sqlx::query("INSERT INTO volunteers (name, email, phone) VALUES (?, ?, ?)")
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update(&self, id: i64, input: &NewVolunteer) -> AppResult<()> {
        validate_volunteer(input)?;
        self.get(id).await?;

        sqlx::query("UPDATE volunteers SET name = ?, email = ?, phone = ? WHERE id = ?")
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Fails with `ReferentialConstraint` while the volunteer is still
    /// referenced by a donation or a delivery.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM volunteers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(r) if r.rows_affected() == 0 => {
                Err(AppError::NotFound(format!("Volunteer {id} not found")))
            }
            Ok(_) => Ok(()),
            Err(e) if is_foreign_key_violation(&e) => Err(AppError::ReferentialConstraint(
                format!("Volunteer {id} is still assigned to donations"),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, id: i64) -> AppResult<Volunteer> {
        sqlx::query_as::<_, Volunteer>("SELECT id, name, email, phone FROM volunteers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Volunteer {id} not found")))
    }

    pub async fn list(&self) -> AppResult<Vec<Volunteer>> {
        Ok(sqlx::query_as::<_, Volunteer>(
            "SELECT id, name, email, phone FROM volunteers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?)
    }
}
