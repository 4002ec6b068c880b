use crate::error::{AppError, AppResult, is_foreign_key_violation};
use crate::models::{Donor, NewDonor};
use crate::utils::{validate_email, validate_postal_code, validate_state};
use sqlx::SqlitePool;

const DONOR_COLUMNS: &str = "id, name, phone, email, street, number, complement, district, \
     city, state, postal_code";

fn validate_donor(input: &NewDonor) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    if let Some(state) = &input.state {
        validate_state(state)?;
    }
    if let Some(cep) = &input.postal_code {
        validate_postal_code(cep)?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct DonorService {
    pool: SqlitePool,
}

impl DonorService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &NewDonor) -> AppResult<i64> {
        validate_donor(input)?;

        let result = sqlx::query(
            r#"
            INSERT INTO donors (name, phone, email, street, number, complement,
                                district, city, state, postal_code)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.street)
        .bind(&input.number)
        .bind(&input.complement)
        .bind(&input.district)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.postal_code)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update(&self, id: i64, input: &NewDonor) -> AppResult<()> {
        validate_donor(input)?;
        self.get(id).await?;

        sqlx::query(
            r#"
            UPDATE donors SET name = ?, phone = ?, email = ?, street = ?, number = ?,
                              complement = ?, district = ?, city = ?, state = ?, postal_code = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.street)
        .bind(&input.number)
        .bind(&input.complement)
        .bind(&input.district)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.postal_code)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fails with `ReferentialConstraint` while donations still reference
    /// this donor, so callers can show a specific message.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM donors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(r) if r.rows_affected() == 0 => {
                Err(AppError::NotFound(format!("Donor {id} not found")))
            }
            Ok(_) => Ok(()),
            Err(e) if is_foreign_key_violation(&e) => Err(AppError::ReferentialConstraint(
                format!("Donor {id} still has registered donations"),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, id: i64) -> AppResult<Donor> {
        let query = format!("SELECT {DONOR_COLUMNS} FROM donors WHERE id = ?");
        sqlx::query_as::<_, Donor>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Donor {id} not found")))
    }

    pub async fn list(&self) -> AppResult<Vec<Donor>> {
        let query = format!("SELECT {DONOR_COLUMNS} FROM donors ORDER BY name");
        Ok(sqlx::query_as::<_, Donor>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn search_by_name(&self, name: &str) -> AppResult<Vec<Donor>> {
        let query = format!("SELECT {DONOR_COLUMNS} FROM donors WHERE name LIKE ? ORDER BY name");
        Ok(sqlx::query_as::<_, Donor>(&query)
            .bind(format!("%{name}%"))
            .fetch_all(&self.pool)
            .await?)
    }
}
