use crate::error::{AppError, AppResult, is_foreign_key_violation};
use crate::models::{CollectionPoint, NewCollectionPoint};
use crate::utils::{validate_postal_code, validate_state};
use sqlx::SqlitePool;

fn validate_collection_point(input: &NewCollectionPoint) -> AppResult<()> {
    if input.responsible.trim().is_empty() {
        return Err(AppError::Validation(
            "Responsible person is required".to_string(),
        ));
    }
    if let Some(state) = &input.state {
        validate_state(state)?;
    }
    if let Some(postal_code) = &input.postal_code {
        validate_postal_code(postal_code)?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct CollectionPointService {
    pool: SqlitePool,
}

const COLLECTION_POINT_COLUMNS: &str =
    "id, responsible, street, number, complement, district, city, state, postal_code";

impl CollectionPointService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &NewCollectionPoint) -> AppResult<i64> {
        validate_collection_point(input)?;

        let result = sqlx::query(
            "INSERT INTO collection_points \
             (responsible, street, number, complement, district, city, state, postal_code) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.responsible)
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

    pub async fn update(&self, id: i64, input: &NewCollectionPoint) -> AppResult<()> {
        validate_collection_point(input)?;
        self.get(id).await?;

        sqlx::query(
            "UPDATE collection_points SET responsible = ?, street = ?, number = ?, \
             complement = ?, district = ?, city = ?, state = ?, postal_code = ? WHERE id = ?",
        )
        .bind(&input.responsible)
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

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM collection_points WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(r) if r.rows_affected() == 0 => {
                Err(AppError::NotFound(format!("Collection point {id} not found")))
            }
            Ok(_) => Ok(()),
            Err(e) if is_foreign_key_violation(&e) => Err(AppError::ReferentialConstraint(
                format!("Collection point {id} still has registered donations"),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, id: i64) -> AppResult<CollectionPoint> {
        sqlx::query_as::<_, CollectionPoint>(&format!(
            "SELECT {COLLECTION_POINT_COLUMNS} FROM collection_points WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Collection point {id} not found")))
    }

    pub async fn list(&self) -> AppResult<Vec<CollectionPoint>> {
        Ok(sqlx::query_as::<_, CollectionPoint>(&format!(
            "SELECT {COLLECTION_POINT_COLUMNS} FROM collection_points ORDER BY responsible"
        ))
        .fetch_all(&self.pool)
        .await?)
    }
}
