use crate::error::{AppError, AppResult, is_foreign_key_violation};
use crate::models::{Campaign, NewCampaign};
use sqlx::SqlitePool;

fn validate_campaign(input: &NewCampaign) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if let Some(starts) = input.starts_at {
        if let Some(ends) = input.ends_at {
            if ends < starts {
                return Err(AppError::Validation(
                    "End date cannot be earlier than the start date".to_string(),
                ));
            }
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct CampaignService {
    pool: SqlitePool,
}

impl CampaignService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &NewCampaign) -> AppResult<i64> {
        validate_campaign(input)?;

        let result = sqlx::query(
            "INSERT INTO campaigns (name, starts_at, ends_at, description) VALUES (?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(&input.description)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update(&self, id: i64, input: &NewCampaign) -> AppResult<()> {
        validate_campaign(input)?;
        self.get(id).await?;

        sqlx::query(
            "UPDATE campaigns SET name = ?, starts_at = ?, ends_at = ?, description = ? \
             WHERE id = ?",
        )
        .bind(&input.name)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(&input.description)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(r) if r.rows_affected() == 0 => {
                Err(AppError::NotFound(format!("Campaign {id} not found")))
            }
            Ok(_) => Ok(()),
            Err(e) if is_foreign_key_violation(&e) => Err(AppError::ReferentialConstraint(
                format!("Campaign {id} still has registered donations"),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, id: i64) -> AppResult<Campaign> {
        sqlx::query_as::<_, Campaign>(
            "SELECT id, name, starts_at, ends_at, description FROM campaigns WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Campaign {id} not found")))
    }

    pub async fn list(&self) -> AppResult<Vec<Campaign>> {
        Ok(sqlx::query_as::<_, Campaign>(
            "SELECT id, name, starts_at, ends_at, description FROM campaigns ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Campaigns that have not yet ended. An open-ended campaign is
    /// always active.
    pub async fn list_active(&self) -> AppResult<Vec<Campaign>> {
        Ok(sqlx::query_as::<_, Campaign>(
            "SELECT id, name, starts_at, ends_at, description FROM campaigns \
             WHERE ends_at IS NULL OR ends_at >= date('now') ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?)
    }
}
