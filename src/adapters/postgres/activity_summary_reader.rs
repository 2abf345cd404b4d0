//! PostgreSQL implementation of ActivitySummaryReader.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::ports::{ActivitySummary, ActivitySummaryReader};

pub struct PostgresActivitySummaryReader {
    pool: PgPool,
}

impl PostgresActivitySummaryReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    total_workouts: i64,
    total_calories_burned: f64,
}

#[async_trait]
impl ActivitySummaryReader for PostgresActivitySummaryReader {
    async fn summarize_since(
        &self,
        user_id: &UserId,
        since: Timestamp,
    ) -> Result<ActivitySummary, DomainError> {
        let row: SummaryRow = sqlx::query_as(
            r#"
            SELECT COUNT(*) AS total_workouts,
                   COALESCE(SUM(calories_burned), 0)::DOUBLE PRECISION AS total_calories_burned
            FROM exercises
            WHERE user_id = $1 AND logged_at >= $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(since.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to summarize activity: {}", e)))?;

        Ok(ActivitySummary {
            total_workouts: u32::try_from(row.total_workouts).unwrap_or(u32::MAX),
            total_calories_burned: row.total_calories_burned,
        })
    }
}
