//! PostgreSQL implementation of ExerciseLog.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::ports::{ExerciseLog, LoggedExercise, NewExercise};

pub struct PostgresExerciseLog {
    pool: PgPool,
}

impl PostgresExerciseLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InsertedRow {
    id: i64,
    logged_at: DateTime<Utc>,
}

#[async_trait]
impl ExerciseLog for PostgresExerciseLog {
    async fn record(&self, exercise: &NewExercise) -> Result<LoggedExercise, DomainError> {
        let row: InsertedRow = sqlx::query_as(
            r#"
            INSERT INTO exercises (user_id, name, calories_burned, duration_minutes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, logged_at
            "#,
        )
        .bind(exercise.user_id.as_str())
        .bind(&exercise.name)
        .bind(exercise.calories_burned)
        .bind(exercise.duration_minutes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return DomainError::new(
                        ErrorCode::SubscriberNotFound,
                        "Subscriber record not found",
                    )
                    .with_detail("user_id", exercise.user_id.as_str());
                }
            }
            DomainError::database(format!("Failed to log exercise: {}", e))
        })?;

        Ok(LoggedExercise {
            id: row.id,
            user_id: exercise.user_id.clone(),
            name: exercise.name.clone(),
            calories_burned: exercise.calories_burned,
            duration_minutes: exercise.duration_minutes,
            logged_at: Timestamp::from_datetime(row.logged_at),
        })
    }
}
