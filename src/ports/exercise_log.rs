//! Write port for logged workouts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// A validated workout entry, before storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExercise {
    pub user_id: UserId,
    pub name: String,
    pub calories_burned: f64,
    pub duration_minutes: Option<f64>,
}

/// A stored workout entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedExercise {
    pub id: i64,
    pub user_id: UserId,
    pub name: String,
    pub calories_burned: f64,
    pub duration_minutes: Option<f64>,
    pub logged_at: Timestamp,
}

/// Appends workouts to a user's activity log.
#[async_trait]
pub trait ExerciseLog: Send + Sync {
    /// Store one entry. `logged_at` is assigned by the storage clock.
    ///
    /// # Errors
    ///
    /// - `SubscriberNotFound` if the user has no subscriber record
    /// - `DatabaseError` on persistence failure
    async fn record(&self, exercise: &NewExercise) -> Result<LoggedExercise, DomainError>;
}
