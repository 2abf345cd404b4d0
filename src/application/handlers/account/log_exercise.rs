//! LogExerciseHandler - appends a workout to the caller's activity log.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{ExerciseLog, LoggedExercise, NewExercise};

/// Longest accepted exercise name, in characters.
pub const MAX_EXERCISE_NAME_LEN: usize = 100;

/// Command to log one workout. Fields are loose; the handler validates them.
#[derive(Debug, Clone, PartialEq)]
pub struct LogExerciseCommand {
    pub user_id: UserId,
    pub name: Option<String>,
    /// Defaults to zero when absent.
    pub calories_burned: Option<f64>,
    pub duration_minutes: Option<f64>,
}

/// Handler for workout logging.
pub struct LogExerciseHandler {
    log: Arc<dyn ExerciseLog>,
}

impl LogExerciseHandler {
    pub fn new(log: Arc<dyn ExerciseLog>) -> Self {
        Self { log }
    }

    /// # Errors
    ///
    /// - `ValidationFailed` for a blank or overlong name, negative or
    ///   non-finite calories, or a non-positive duration
    /// - `SubscriberNotFound` if the caller has no subscriber record
    /// - `DatabaseError` on persistence failure
    pub async fn handle(&self, cmd: LogExerciseCommand) -> Result<LoggedExercise, DomainError> {
        let exercise = validate(cmd)?;
        let logged = self.log.record(&exercise).await?;

        tracing::info!(
            user_id = %logged.user_id,
            exercise_id = logged.id,
            calories_burned = logged.calories_burned,
            "Exercise logged"
        );
        Ok(logged)
    }
}

fn validate(cmd: LogExerciseCommand) -> Result<NewExercise, DomainError> {
    let name = cmd.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(DomainError::validation("name", "Exercise name is required."));
    }
    if name.chars().count() > MAX_EXERCISE_NAME_LEN {
        return Err(DomainError::validation(
            "name",
            format!(
                "Exercise name must be at most {} characters.",
                MAX_EXERCISE_NAME_LEN
            ),
        ));
    }

    let calories_burned = cmd.calories_burned.unwrap_or(0.0);
    if !calories_burned.is_finite() || calories_burned < 0.0 {
        return Err(DomainError::validation(
            "caloriesBurned",
            "Calories burned must be a non-negative number.",
        ));
    }

    if let Some(minutes) = cmd.duration_minutes {
        if !minutes.is_finite() || minutes <= 0.0 {
            return Err(DomainError::validation(
                "durationMinutes",
                "Duration must be a positive number of minutes.",
            ));
        }
    }

    Ok(NewExercise {
        user_id: cmd.user_id,
        name: name.to_string(),
        calories_burned,
        duration_minutes: cmd.duration_minutes,
    })
}
