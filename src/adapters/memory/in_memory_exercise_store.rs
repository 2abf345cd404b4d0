//! In-memory workout log for tests and local development.
//!
//! Implements both the write side (`ExerciseLog`) and the report read side
//! (`ActivitySummaryReader`) over the same entries.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::InMemorySubscriberRepository;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{
    ActivitySummary, ActivitySummaryReader, ExerciseLog, LoggedExercise, NewExercise,
    SubscriberRepository,
};

#[derive(Debug, Default)]
struct StoreState {
    entries: Vec<LoggedExercise>,
    fixed_summaries: HashMap<String, ActivitySummary>,
}

/// Workout entries held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExerciseStore {
    state: Arc<RwLock<StoreState>>,
    subscribers: Option<InMemorySubscriberRepository>,
}

impl InMemoryExerciseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject entries for users without a record in `subscribers`, like the
    /// SQL foreign key does.
    pub fn with_subscribers(mut self, subscribers: InMemorySubscriberRepository) -> Self {
        self.subscribers = Some(subscribers);
        self
    }

    /// Pin the summary returned for `user_id`, ignoring logged entries.
    pub async fn set_summary(&self, user_id: &UserId, summary: ActivitySummary) {
        self.state
            .write()
            .await
            .fixed_summaries
            .insert(user_id.to_string(), summary);
    }

    /// Every stored entry, in insertion order.
    pub async fn entries(&self) -> Vec<LoggedExercise> {
        self.state.read().await.entries.clone()
    }
}

#[async_trait]
impl ExerciseLog for InMemoryExerciseStore {
    async fn record(&self, exercise: &NewExercise) -> Result<LoggedExercise, DomainError> {
        if let Some(subscribers) = &self.subscribers {
            if subscribers.find_by_user_id(&exercise.user_id).await?.is_none() {
                return Err(DomainError::new(
                    ErrorCode::SubscriberNotFound,
                    format!("Subscriber {} not found", exercise.user_id),
                ));
            }
        }

        let mut state = self.state.write().await;
        let logged = LoggedExercise {
            id: state.entries.len() as i64 + 1,
            user_id: exercise.user_id.clone(),
            name: exercise.name.clone(),
            calories_burned: exercise.calories_burned,
            duration_minutes: exercise.duration_minutes,
            logged_at: Timestamp::now(),
        };
        state.entries.push(logged.clone());
        Ok(logged)
    }
}

#[async_trait]
impl ActivitySummaryReader for InMemoryExerciseStore {
    async fn summarize_since(
        &self,
        user_id: &UserId,
        since: Timestamp,
    ) -> Result<ActivitySummary, DomainError> {
        let state = self.state.read().await;
        if let Some(fixed) = state.fixed_summaries.get(user_id.as_str()) {
            return Ok(*fixed);
        }

        let summary = state
            .entries
            .iter()
            .filter(|e| &e.user_id == user_id && !e.logged_at.is_before(&since))
            .fold(ActivitySummary::default(), |mut acc, e| {
                acc.total_workouts += 1;
                acc.total_calories_burned += e.calories_burned;
                acc
            });
        Ok(summary)
    }
}
