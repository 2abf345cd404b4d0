//! Read port for logged workout activity.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// Totals for one user's logged exercises over a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub total_workouts: u32,
    pub total_calories_burned: f64,
}

/// Reads aggregated activity for reporting.
#[async_trait]
pub trait ActivitySummaryReader: Send + Sync {
    /// Aggregate exercises logged at or after `since`.
    async fn summarize_since(
        &self,
        user_id: &UserId,
        since: Timestamp,
    ) -> Result<ActivitySummary, DomainError>;
}
