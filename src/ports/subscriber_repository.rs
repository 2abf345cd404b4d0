//! Subscriber repository port.
//!
//! One record per user, keyed by `UserId`. Every write touches exactly the
//! addressed record.

use async_trait::async_trait;

use crate::domain::billing::{Subscriber, SubscriptionUpdate};
use crate::domain::foundation::{DomainError, UserId};

/// Repository port for subscriber records.
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Insert the record created at signup.
    ///
    /// # Errors
    ///
    /// - `SubscriberAlreadyExists` if the user already has a record
    /// - `DatabaseError` on persistence failure
    async fn create(&self, subscriber: &Subscriber) -> Result<(), DomainError>;

    /// Find a record by user ID. Returns `None` if it does not exist.
    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<Subscriber>, DomainError>;

    /// Apply a subscription update as one atomic multi-field write.
    ///
    /// The storage layer stamps `subscription_updated_at` with its own clock.
    /// The record's prior state is not consulted.
    ///
    /// # Errors
    ///
    /// - `SubscriberNotFound` if no record exists for `user_id`
    /// - `DatabaseError` on persistence failure
    async fn apply_subscription_update(
        &self,
        user_id: &UserId,
        update: &SubscriptionUpdate,
    ) -> Result<(), DomainError>;

    /// All records, ordered by user ID. Used by batch jobs only.
    async fn list_all(&self) -> Result<Vec<Subscriber>, DomainError>;
}
