//! In-memory subscriber repository.
//!
//! Useful for testing and local development. Per-record updates happen
//! under a single write lock, so they are atomic like the SQL adapter's.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::billing::{Subscriber, SubscriptionUpdate};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::SubscriberRepository;

/// In-memory storage for subscriber records.
#[derive(Debug, Clone, Default)]
pub struct InMemorySubscriberRepository {
    records: Arc<RwLock<BTreeMap<String, Subscriber>>>,
    update_count: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl InMemorySubscriberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with records.
    pub async fn with_subscribers(subscribers: impl IntoIterator<Item = Subscriber>) -> Self {
        let repo = Self::new();
        {
            let mut records = repo.records.write().await;
            for s in subscribers {
                records.insert(s.user_id.to_string(), s);
            }
        }
        repo
    }

    /// Make every subsequent write fail with `DatabaseError`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `find_by_user_id` fail with `DatabaseError`.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of subscription updates applied so far.
    pub fn update_count(&self) -> usize {
        self.update_count.load(Ordering::SeqCst)
    }

    /// Copy of every stored record.
    pub async fn snapshot(&self) -> Vec<Subscriber> {
        self.records.read().await.values().cloned().collect()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::database("Simulated write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriberRepository for InMemorySubscriberRepository {
    async fn create(&self, subscriber: &Subscriber) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut records = self.records.write().await;
        let key = subscriber.user_id.to_string();
        if records.contains_key(&key) {
            return Err(DomainError::new(
                ErrorCode::SubscriberAlreadyExists,
                format!("Subscriber {} already exists", key),
            ));
        }
        records.insert(key, subscriber.clone());
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<Subscriber>, DomainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::database("Simulated read failure"));
        }
        Ok(self.records.read().await.get(user_id.as_str()).cloned())
    }

    async fn apply_subscription_update(
        &self,
        user_id: &UserId,
        update: &SubscriptionUpdate,
    ) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut records = self.records.write().await;
        let record = records.get_mut(user_id.as_str()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::SubscriberNotFound,
                format!("Subscriber {} not found", user_id),
            )
        })?;
        record.apply(update, Timestamp::now());
        self.update_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Subscriber>, DomainError> {
        Ok(self.snapshot().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::{BillingCycle, Plan};

    fn subscriber(id: &str) -> Subscriber {
        Subscriber::new(UserId::new(id).unwrap(), Some(format!("{}@example.com", id)))
    }

    #[tokio::test]
    async fn create_then_find() {
        let repo = InMemorySubscriberRepository::new();
        repo.create(&subscriber("u1")).await.unwrap();

        let found = repo
            .find_by_user_id(&UserId::new("u1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.plan, Plan::Free);
    }

    #[tokio::test]
    async fn create_rejects_duplicates() {
        let repo = InMemorySubscriberRepository::new();
        repo.create(&subscriber("u1")).await.unwrap();

        let err = repo.create(&subscriber("u1")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SubscriberAlreadyExists);
    }

    #[tokio::test]
    async fn update_touches_only_the_addressed_record() {
        let repo =
            InMemorySubscriberRepository::with_subscribers([subscriber("u1"), subscriber("u2")])
                .await;
        let update = SubscriptionUpdate::activate_premium(BillingCycle::Monthly, "r1", None);

        repo.apply_subscription_update(&UserId::new("u1").unwrap(), &update)
            .await
            .unwrap();

        let all = repo.list_all().await.unwrap();
        let u1 = all.iter().find(|s| s.user_id.as_str() == "u1").unwrap();
        let u2 = all.iter().find(|s| s.user_id.as_str() == "u2").unwrap();
        assert!(u1.is_entitled());
        assert!(u1.subscription_updated_at.is_some());
        assert_eq!(u2, &subscriber("u2"));
        assert_eq!(repo.update_count(), 1);
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let repo = InMemorySubscriberRepository::new();
        let update = SubscriptionUpdate::activate_premium(BillingCycle::Yearly, "r1", None);

        let err = repo
            .apply_subscription_update(&UserId::new("ghost").unwrap(), &update)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(repo.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn simulated_read_failure_leaves_writes_working() {
        let repo = InMemorySubscriberRepository::with_subscribers([subscriber("u1")]).await;
        repo.fail_reads(true);
        let id = UserId::new("u1").unwrap();

        let err = repo.find_by_user_id(&id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);

        let update = SubscriptionUpdate::activate_premium(BillingCycle::Monthly, "r1", None);
        repo.apply_subscription_update(&id, &update).await.unwrap();
        assert_eq!(repo.update_count(), 1);
    }

    #[tokio::test]
    async fn simulated_failure_blocks_writes() {
        let repo = InMemorySubscriberRepository::with_subscribers([subscriber("u1")]).await;
        repo.fail_writes(true);
        let update = SubscriptionUpdate::activate_premium(BillingCycle::Yearly, "r1", None);

        let err = repo
            .apply_subscription_update(&UserId::new("u1").unwrap(), &update)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(repo.update_count(), 0);
    }
}
