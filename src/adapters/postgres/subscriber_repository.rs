//! PostgreSQL implementation of SubscriberRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::billing::{BillingCycle, Plan, PlanStatus, Subscriber, SubscriptionUpdate};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::SubscriberRepository;

/// PostgreSQL implementation of the SubscriberRepository port.
pub struct PostgresSubscriberRepository {
    pool: PgPool,
}

impl PostgresSubscriberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriberRow {
    user_id: String,
    email: Option<String>,
    username: Option<String>,
    plan: String,
    plan_status: Option<String>,
    billing_cycle: Option<String>,
    last_transaction_ref: Option<String>,
    last_transaction_id: Option<String>,
    subscription_updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<SubscriberRow> for Subscriber {
    type Error = DomainError;

    fn try_from(row: SubscriberRow) -> Result<Self, Self::Error> {
        let user_id = UserId::new(row.user_id).map_err(|e| corrupt("user_id", e))?;
        let plan: Plan = row.plan.parse().map_err(|e| corrupt("plan", e))?;
        let billing_cycle = row
            .billing_cycle
            .as_deref()
            .map(str::parse::<BillingCycle>)
            .transpose()
            .map_err(|e| corrupt("billing_cycle", e))?;

        Ok(Subscriber {
            user_id,
            email: row.email,
            username: row.username,
            plan,
            plan_status: row.plan_status.map(PlanStatus::from),
            billing_cycle,
            last_transaction_ref: row.last_transaction_ref,
            last_transaction_id: row.last_transaction_id,
            subscription_updated_at: row.subscription_updated_at.map(Timestamp::from_datetime),
        })
    }
}

fn corrupt(column: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value in subscribers: {}", column, err),
    )
}

fn db_error(action: &str, err: sqlx::Error) -> DomainError {
    DomainError::database(format!("Failed to {}: {}", action, err))
}

const SELECT_COLUMNS: &str = r#"
    SELECT user_id, email, username, plan, plan_status, billing_cycle,
           last_transaction_ref, last_transaction_id, subscription_updated_at
    FROM subscribers
"#;

#[async_trait]
impl SubscriberRepository for PostgresSubscriberRepository {
    async fn create(&self, subscriber: &Subscriber) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO subscribers (
                user_id, email, username, plan, plan_status, billing_cycle,
                last_transaction_ref, last_transaction_id, subscription_updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(subscriber.user_id.as_str())
        .bind(&subscriber.email)
        .bind(&subscriber.username)
        .bind(subscriber.plan.as_str())
        .bind(subscriber.plan_status.as_ref().map(PlanStatus::as_str))
        .bind(subscriber.billing_cycle.map(|c| c.as_str()))
        .bind(&subscriber.last_transaction_ref)
        .bind(&subscriber.last_transaction_id)
        .bind(subscriber.subscription_updated_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return DomainError::new(
                        ErrorCode::SubscriberAlreadyExists,
                        "Subscriber record already exists",
                    )
                    .with_detail("user_id", subscriber.user_id.as_str());
                }
            }
            db_error("create subscriber", e)
        })?;

        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<Subscriber>, DomainError> {
        let row: Option<SubscriberRow> =
            sqlx::query_as(&format!("{} WHERE user_id = $1", SELECT_COLUMNS))
                .bind(user_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("fetch subscriber", e))?;

        row.map(Subscriber::try_from).transpose()
    }

    async fn apply_subscription_update(
        &self,
        user_id: &UserId,
        update: &SubscriptionUpdate,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscribers SET
                plan = $2,
                plan_status = $3,
                billing_cycle = $4,
                last_transaction_ref = $5,
                last_transaction_id = $6,
                subscription_updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .bind(update.plan.as_str())
        .bind(update.plan_status.as_str())
        .bind(update.billing_cycle.as_str())
        .bind(&update.last_transaction_ref)
        .bind(&update.last_transaction_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("apply subscription update", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriberNotFound,
                "Subscriber record not found",
            )
            .with_detail("user_id", user_id.as_str()));
        }

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Subscriber>, DomainError> {
        let rows: Vec<SubscriberRow> =
            sqlx::query_as(&format!("{} ORDER BY user_id", SELECT_COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("list subscribers", e))?;

        rows.into_iter().map(Subscriber::try_from).collect()
    }
}
