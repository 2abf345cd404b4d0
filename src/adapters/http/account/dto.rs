//! Request and response bodies for account endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::account::{ProvisionSubscriberResult, SendWelcomeEmailCommand};
use crate::domain::billing::{BillingCycle, Plan, PlanStatus};
use crate::ports::LoggedExercise;

/// Body of `POST /api/account/subscriber`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberResponse {
    pub user_id: String,
    pub plan: Plan,
    pub plan_status: Option<PlanStatus>,
    pub billing_cycle: Option<BillingCycle>,
    pub entitled: bool,
    pub created: bool,
}

impl From<ProvisionSubscriberResult> for SubscriberResponse {
    fn from(result: ProvisionSubscriberResult) -> Self {
        let entitled = result.subscriber.is_entitled();
        let s = result.subscriber;
        Self {
            user_id: s.user_id.to_string(),
            plan: s.plan,
            plan_status: s.plan_status,
            billing_cycle: s.billing_cycle,
            entitled,
            created: result.created,
        }
    }
}

/// Body of `POST /api/account/welcome-email`. Both fields fall back to the
/// caller's identity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WelcomeEmailRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<WelcomeEmailRequest> for SendWelcomeEmailCommand {
    fn from(req: WelcomeEmailRequest) -> Self {
        Self {
            email: req.email,
            name: req.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of `POST /api/account/exercises`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogExerciseRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub calories_burned: Option<f64>,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResponse {
    pub id: i64,
    pub name: String,
    pub calories_burned: f64,
    pub duration_minutes: Option<f64>,
    pub logged_at: String,
}

impl From<LoggedExercise> for ExerciseResponse {
    fn from(logged: LoggedExercise) -> Self {
        Self {
            id: logged.id,
            name: logged.name,
            calories_burned: logged.calories_burned,
            duration_minutes: logged.duration_minutes,
            logged_at: logged.logged_at.as_datetime().to_rfc3339(),
        }
    }
}
