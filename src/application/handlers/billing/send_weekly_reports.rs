//! SendWeeklyReportsHandler - emails a 7-day activity summary to every
//! entitled subscriber.
//!
//! Per-user failures are collected and never abort the run.

use std::sync::Arc;

use crate::domain::billing::Subscriber;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::ports::{
    escape_html, ActivitySummary, ActivitySummaryReader, EmailSender, OutgoingEmail,
    SubscriberRepository,
};

/// Length of the reporting window.
pub const REPORT_WINDOW_DAYS: i64 = 7;

pub const REPORT_SUBJECT: &str = "Your Weekly Fitness Summary";

/// A user whose report could not be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFailure {
    pub user_id: String,
    pub error: String,
}

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyReportSummary {
    pub processed: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failures: Vec<ReportFailure>,
}

/// Handler for the weekly report batch job.
pub struct SendWeeklyReportsHandler {
    subscribers: Arc<dyn SubscriberRepository>,
    activity: Arc<dyn ActivitySummaryReader>,
    email: Arc<dyn EmailSender>,
}

impl SendWeeklyReportsHandler {
    pub fn new(
        subscribers: Arc<dyn SubscriberRepository>,
        activity: Arc<dyn ActivitySummaryReader>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            subscribers,
            activity,
            email,
        }
    }

    /// # Errors
    ///
    /// - `InternalError` if no email provider is configured
    /// - `DatabaseError` if the subscriber list cannot be read
    pub async fn run(&self, now: Timestamp) -> Result<WeeklyReportSummary, DomainError> {
        tracing::info!(at = %now.as_datetime(), "Starting weekly fitness report job");

        if !self.email.is_configured() {
            tracing::error!("Email provider not configured; aborting weekly report job");
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Email provider not configured",
            ));
        }

        let subscribers = self.subscribers.list_all().await.map_err(|e| {
            tracing::error!(error = %e, "Could not list subscribers for weekly reports");
            e
        })?;

        let since = now.minus_days(REPORT_WINDOW_DAYS);
        let mut summary = WeeklyReportSummary::default();

        for subscriber in &subscribers {
            summary.processed += 1;
            let user_id = subscriber.user_id.to_string();

            let Some(email) = subscriber.email.as_deref().filter(|e| !e.trim().is_empty()) else {
                tracing::warn!(user_id = %user_id, "Subscriber has no email; skipping report");
                summary.skipped += 1;
                continue;
            };

            if !subscriber.is_entitled() {
                tracing::info!(user_id = %user_id, "Subscriber not premium/active; skipping report");
                summary.skipped += 1;
                continue;
            }

            match self.send_one(subscriber, email, since).await {
                Ok(()) => {
                    tracing::info!(user_id = %user_id, "Weekly report sent");
                    summary.sent += 1;
                }
                Err(e) => {
                    tracing::error!(user_id = %user_id, error = %e, "Weekly report failed");
                    summary.failures.push(ReportFailure {
                        user_id,
                        error: e.message,
                    });
                }
            }
        }

        tracing::info!(
            processed = summary.processed,
            sent = summary.sent,
            skipped = summary.skipped,
            errors = summary.failures.len(),
            "Weekly report job finished"
        );
        if !summary.failures.is_empty() {
            tracing::error!(failures = ?summary.failures, "Errors during weekly report generation");
        }

        Ok(summary)
    }

    async fn send_one(
        &self,
        subscriber: &Subscriber,
        email: &str,
        since: Timestamp,
    ) -> Result<(), DomainError> {
        let activity = self
            .activity
            .summarize_since(&subscriber.user_id, since)
            .await?;
        let message = render_report(email, subscriber.username.as_deref(), &activity);
        self.email.send(&message).await
    }
}

/// Builds the report email.
pub fn render_report(to: &str, name: Option<&str>, activity: &ActivitySummary) -> OutgoingEmail {
    let name = name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("Fitness Enthusiast");
    let calories = activity.total_calories_burned.round();
    let html = format!(
        "<h1>Hi {name},</h1>\
         <p>Here's your fitness summary for the past week:</p>\
         <ul>\
         <li>Total Workouts: {workouts}</li>\
         <li>Total Calories Burned: {calories} kcal</li>\
         </ul>\
         <p>Keep up the great work!</p>\
         <p>Best,</p>\
         <p>The WeightWise App Team</p>",
        name = escape_html(name),
        workouts = activity.total_workouts,
        calories = calories,
    );
    let text = format!(
        "Hi {name},\n\
         Here's your fitness summary for the past week:\n\
         - Total Workouts: {workouts}\n\
         - Total Calories Burned: {calories} kcal\n\
         Keep up the great work!\n\
         Best,\n\
         The WeightWise App Team\n",
        name = name,
        workouts = activity.total_workouts,
        calories = calories,
    );
    OutgoingEmail {
        to: to.to_string(),
        subject: REPORT_SUBJECT.to_string(),
        html,
        text,
    }
}
