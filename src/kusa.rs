//! kusa.rs
//!
//! Batch driver: for each user, scrape the calendar, compute stats and send
//! a notification.
//!
//! A failure for one user does not stop the batch. Every user is attempted
//! and the outcome of each is collected into a [`BatchReport`], whose exit
//! status is that of the first failure.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{DeliveryError, ExitStatus, FetchError, KusaError};
use crate::stats::{self, ContributionDay, ContributionStats};

/// Anything that can produce a user's contribution calendar.
#[async_trait]
pub trait ContributionSource: Send + Sync {
    async fn contributions(&self, username: &str) -> Result<Vec<ContributionDay>, FetchError>;
}

/// A sink for computed statuses.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, status: &NotificationStatus) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationStatus {
    pub user: String,
    pub stats: ContributionStats,
}

#[derive(Debug)]
pub struct UserReport {
    pub user: String,
    pub outcome: Result<ContributionStats, KusaError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub reports: Vec<UserReport>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &KusaError)> {
        self.reports
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|e| (r.user.as_str(), e)))
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// `Ok` when every user succeeded, otherwise the status of the first failure.
    pub fn exit_status(&self) -> ExitStatus {
        self.failures()
            .next()
            .map(|(_, e)| e.exit_status())
            .unwrap_or(ExitStatus::Ok)
    }
}

pub struct Kusa<S, N> {
    source: S,
    notifier: N,
}

impl<S, N> Kusa<S, N>
where
    S: ContributionSource,
    N: Notifier,
{
    pub fn new(source: S, notifier: N) -> Self {
        Self { source, notifier }
    }

    /// Scrape and compute without notifying.
    pub async fn status(
        &self,
        user: &str,
        today: NaiveDate,
    ) -> Result<NotificationStatus, FetchError> {
        let days = self.source.contributions(user).await?;
        if days.is_empty() {
            tracing::warn!(user, "no contribution calendar found on profile page");
        }

        Ok(NotificationStatus {
            user: user.to_string(),
            stats: stats::compute(&days, today),
        })
    }

    async fn process(&self, user: &str, today: NaiveDate) -> Result<ContributionStats, KusaError> {
        let status = self.status(user, today).await?;
        tracing::debug!(user, stats = ?status.stats, "computed contribution stats");

        self.notifier.notify(&status).await?;
        Ok(status.stats)
    }

    /// Process `users` one after another, continuing past failures.
    pub async fn run(&self, users: &[String], today: NaiveDate) -> BatchReport {
        let mut report = BatchReport::default();

        for user in users {
            let outcome = self.process(user, today).await;
            match &outcome {
                Ok(stats) => tracing::info!(
                    user = user.as_str(),
                    today = stats.latest_count,
                    streak = stats.current_streak,
                    "notified"
                ),
                // Callers report failures from the returned report.
                Err(e) => tracing::debug!(user = user.as_str(), "failed: {e}"),
            }
            report.reports.push(UserReport {
                user: user.clone(),
                outcome,
            });
        }

        report
    }
}
