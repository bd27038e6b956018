//! Error types and the process exit codes they map to.

use std::process::ExitCode;
use thiserror::Error;

/// A required setting is absent. Raised before any network activity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no GitHub users configured (set GITHUB_USERS or pass --user)")]
    MissingUsers,

    #[error("no Slack webhook URL configured (set SLACK_WEBHOOK_URL or pass --webhook-url)")]
    MissingWebhookUrl,

    #[error("no Slack channel configured (set SLACK_CHANNEL or pass --channel)")]
    MissingChannel,
}

/// Failure while retrieving a profile page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid GitHub username {0:?}")]
    InvalidUsername(String),
}

/// Failure while posting to the Slack webhook.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to reach Slack webhook: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Slack webhook returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum KusaError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl KusaError {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            KusaError::Config(ConfigError::MissingUsers) => ExitStatus::MissingUsers,
            KusaError::Config(ConfigError::MissingWebhookUrl) => ExitStatus::MissingWebhookUrl,
            KusaError::Config(ConfigError::MissingChannel) => ExitStatus::MissingChannel,
            KusaError::Fetch(_) => ExitStatus::FetchFailed,
            KusaError::Delivery(_) => ExitStatus::DeliveryFailed,
        }
    }
}

/// Process exit codes. Errors start above 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Ok = 0,
    ParseFlags = 12,
    MissingUsers = 13,
    MissingWebhookUrl = 14,
    MissingChannel = 15,
    FetchFailed = 16,
    DeliveryFailed = 17,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let all = [
            ExitStatus::Ok,
            ExitStatus::ParseFlags,
            ExitStatus::MissingUsers,
            ExitStatus::MissingWebhookUrl,
            ExitStatus::MissingChannel,
            ExitStatus::FetchFailed,
            ExitStatus::DeliveryFailed,
        ];
        let mut codes: Vec<u8> = all.iter().map(|s| s.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
        assert_eq!(ExitStatus::Ok.code(), 0);
    }

    #[test]
    fn config_errors_map_to_their_own_codes() {
        let err = KusaError::from(ConfigError::MissingChannel);
        assert_eq!(err.exit_status(), ExitStatus::MissingChannel);

        let err = KusaError::from(DeliveryError::Rejected {
            status: 404,
            body: "no_service".into(),
        });
        assert_eq!(err.exit_status(), ExitStatus::DeliveryFailed);
        assert_eq!(
            err.to_string(),
            "Slack webhook returned HTTP 404: no_service"
        );
    }
}
