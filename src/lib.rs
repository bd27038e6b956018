pub mod calendar;
pub mod config;
pub mod error;
pub mod github;
pub mod kusa;
pub mod logging;
pub mod server;
pub mod slack;
pub mod stats;

pub use config::{Cli, Config, SlackConfig};
pub use error::{ConfigError, DeliveryError, ExitStatus, FetchError, KusaError};
pub use github::GithubClient;
pub use kusa::{BatchReport, ContributionSource, Kusa, NotificationStatus, Notifier};
pub use slack::SlackNotifier;
pub use stats::{ContributionDay, ContributionStats};
