use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::SlackConfig;
use crate::error::DeliveryError;
use crate::github;
use crate::kusa::{NotificationStatus, Notifier};
use crate::stats::ContributionStats;

const COLOR_GOOD: &str = "good";
const COLOR_DANGER: &str = "danger";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl Field {
    fn new(title: &str, value: String, short: bool) -> Self {
        Self {
            title: title.to_string(),
            value,
            short,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
    pub text: String,
    pub fields: Vec<Field>,
}

/// Body of an incoming-webhook POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub channel: String,
    pub username: String,
    pub icon_emoji: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub attachments: Vec<Attachment>,
}

pub struct SlackNotifier {
    config: SlackConfig,
    http: Client,
}

impl SlackNotifier {
    pub fn new(config: SlackConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Build the message for `status`. Icon and color follow whether there
    /// was any contribution on the latest day.
    pub fn payload(&self, status: &NotificationStatus) -> Payload {
        let cfg = &self.config;
        let stats = &status.stats;

        let (color, icon, contributions) = if stats.latest_count > 0 {
            (COLOR_GOOD, &cfg.icon_emoji, self.render_count(stats.latest_count))
        } else {
            (
                COLOR_DANGER,
                &cfg.icon_emoji_no_contributions,
                cfg.msg_no_contributions.clone(),
            )
        };

        let mut fields = vec![Field::new("Contributions", contributions, false)];
        fields.extend(summary_fields(stats));

        Payload {
            channel: cfg.channel.clone(),
            username: cfg.bot_name.clone(),
            icon_emoji: icon.clone(),
            text: None,
            attachments: vec![Attachment {
                color: color.to_string(),
                title: Some(status.user.clone()),
                title_link: Some(github::profile_url(&cfg.github_url, &status.user)),
                text: format!("{}'s contributions", status.user),
                fields,
            }],
        }
    }

    fn render_count(&self, count: u32) -> String {
        if count > self.config.glyph_limit {
            format!("{count} contributions")
        } else {
            self.config.contribution_glyph.repeat(count as usize)
        }
    }

    pub async fn post(&self, payload: &Payload) -> Result<(), DeliveryError> {
        let resp = self
            .http
            .post(&self.config.webhook_url)
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), %body, "slack webhook responded");

        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

fn summary_fields(stats: &ContributionStats) -> [Field; 4] {
    [
        Field::new("Current streak", format!("{} days", stats.current_streak), true),
        Field::new("Longest streak", format!("{} days", stats.longest_streak), true),
        Field::new(
            "In the last year",
            format!("{} contributions", stats.year_total),
            true,
        ),
        Field::new(
            "In the last week",
            format!("{} contributions", stats.last_week_total),
            true,
        ),
    ]
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, status: &NotificationStatus) -> Result<(), DeliveryError> {
        self.post(&self.payload(status)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notifier() -> SlackNotifier {
        let mut config = SlackConfig::new("https://hooks.slack.test/T000", "#kusa");
        config.glyph_limit = 5;
        SlackNotifier::new(config)
    }

    fn status(latest_count: u32) -> NotificationStatus {
        NotificationStatus {
            user: "octocat".into(),
            stats: ContributionStats {
                latest_count,
                current_streak: 4,
                longest_streak: 21,
                year_total: 812,
                last_week_total: 30,
            },
        }
    }

    #[test]
    fn active_day_repeats_the_glyph() {
        let payload = notifier().payload(&status(3));

        assert_eq!(payload.icon_emoji, ":seedling:");
        assert_eq!(payload.username, "kusabot");
        let attachment = &payload.attachments[0];
        assert_eq!(attachment.color, "good");
        assert_eq!(
            attachment.fields[0].value,
            ":cherry_blossom::cherry_blossom::cherry_blossom:"
        );
    }

    #[test]
    fn busy_day_writes_the_count_out() {
        let payload = notifier().payload(&status(6));
        assert_eq!(payload.attachments[0].fields[0].value, "6 contributions");
    }

    #[test]
    fn quiet_day_uses_warning_icon_and_message() {
        let payload = notifier().payload(&status(0));

        assert_eq!(payload.icon_emoji, ":japanese_goblin:");
        let attachment = &payload.attachments[0];
        assert_eq!(attachment.color, "danger");
        assert_eq!(
            attachment.fields[0].value,
            ":warning: There are no contributions today ! :warning:"
        );
    }

    #[test]
    fn serialized_payload_shape() {
        let payload = notifier().payload(&status(1));
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "channel": "#kusa",
                "username": "kusabot",
                "icon_emoji": ":seedling:",
                "attachments": [{
                    "color": "good",
                    "title": "octocat",
                    "title_link": "https://github.com/octocat",
                    "text": "octocat's contributions",
                    "fields": [
                        { "title": "Contributions", "value": ":cherry_blossom:", "short": false },
                        { "title": "Current streak", "value": "4 days", "short": true },
                        { "title": "Longest streak", "value": "21 days", "short": true },
                        { "title": "In the last year", "value": "812 contributions", "short": true },
                        { "title": "In the last week", "value": "30 contributions", "short": true }
                    ]
                }]
            })
        );
    }

    #[tokio::test]
    async fn unreachable_webhook_is_a_delivery_error() {
        let notifier = SlackNotifier::new(SlackConfig::new("http://127.0.0.1:9/hook", "#kusa"));
        let err = notifier.notify(&status(1)).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Request(_)), "got {err:?}");
    }
}
