use chrono::NaiveDate;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};

use crate::error::ConfigError;

pub const DEFAULT_GITHUB_URL: &str = "https://github.com";
pub const DEFAULT_BOT_NAME: &str = "kusabot";
pub const DEFAULT_ICON_EMOJI: &str = ":seedling:";
pub const DEFAULT_ICON_EMOJI_NO_CONTRIBUTIONS: &str = ":japanese_goblin:";
pub const DEFAULT_MSG_NO_CONTRIBUTIONS: &str =
    ":warning: There are no contributions today ! :warning:";
pub const DEFAULT_CONTRIBUTION_GLYPH: &str = ":cherry_blossom:";
pub const DEFAULT_GLYPH_LIMIT: u32 = 50;

#[derive(Debug, Parser)]
#[command(name = "kusa")]
#[command(version, about = "Post today's GitHub contributions to Slack")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Print version
    #[arg(short = 'v', short_alias = 'V', long, action = ArgAction::Version)]
    pub version: Option<bool>,

    /// GitHub user to report on (repeatable; GITHUB_USERS is ':'-separated)
    #[arg(short, long = "user", env = "GITHUB_USERS", value_delimiter = ':')]
    pub users: Vec<String>,

    /// Slack incoming webhook URL
    #[arg(long, env = "SLACK_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Slack channel to post into
    #[arg(long, env = "SLACK_CHANNEL")]
    pub channel: Option<String>,

    /// Display name of the bot
    #[arg(long, env = "SLACK_USERNAME", default_value = DEFAULT_BOT_NAME)]
    pub bot_name: String,

    /// Icon used when there are contributions today
    #[arg(long, env = "ICON_EMOJI", default_value = DEFAULT_ICON_EMOJI)]
    pub icon_emoji: String,

    /// Icon used when there are no contributions today
    #[arg(
        long,
        env = "ICON_EMOJI_NO_CONTRIBUTIONS",
        default_value = DEFAULT_ICON_EMOJI_NO_CONTRIBUTIONS
    )]
    pub icon_emoji_no_contributions: String,

    /// Message used when there are no contributions today
    #[arg(
        long,
        env = "MSG_NO_CONTRIBUTIONS",
        default_value = DEFAULT_MSG_NO_CONTRIBUTIONS
    )]
    pub msg_no_contributions: String,

    /// Glyph repeated once per contribution
    #[arg(long, env = "CONTRIBUTION_GLYPH", default_value = DEFAULT_CONTRIBUTION_GLYPH)]
    pub contribution_glyph: String,

    /// Above this many contributions the count is written out instead
    #[arg(long, env = "GLYPH_LIMIT", default_value_t = DEFAULT_GLYPH_LIMIT)]
    pub glyph_limit: u32,

    /// Where profile pages are fetched from
    #[arg(long, env = "GITHUB_URL", default_value = DEFAULT_GITHUB_URL)]
    pub github_url: String,

    /// Reference date (YYYY-MM-DD); defaults to the local date
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Enable debug logging (any non-empty KUSA_DEBUG other than 0/false/no/off)
    #[arg(long, env = "KUSA_DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,
}

/// Everything the Slack notifier needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackConfig {
    pub webhook_url: String,
    pub channel: String,
    pub bot_name: String,
    pub icon_emoji: String,
    pub icon_emoji_no_contributions: String,
    pub msg_no_contributions: String,
    pub contribution_glyph: String,
    pub glyph_limit: u32,
    /// Used to build the attachment's title link.
    pub github_url: String,
}

impl SlackConfig {
    /// Defaults for everything except the two required settings.
    pub fn new(webhook_url: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            channel: channel.into(),
            bot_name: DEFAULT_BOT_NAME.to_string(),
            icon_emoji: DEFAULT_ICON_EMOJI.to_string(),
            icon_emoji_no_contributions: DEFAULT_ICON_EMOJI_NO_CONTRIBUTIONS.to_string(),
            msg_no_contributions: DEFAULT_MSG_NO_CONTRIBUTIONS.to_string(),
            contribution_glyph: DEFAULT_CONTRIBUTION_GLYPH.to_string(),
            glyph_limit: DEFAULT_GLYPH_LIMIT,
            github_url: DEFAULT_GITHUB_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub users: Vec<String>,
    pub github_url: String,
    pub slack: SlackConfig,
    pub today: Option<NaiveDate>,
    pub debug: bool,
}

impl Cli {
    /// Validates required settings. Checks run in the order users, webhook,
    /// channel so the reported error is stable.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let users: Vec<String> = self
            .users
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        if users.is_empty() {
            return Err(ConfigError::MissingUsers);
        }

        let webhook_url = non_empty(self.webhook_url).ok_or(ConfigError::MissingWebhookUrl)?;
        let channel = non_empty(self.channel).ok_or(ConfigError::MissingChannel)?;

        Ok(Config {
            users,
            github_url: self.github_url.clone(),
            slack: SlackConfig {
                webhook_url,
                channel,
                bot_name: self.bot_name,
                icon_emoji: self.icon_emoji,
                icon_emoji_no_contributions: self.icon_emoji_no_contributions,
                msg_no_contributions: self.msg_no_contributions,
                contribution_glyph: self.contribution_glyph,
                glyph_limit: self.glyph_limit,
                github_url: self.github_url,
            },
            today: self.today,
            debug: self.debug,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
