use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

use crate::calendar;
use crate::config::DEFAULT_GITHUB_URL;
use crate::error::FetchError;
use crate::kusa::ContributionSource;
use crate::stats::ContributionDay;

const USER_AGENT: &str = concat!("kusa/", env!("CARGO_PKG_VERSION"));
const MAX_USERNAME_LEN: usize = 39;

/// Scrapes public profile pages. No token is needed.
#[derive(Clone)]
pub struct GithubClient {
    base_url: Arc<String>,
    http: Arc<Client>,
}

impl Default for GithubClient {
    fn default() -> Self {
        Self::new(DEFAULT_GITHUB_URL)
    }
}

impl GithubClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: Arc::new(base_url.trim_end_matches('/').to_string()),
            http: Arc::new(Client::new()),
        }
    }

    pub fn profile_url(&self, username: &str) -> String {
        profile_url(&self.base_url, username)
    }

    /// Fetch the raw HTML of `username`'s profile page.
    pub async fn profile_page(&self, username: &str) -> Result<String, FetchError> {
        if !is_valid_username(username) {
            return Err(FetchError::InvalidUsername(username.to_string()));
        }
        let url = self.profile_url(username);
        tracing::debug!(%url, "fetching profile page");

        let resp = self
            .http
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map_err(|source| FetchError::Request { url, source })
    }
}

#[async_trait]
impl ContributionSource for GithubClient {
    async fn contributions(&self, username: &str) -> Result<Vec<ContributionDay>, FetchError> {
        let html = self.profile_page(username).await?;
        Ok(calendar::extract(&html))
    }
}

/// GitHub logins are ASCII alphanumerics and hyphens, at most 39 long.
/// Anything else could steer the request to another path or query.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

pub fn profile_url(base_url: &str, username: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), username)
}
