//! GitHub REST client for the Copilot usage endpoints.

use super::error::{classify, ClassifiedError};
use super::UsageSource;
use crate::config::GitHubConfig;
use crate::constants::{
    ENTERPRISE_USAGE_PATH, GITHUB_API_VERSION_HEADER, GITHUB_MEDIA_TYPE, ORG_USAGE_PATH,
    USAGE_PAGE_SIZE,
};
use crate::models::CopilotUsageDay;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, Url};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

/// Client bound to a single caller's token.
///
/// Built per request and dropped afterwards, so connections and credentials
/// are never shared between callers.
pub struct GitHubCopilotClient {
    client: Client,
    base_url: Url,
    api_version: String,
    token: Secret<String>,
}

/// GitHub's JSON error body.
#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: Option<String>,
}

impl GitHubCopilotClient {
    pub fn new(config: &GitHubConfig, token: Secret<String>) -> Result<Self> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| anyhow!("Invalid GitHub API base URL '{}': {}", config.api_base_url, e))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!(
                "Invalid GitHub API base URL '{}'",
                config.api_base_url
            ));
        }

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url,
            api_version: config.api_version.clone(),
            token,
        })
    }

    /// Fetch daily usage for an organization.
    ///
    /// `start_date` / `end_date` are `YYYY-MM-DD` and sent as `since` /
    /// `until` only when present.
    pub async fn fetch_org_usage(
        &self,
        org_name: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<CopilotUsageDay>, ClassifiedError> {
        let url = self.endpoint(&ORG_USAGE_PATH, org_name);
        self.fetch_usage(url, start_date, end_date).await
    }

    /// Fetch daily usage for an enterprise.
    pub async fn fetch_enterprise_usage(
        &self,
        enterprise_name: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<CopilotUsageDay>, ClassifiedError> {
        let url = self.endpoint(&ENTERPRISE_USAGE_PATH, enterprise_name);
        self.fetch_usage(url, start_date, end_date).await
    }

    /// Substitute `name` for the placeholder segment; segments are
    /// percent-encoded by `Url`.
    fn endpoint(&self, template: &[&str], name: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            for segment in template {
                if segment.starts_with('{') {
                    segments.push(name);
                } else {
                    segments.push(segment);
                }
            }
        }
        url
    }

    async fn fetch_usage(
        &self,
        url: Url,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<CopilotUsageDay>, ClassifiedError> {
        let mut query = vec![("per_page", USAGE_PAGE_SIZE.to_string())];
        if let Some(since) = start_date {
            query.push(("since", since.to_string()));
        }
        if let Some(until) = end_date {
            query.push(("until", until.to_string()));
        }

        tracing::debug!(url = %url, since = ?start_date, until = ?end_date, "Requesting Copilot usage");

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(self.token.expose_secret())
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(GITHUB_API_VERSION_HEADER, &self.api_version)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "GitHub request failed");
                classify(None, Some(&e.to_string()))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Failed to read GitHub response body");
            classify(None, Some(&e.to_string()))
        })?;

        if !status.is_success() {
            let error = classify(Some(status.as_u16()), error_message(&body).as_deref());
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                kind = error.kind.as_str(),
                "GitHub returned an error"
            );
            return Err(error);
        }

        let days = parse_usage_body(&body)?;
        if days.len() >= USAGE_PAGE_SIZE {
            tracing::warn!(
                url = %url,
                days = days.len(),
                "Usage response filled a whole page; later pages are not fetched"
            );
        }
        tracing::info!(url = %url, days = days.len(), "Fetched Copilot usage");

        Ok(days)
    }
}

#[async_trait]
impl UsageSource for GitHubCopilotClient {
    async fn fetch_org_usage(
        &self,
        org_name: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<CopilotUsageDay>, ClassifiedError> {
        GitHubCopilotClient::fetch_org_usage(self, org_name, start_date, end_date).await
    }

    async fn fetch_enterprise_usage(
        &self,
        enterprise_name: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<CopilotUsageDay>, ClassifiedError> {
        GitHubCopilotClient::fetch_enterprise_usage(self, enterprise_name, start_date, end_date)
            .await
    }
}

/// A JSON array decodes to usage days; any other JSON value means no data.
fn parse_usage_body(body: &str) -> Result<Vec<CopilotUsageDay>, ClassifiedError> {
    let decode_error = |e: serde_json::Error| {
        tracing::error!(error = %e, "Failed to decode GitHub usage response");
        classify(None, Some(&format!("Failed to decode usage response: {}", e)))
    };

    let value: serde_json::Value = serde_json::from_str(body).map_err(decode_error)?;
    if !value.is_array() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(decode_error)
}

/// Extract the `message` of a GitHub error body, falling back to raw text.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<GitHubErrorBody>(trimmed) {
        Ok(GitHubErrorBody { message: Some(msg) }) => Some(msg),
        Ok(GitHubErrorBody { message: None }) => None,
        Err(_) => Some(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GitHubCopilotClient {
        let config = GitHubConfig {
            api_base_url: base.to_string(),
            ..GitHubConfig::default()
        };
        GitHubCopilotClient::new(&config, Secret::new("ghp_test".to_string())).unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let c = client("https://api.github.com");
        assert_eq!(
            c.endpoint(&ORG_USAGE_PATH, "my-org").as_str(),
            "https://api.github.com/orgs/my-org/copilot/usage"
        );
        assert_eq!(
            c.endpoint(&ENTERPRISE_USAGE_PATH, "acme").as_str(),
            "https://api.github.com/enterprises/acme/copilot/usage"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_name() {
        let c = client("https://ghe.example.com/api/v3/");
        assert_eq!(
            c.endpoint(&ORG_USAGE_PATH, "a/b c").as_str(),
            "https://ghe.example.com/api/v3/orgs/a%2Fb%20c/copilot/usage"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = GitHubConfig {
            api_base_url: "not a url".to_string(),
            ..GitHubConfig::default()
        };
        assert!(GitHubCopilotClient::new(&config, Secret::new("t".to_string())).is_err());
    }

    #[test]
    fn test_parse_usage_body() {
        let days = parse_usage_body(
            r#"[{"day":"2024-01-01","total_suggestions_count":1,"total_acceptances_count":1,
                "total_lines_suggested":2,"total_lines_accepted":1,"breakdown":[]}]"#,
        )
        .unwrap();
        assert_eq!(days.len(), 1);

        assert!(parse_usage_body(r#"{"message":"not a list"}"#).unwrap().is_empty());
        assert!(parse_usage_body("[]").unwrap().is_empty());

        let err = parse_usage_body("<html>").unwrap_err();
        assert_eq!(err.status, None);
        assert!(err.message.starts_with("API error: Failed to decode usage response"));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"Bad credentials","documentation_url":"https://docs.github.com"}"#),
            Some("Bad credentials".to_string())
        );
        assert_eq!(error_message("upstream exploded"), Some("upstream exploded".to_string()));
        assert_eq!(error_message("  "), None);
        assert_eq!(error_message("{}"), None);
    }
}
