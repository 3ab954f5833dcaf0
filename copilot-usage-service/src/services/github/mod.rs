//! Upstream usage sources.
//!
//! The request handler only sees the [`UsageSource`] trait, so tests can swap
//! GitHub for the [`mock`] source.

pub mod client;
pub mod error;
pub mod mock;

use crate::config::GitHubConfig;
use crate::models::CopilotUsageDay;
use async_trait::async_trait;
use secrecy::Secret;

pub use client::GitHubCopilotClient;
pub use error::{classify, ClassifiedError, UpstreamErrorKind};

/// Source of raw daily usage records for one caller.
#[async_trait]
pub trait UsageSource: Send + Sync {
    async fn fetch_org_usage(
        &self,
        org_name: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<CopilotUsageDay>, ClassifiedError>;

    async fn fetch_enterprise_usage(
        &self,
        enterprise_name: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<CopilotUsageDay>, ClassifiedError>;
}

/// Builds a fresh [`UsageSource`] for each request's token.
pub trait UsageSourceFactory: Send + Sync {
    fn create(&self, token: Secret<String>) -> anyhow::Result<Box<dyn UsageSource>>;
}

/// Production factory: one [`GitHubCopilotClient`] per call.
#[derive(Debug, Clone)]
pub struct GitHubSourceFactory {
    config: GitHubConfig,
}

impl GitHubSourceFactory {
    pub fn new(config: GitHubConfig) -> Self {
        Self { config }
    }
}

impl UsageSourceFactory for GitHubSourceFactory {
    fn create(&self, token: Secret<String>) -> anyhow::Result<Box<dyn UsageSource>> {
        Ok(Box::new(GitHubCopilotClient::new(&self.config, token)?))
    }
}
