//! In-memory usage source for tests and local development.

use super::{ClassifiedError, UsageSource, UsageSourceFactory};
use crate::models::{CopilotUsageDay, OrgType};
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use std::sync::{Arc, Mutex};

/// One recorded call against a [`MockUsageSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub token: String,
    pub org_type: OrgType,
    pub name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Factory whose sources all return the same canned outcome and record every
/// call into a shared log.
#[derive(Clone)]
pub struct MockSourceFactory {
    outcome: Result<Vec<CopilotUsageDay>, ClassifiedError>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockSourceFactory {
    pub fn returning(days: Vec<CopilotUsageDay>) -> Self {
        Self {
            outcome: Ok(days),
            calls: Arc::default(),
        }
    }

    pub fn failing(error: ClassifiedError) -> Self {
        Self {
            outcome: Err(error),
            calls: Arc::default(),
        }
    }

    /// Calls made so far, across every source this factory created.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl UsageSourceFactory for MockSourceFactory {
    fn create(&self, token: Secret<String>) -> anyhow::Result<Box<dyn UsageSource>> {
        Ok(Box::new(MockUsageSource {
            token,
            outcome: self.outcome.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }
}

pub struct MockUsageSource {
    token: Secret<String>,
    outcome: Result<Vec<CopilotUsageDay>, ClassifiedError>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockUsageSource {
    fn record(
        &self,
        org_type: OrgType,
        name: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<CopilotUsageDay>, ClassifiedError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                token: self.token.expose_secret().clone(),
                org_type,
                name: name.to_string(),
                start_date: start_date.map(str::to_string),
                end_date: end_date.map(str::to_string),
            });
        }
        self.outcome.clone()
    }
}

#[async_trait]
impl UsageSource for MockUsageSource {
    async fn fetch_org_usage(
        &self,
        org_name: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<CopilotUsageDay>, ClassifiedError> {
        self.record(OrgType::Organization, org_name, start_date, end_date)
    }

    async fn fetch_enterprise_usage(
        &self,
        enterprise_name: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<CopilotUsageDay>, ClassifiedError> {
        self.record(OrgType::Enterprise, enterprise_name, start_date, end_date)
    }
}
