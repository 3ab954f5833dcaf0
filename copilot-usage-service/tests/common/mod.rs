#![allow(dead_code)]

use copilot_usage_service::config::{GitHubConfig, ObservabilityConfig, UsageServiceConfig};
use copilot_usage_service::services::UsageSourceFactory;
use copilot_usage_service::Application;
use serde_json::{json, Value};
use std::sync::Arc;

pub const TEST_TOKEN: &str = "ghp_test_token";

pub fn test_config(github_base_url: &str) -> UsageServiceConfig {
    UsageServiceConfig {
        common: service_core::config::Config {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
        },
        github: GitHubConfig {
            api_base_url: github_base_url.to_string(),
            timeout_secs: 5,
            ..GitHubConfig::default()
        },
        observability: ObservabilityConfig {
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
        allowed_origins: vec![],
    }
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the real application pointed at `github_base_url`.
    pub async fn spawn(github_base_url: &str) -> Self {
        let app = Application::build(test_config(github_base_url))
            .await
            .expect("Failed to build test application");
        Self::serve(app).await
    }

    /// Spawn the application with a custom usage source factory.
    pub async fn spawn_with_sources(sources: Arc<dyn UsageSourceFactory>) -> Self {
        let app = Application::build_with_sources(test_config("http://127.0.0.1:9"), sources)
            .await
            .expect("Failed to build test application");
        Self::serve(app).await
    }

    async fn serve(app: Application) -> Self {
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client
                .get(format!("{}/health", address))
                .send()
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp { address, client }
    }

    pub async fn post_usage(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/copilot/usage", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn post_raw(&self, body: &'static str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/copilot/usage", self.address))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to send request")
    }
}

pub fn usage_request(org_type: &str) -> Value {
    json!({
        "token": TEST_TOKEN,
        "orgName": "my-org",
        "orgType": org_type,
    })
}

/// Two days of usage shaped like GitHub's response.
pub fn github_usage_payload() -> Value {
    json!([
        {
            "day": "2024-01-01",
            "total_suggestions_count": 1000,
            "total_acceptances_count": 800,
            "total_lines_suggested": 3000,
            "total_lines_accepted": 2400,
            "total_active_users": 12,
            "breakdown": [
                { "language": "typescript", "editor": "vscode", "suggestions_count": 500, "acceptances_count": 400, "lines_suggested": 1500, "lines_accepted": 1200, "active_users": 5 },
                { "language": "javascript", "editor": "vscode", "suggestions_count": 300, "acceptances_count": 240, "lines_suggested": 900, "lines_accepted": 720, "active_users": 4 },
                { "language": "typescript", "editor": "jetbrains", "suggestions_count": 200, "acceptances_count": 160, "lines_suggested": 600, "lines_accepted": 480, "active_users": 3 }
            ]
        },
        {
            "day": "2024-01-02",
            "total_suggestions_count": 1200,
            "total_acceptances_count": 960,
            "total_lines_suggested": 3600,
            "total_lines_accepted": 2880,
            "total_active_users": 14,
            "breakdown": [
                { "language": "typescript", "editor": "vscode", "suggestions_count": 600, "acceptances_count": 480, "lines_suggested": 1800, "lines_accepted": 1440, "active_users": 6 },
                { "language": "python", "editor": "vscode", "suggestions_count": 400, "acceptances_count": 320, "lines_suggested": 1200, "lines_accepted": 960, "active_users": 4 },
                { "language": "typescript", "editor": "jetbrains", "suggestions_count": 200, "acceptances_count": 160, "lines_suggested": 600, "lines_accepted": 480, "active_users": 3 }
            ]
        }
    ])
}
