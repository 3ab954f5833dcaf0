use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

const DEFAULT_GITHUB_API_BASE_URL: &str = "https://api.github.com";
const DEFAULT_GITHUB_API_VERSION: &str = "2022-11-28";
const DEFAULT_GITHUB_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct UsageServiceConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub github: GitHubConfig,
    pub observability: ObservabilityConfig,
    /// Browser origins allowed to call the API. Empty disables CORS.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    /// REST API root, e.g. `https://api.github.com` or a GHES `/api/v3` URL.
    pub api_base_url: String,
    /// Value of the `X-GitHub-Api-Version` header.
    pub api_version: String,
    pub user_agent: String,
    /// Whole-request timeout for a single upstream call.
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_GITHUB_API_BASE_URL.to_string(),
            api_version: DEFAULT_GITHUB_API_VERSION.to_string(),
            user_agent: env!("CARGO_PKG_NAME").to_string(),
            timeout_secs: DEFAULT_GITHUB_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// OTLP collector endpoint; spans are only exported when set.
    pub otlp_endpoint: Option<String>,
}

impl UsageServiceConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";
        let defaults = GitHubConfig::default();

        Ok(UsageServiceConfig {
            common: common_config,
            github: GitHubConfig {
                api_base_url: get_env("GITHUB_API_BASE_URL", Some(&defaults.api_base_url), is_prod)?,
                api_version: get_env("GITHUB_API_VERSION", Some(&defaults.api_version), is_prod)?,
                user_agent: get_env("GITHUB_USER_AGENT", Some(&defaults.user_agent), is_prod)?,
                timeout_secs: parse_timeout_secs(&get_env(
                    "GITHUB_TIMEOUT_SECS",
                    Some(&defaults.timeout_secs.to_string()),
                    is_prod,
                )?)?,
            },
            observability: ObservabilityConfig {
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            },
            allowed_origins: parse_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_timeout_secs(raw: &str) -> Result<u64, AppError> {
    raw.trim().parse().map_err(|e: std::num::ParseIntError| {
        AppError::ConfigError(anyhow::anyhow!("Invalid GITHUB_TIMEOUT_SECS '{}': {}", raw, e))
    })
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_defaults_target_public_api() {
        let github = GitHubConfig::default();
        assert_eq!(github.api_base_url, "https://api.github.com");
        assert_eq!(github.api_version, "2022-11-28");
        assert_eq!(github.timeout_secs, 30);
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins("http://localhost:3000, https://dash.example.com ,"),
            vec!["http://localhost:3000", "https://dash.example.com"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn timeout_must_be_a_whole_number_of_seconds() {
        assert_eq!(parse_timeout_secs("45").unwrap(), 45);
        assert_eq!(parse_timeout_secs(" 10 ").unwrap(), 10);
        assert!(matches!(
            parse_timeout_secs("thirty"),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            parse_timeout_secs("-5"),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn missing_env_uses_default_outside_prod() {
        let value = get_env("COPILOT_USAGE_TEST_UNSET_KEY", Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
        assert!(get_env("COPILOT_USAGE_TEST_UNSET_KEY", Some("fallback"), true).is_err());
        assert!(get_env("COPILOT_USAGE_TEST_UNSET_KEY", None, false).is_err());
    }
}
