//! Fixed values shared by the fetcher, the settings store and clients.

use chrono::{Duration, NaiveDate};

/// Records requested per upstream call. Later pages are never followed.
pub const USAGE_PAGE_SIZE: usize = 100;

/// Path segments of the organization usage endpoint; `{org}` is substituted.
pub const ORG_USAGE_PATH: [&str; 4] = ["orgs", "{org}", "copilot", "usage"];

/// Path segments of the enterprise usage endpoint; `{enterprise}` is substituted.
pub const ENTERPRISE_USAGE_PATH: [&str; 4] = ["enterprises", "{enterprise}", "copilot", "usage"];

pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
pub const GITHUB_API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

/// Key under which the dashboard keeps the user's settings.
pub const USER_SETTINGS_KEY: &str = "copilot-user-settings";

/// Date range shortcuts offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    Last7Days,
    Last30Days,
    Last90Days,
}

impl DatePreset {
    pub fn days(self) -> i64 {
        match self {
            DatePreset::Last7Days => 7,
            DatePreset::Last30Days => 30,
            DatePreset::Last90Days => 90,
        }
    }

    /// Inclusive `(since, until)` ISO dates covering `days()` calendar days
    /// up to and including `today`.
    pub fn range_ending(self, today: NaiveDate) -> (String, String) {
        let start = today - Duration::days(self.days() - 1);
        (
            start.format("%Y-%m-%d").to_string(),
            today.format("%Y-%m-%d").to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_cover_inclusive_ranges() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        assert_eq!(
            DatePreset::Last7Days.range_ending(today),
            ("2024-03-04".to_string(), "2024-03-10".to_string())
        );
        // Crosses the leap day.
        assert_eq!(
            DatePreset::Last30Days.range_ending(today),
            ("2024-02-10".to_string(), "2024-03-10".to_string())
        );
        assert_eq!(DatePreset::Last90Days.days(), 90);
    }
}
