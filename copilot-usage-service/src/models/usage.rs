//! Copilot usage records as returned by GitHub, and the aggregated shapes
//! served to the dashboard.

use serde::{Deserialize, Serialize};

/// One calendar day of Copilot usage for an organization or enterprise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopilotUsageDay {
    /// Day in `YYYY-MM-DD` format.
    pub day: String,
    pub total_suggestions_count: u64,
    pub total_acceptances_count: u64,
    pub total_lines_suggested: u64,
    pub total_lines_accepted: u64,
    /// Per (language, editor) contributions for the day.
    #[serde(default)]
    pub breakdown: Vec<BreakdownEntry>,
}

/// A single (language, editor) pair's contribution within one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub language: String,
    pub editor: String,
    pub suggestions_count: u64,
    pub acceptances_count: u64,
    pub lines_suggested: u64,
    pub lines_accepted: u64,
}

/// Totals and acceptance rates across all days in range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMetrics {
    pub total_suggestions: u64,
    pub total_acceptances: u64,
    /// Percentage in `[0, 100]`, two decimals.
    pub acceptance_rate: f64,
    pub total_lines_suggested: u64,
    pub total_lines_accepted: u64,
    /// Percentage in `[0, 100]`, two decimals.
    pub line_acceptance_rate: f64,
}

/// Aggregated metrics stamped with the date they were computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetrics {
    pub date: String,
    pub acceptance_rate: f64,
    pub line_acceptance_rate: f64,
    pub total_suggestions: u64,
    pub total_acceptances: u64,
    pub total_lines_suggested: u64,
    pub total_lines_accepted: u64,
}

impl UsageMetrics {
    pub fn dated(date: String, metrics: AggregatedMetrics) -> Self {
        Self {
            date,
            acceptance_rate: metrics.acceptance_rate,
            line_acceptance_rate: metrics.line_acceptance_rate,
            total_suggestions: metrics.total_suggestions,
            total_acceptances: metrics.total_acceptances,
            total_lines_suggested: metrics.total_lines_suggested,
            total_lines_accepted: metrics.total_lines_accepted,
        }
    }
}

/// One row of the daily trend table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    pub date: String,
    pub suggestions: u64,
    pub acceptances: u64,
    pub lines_suggested: u64,
    pub lines_accepted: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageBreakdown {
    pub language: String,
    pub suggestions_count: u64,
    pub acceptances_count: u64,
    pub lines_suggested: u64,
    pub lines_accepted: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorBreakdown {
    pub editor: String,
    pub suggestions_count: u64,
    pub acceptances_count: u64,
    pub lines_suggested: u64,
    pub lines_accepted: u64,
}

/// Response payload of the usage endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformedUsage {
    pub metrics: UsageMetrics,
    pub daily_stats: Vec<DailyStat>,
    pub language_breakdown: Vec<LanguageBreakdown>,
    pub editor_breakdown: Vec<EditorBreakdown>,
}
