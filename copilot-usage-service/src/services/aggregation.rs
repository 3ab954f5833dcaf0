//! Pure aggregation of daily Copilot usage records into dashboard metrics.
//!
//! Every function here is deterministic and side-effect free; an empty input
//! yields zeroed metrics and empty sequences.

use crate::models::{
    AggregatedMetrics, BreakdownEntry, CopilotUsageDay, DailyStat, EditorBreakdown,
    LanguageBreakdown, TransformedUsage, UsageMetrics,
};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Sum the per-day totals and derive both acceptance rates.
///
/// Totals come from each day's own `total_*` fields, not from its breakdown.
/// Sums saturate at `u64::MAX`.
pub fn calculate_metrics(data: &[CopilotUsageDay]) -> AggregatedMetrics {
    let mut metrics = AggregatedMetrics::default();

    for day in data {
        metrics.total_suggestions = metrics
            .total_suggestions
            .saturating_add(day.total_suggestions_count);
        metrics.total_acceptances = metrics
            .total_acceptances
            .saturating_add(day.total_acceptances_count);
        metrics.total_lines_suggested = metrics
            .total_lines_suggested
            .saturating_add(day.total_lines_suggested);
        metrics.total_lines_accepted = metrics
            .total_lines_accepted
            .saturating_add(day.total_lines_accepted);
    }

    metrics.acceptance_rate = percentage(metrics.total_acceptances, metrics.total_suggestions);
    metrics.line_acceptance_rate =
        percentage(metrics.total_lines_accepted, metrics.total_lines_suggested);

    metrics
}

/// Sum breakdown counters per language across all days.
pub fn aggregate_by_language(data: &[CopilotUsageDay]) -> Vec<LanguageBreakdown> {
    group_breakdown(data, |entry| &entry.language)
        .into_iter()
        .map(|(language, c)| LanguageBreakdown {
            language,
            suggestions_count: c.suggestions,
            acceptances_count: c.acceptances,
            lines_suggested: c.lines_suggested,
            lines_accepted: c.lines_accepted,
        })
        .collect()
}

/// Sum breakdown counters per editor across all days.
pub fn aggregate_by_editor(data: &[CopilotUsageDay]) -> Vec<EditorBreakdown> {
    group_breakdown(data, |entry| &entry.editor)
        .into_iter()
        .map(|(editor, c)| EditorBreakdown {
            editor,
            suggestions_count: c.suggestions,
            acceptances_count: c.acceptances,
            lines_suggested: c.lines_suggested,
            lines_accepted: c.lines_accepted,
        })
        .collect()
}

/// One trend row per input day, in input order.
pub fn prepare_daily_stats(data: &[CopilotUsageDay]) -> Vec<DailyStat> {
    data.iter()
        .map(|day| DailyStat {
            date: day.day.clone(),
            suggestions: day.total_suggestions_count,
            acceptances: day.total_acceptances_count,
            lines_suggested: day.total_lines_suggested,
            lines_accepted: day.total_lines_accepted,
        })
        .collect()
}

/// Build the full dashboard payload. `today` stamps the metrics.
pub fn transform_usage_data(data: &[CopilotUsageDay], today: NaiveDate) -> TransformedUsage {
    let metrics = calculate_metrics(data);

    TransformedUsage {
        metrics: UsageMetrics::dated(today.format("%Y-%m-%d").to_string(), metrics),
        daily_stats: prepare_daily_stats(data),
        language_breakdown: aggregate_by_language(data),
        editor_breakdown: aggregate_by_editor(data),
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    suggestions: u64,
    acceptances: u64,
    lines_suggested: u64,
    lines_accepted: u64,
}

impl Counters {
    fn add(&mut self, entry: &BreakdownEntry) {
        self.suggestions = self.suggestions.saturating_add(entry.suggestions_count);
        self.acceptances = self.acceptances.saturating_add(entry.acceptances_count);
        self.lines_suggested = self.lines_suggested.saturating_add(entry.lines_suggested);
        self.lines_accepted = self.lines_accepted.saturating_add(entry.lines_accepted);
    }
}

/// Accumulate counters per key. Keys come out in order of first appearance.
fn group_breakdown<F>(data: &[CopilotUsageDay], key: F) -> Vec<(String, Counters)>
where
    F: Fn(&BreakdownEntry) -> &String,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Counters)> = Vec::new();

    for entry in data.iter().flat_map(|day| day.breakdown.iter()) {
        let k = key(entry);
        let slot = *index.entry(k.as_str()).or_insert_with(|| {
            groups.push((k.clone(), Counters::default()));
            groups.len() - 1
        });
        groups[slot].1.add(entry);
    }

    groups
}

/// `100 * part / whole` rounded to two decimals, 0 when `whole` is 0.
fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let rate = round2(part as f64 / whole as f64 * 100.0);
    // Upstream totals can be inconsistent (more acceptances than suggestions).
    rate.min(100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
