pub mod settings;
pub mod usage;

pub use settings::{OrgType, UserSettings};
pub use usage::{
    AggregatedMetrics, BreakdownEntry, CopilotUsageDay, DailyStat, EditorBreakdown,
    LanguageBreakdown, TransformedUsage, UsageMetrics,
};
