pub mod aggregation;
pub mod github;
pub mod metrics;
pub mod settings;

pub use aggregation::transform_usage_data;
pub use github::{GitHubSourceFactory, UsageSource, UsageSourceFactory};
pub use settings::{KeyValueStore, MemoryStore, SettingsStore};
