//! Account scope and the user's saved dashboard settings.

use secrecy::Secret;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account scope supported by the Copilot usage API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgType {
    Organization,
    Enterprise,
}

impl OrgType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrgType::Organization => "organization",
            OrgType::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for OrgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrgType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "organization" => Ok(OrgType::Organization),
            "enterprise" => Ok(OrgType::Enterprise),
            _ => Err(()),
        }
    }
}

/// Settings a dashboard user enters once and reuses across visits.
#[derive(Debug, Clone)]
pub struct UserSettings {
    pub token: Secret<String>,
    pub org_name: String,
    pub org_type: OrgType,
}
