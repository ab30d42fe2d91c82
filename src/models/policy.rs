//! Access policy mapping.
//!
//! Wire shape: `{id, name, icon?, description?, ip_access?: string[],
//! enforce_tfa?, admin_access?, app_access?}`. The IP allowlist is a
//! comma-separated string on the config side for easier editing.

use serde::{Deserialize, Serialize};

use super::string_or_null;

/// Policy as configured by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Server-assigned identifier; never sent in payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Comma-separated addresses or CIDR ranges, e.g. `10.0.0.0/8, 192.168.1.0/24`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_tfa: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_access: Option<bool>,
}

/// Policy as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PolicyWire {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub ip_access: Option<Vec<String>>,
    pub enforce_tfa: Option<bool>,
    pub admin_access: Option<bool>,
    pub app_access: Option<bool>,
}

/// Create and update request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyPayload<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_access: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce_tfa: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_access: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_access: Option<bool>,
}

impl PolicyConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Request body for both create and update. The id is never included.
    pub fn to_payload(&self) -> PolicyPayload<'_> {
        PolicyPayload {
            name: &self.name,
            icon: self.icon.as_deref(),
            description: self.description.as_deref(),
            ip_access: self
                .ip_access
                .as_deref()
                .map(split_ip_access)
                .filter(|entries| !entries.is_empty()),
            enforce_tfa: self.enforce_tfa,
            admin_access: self.admin_access,
            app_access: self.app_access,
        }
    }

    pub fn from_wire(wire: PolicyWire) -> Self {
        Self {
            id: string_or_null(Some(wire.id)),
            name: wire.name,
            icon: string_or_null(wire.icon),
            description: string_or_null(wire.description),
            ip_access: wire
                .ip_access
                .filter(|entries| !entries.is_empty())
                .map(|entries| join_ip_access(&entries)),
            enforce_tfa: Some(wire.enforce_tfa.unwrap_or(false)),
            admin_access: Some(wire.admin_access.unwrap_or(false)),
            app_access: Some(wire.app_access.unwrap_or(false)),
        }
    }
}

/// Split a comma-separated allowlist into trimmed, non-empty entries.
pub fn split_ip_access(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join allowlist entries back into the config representation.
pub fn join_ip_access(entries: &[String]) -> String {
    entries.join(",")
}
