//! Role mapping.
//!
//! Wire shape: `{id, name, icon?, description?, parent?: string|null,
//! children?: string[], users?: string[]}`. `children` and `users` are
//! computed by the server and never sent back.

use serde::{Deserialize, Serialize};

use super::{list_or_null, string_or_null, Patch};

/// Role as configured by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parent role id. Not checked locally; the server rejects unknown ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Child role ids (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
    /// Member user ids (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
}

/// Role as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoleWire {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub parent: Option<String>,
    pub children: Option<Vec<String>>,
    pub users: Option<Vec<String>>,
}

/// Create and update request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolePayload<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub parent: Patch<&'a str>,
}

impl RoleConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create body: an unset parent is simply omitted.
    pub fn to_create_payload(&self) -> RolePayload<'_> {
        RolePayload {
            parent: Patch::keep_if_none(self.parent.as_deref()),
            ..self.base_payload()
        }
    }

    /// Update body: an unset parent is sent as `null` so the server detaches it.
    pub fn to_update_payload(&self) -> RolePayload<'_> {
        RolePayload {
            parent: Patch::clear_if_none(self.parent.as_deref()),
            ..self.base_payload()
        }
    }

    fn base_payload(&self) -> RolePayload<'_> {
        RolePayload {
            name: &self.name,
            icon: self.icon.as_deref(),
            description: self.description.as_deref(),
            parent: Patch::Keep,
        }
    }

    pub fn from_wire(wire: RoleWire) -> Self {
        Self {
            id: string_or_null(Some(wire.id)),
            name: wire.name,
            icon: string_or_null(wire.icon),
            description: string_or_null(wire.description),
            parent: string_or_null(wire.parent),
            children: list_or_null(wire.children),
            users: list_or_null(wire.users),
        }
    }

    /// Number of child roles known from the last read.
    pub fn child_count(&self) -> usize {
        self.children.as_ref().map_or(0, Vec::len)
    }
}
