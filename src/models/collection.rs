//! Collection mapping.
//!
//! Wire shape: `{collection, meta?: {icon?, note?, hidden?, singleton?,
//! sort_field?, archive_field?, color?}, schema?: {name?, comment?}}`.
//! The collection name is the caller-chosen key and is only ever sent on
//! create; afterwards it addresses the collection through the URL.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::string_or_null;

/// Collection as configured by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Collection name; immutable once created.
    pub collection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singleton: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Collection as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CollectionWire {
    #[serde(default)]
    pub collection: String,
    pub meta: Option<CollectionMetaWire>,
    pub schema: Option<CollectionSchemaWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CollectionMetaWire {
    pub icon: Option<String>,
    pub note: Option<String>,
    pub hidden: Option<bool>,
    pub singleton: Option<bool>,
    pub sort_field: Option<String>,
    pub archive_field: Option<String>,
    pub color: Option<String>,
}

/// Backing table details; `None` for folder-only collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CollectionSchemaWire {
    pub name: Option<String>,
    pub comment: Option<String>,
}

/// `meta` block of a request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionMetaPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub singleton: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_field: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'a str>,
}

impl CollectionMetaPayload<'_> {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Create request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionCreatePayload<'a> {
    pub collection: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<CollectionMetaPayload<'a>>,
    /// Always `{}`: without it Directus creates a folder with no backing table.
    pub schema: Map<String, Value>,
}

/// Update request body; the name and schema are never sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionUpdatePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<CollectionMetaPayload<'a>>,
}

impl CollectionConfig {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..Self::default()
        }
    }

    pub fn to_create_payload(&self) -> CollectionCreatePayload<'_> {
        CollectionCreatePayload {
            collection: &self.collection,
            meta: self.meta_payload(),
            schema: Map::new(),
        }
    }

    pub fn to_update_payload(&self) -> CollectionUpdatePayload<'_> {
        CollectionUpdatePayload {
            meta: self.meta_payload(),
        }
    }

    fn meta_payload(&self) -> Option<CollectionMetaPayload<'_>> {
        let meta = CollectionMetaPayload {
            icon: self.icon.as_deref(),
            note: self.note.as_deref(),
            hidden: self.hidden,
            singleton: self.singleton,
            sort_field: self.sort_field.as_deref(),
            archive_field: self.archive_field.as_deref(),
            color: self.color.as_deref(),
        };
        (!meta.is_empty()).then_some(meta)
    }

    /// Flags read back as `false` when the collection has no `meta` block.
    pub fn from_wire(wire: CollectionWire) -> Self {
        let meta = wire.meta.unwrap_or_default();
        Self {
            collection: wire.collection,
            icon: string_or_null(meta.icon),
            note: string_or_null(meta.note),
            hidden: Some(meta.hidden.unwrap_or(false)),
            singleton: Some(meta.singleton.unwrap_or(false)),
            sort_field: string_or_null(meta.sort_field),
            archive_field: string_or_null(meta.archive_field),
            color: string_or_null(meta.color),
        }
    }
}
