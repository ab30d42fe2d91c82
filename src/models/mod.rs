//! # Entity Mappers
//!
//! Each Directus entity managed by this crate has two shapes:
//!
//! - a **wire** struct mirroring the JSON the API returns, with plain
//!   strings, booleans and arrays;
//! - a **config** struct used by callers, where every optional attribute is
//!   an `Option` and "unset" is distinguishable from an empty value.
//!
//! The submodules hold the explicit conversions in both directions. The
//! rules shared by all of them live here:
//!
//! - absent or empty wire strings read back as `None`;
//! - absent or empty wire arrays read back as `None`;
//! - absent wire booleans read back as `Some(false)`;
//! - request payloads contain only the attributes that are `Some`, so a
//!   partial update never clobbers a field the caller did not set.
//!
//! The one exception is a field that must be cleared explicitly. Those are
//! carried in a [`Patch`], which serializes `Clear` as JSON `null`.

pub mod collection;
pub mod policy;
pub mod role;

use serde::{Serialize, Serializer};

pub use collection::{CollectionConfig, CollectionWire};
pub use policy::{PolicyConfig, PolicyWire};
pub use role::{RoleConfig, RoleWire};

/// Tri-state update for a nullable attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the remote value untouched (field omitted from the payload).
    #[default]
    Keep,
    /// Clear the remote value (field sent as `null`).
    Clear,
    /// Replace the remote value.
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    /// `None` means "leave untouched".
    pub fn keep_if_none(value: Option<T>) -> Self {
        value.map_or(Patch::Keep, Patch::Set)
    }

    /// `None` means "clear".
    pub fn clear_if_none(value: Option<T>) -> Self {
        value.map_or(Patch::Clear, Patch::Set)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Keep | Patch::Clear => serializer.serialize_none(),
            Patch::Set(value) => value.serialize(serializer),
        }
    }
}

/// Empty or absent strings read back as unset.
pub(crate) fn string_or_null(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Empty or absent lists read back as unset.
pub(crate) fn list_or_null(value: Option<Vec<String>>) -> Option<Vec<String>> {
    value.filter(|items| !items.is_empty())
}
