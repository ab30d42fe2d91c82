//! Request path resolution for Directus collections
//!
//! Directus exposes its built-in collections at the root (`/roles`,
//! `/policies`, ...) while user-defined collections live under `/items`.

use url::form_urlencoded;

/// Built-in collections served at a root-level path.
pub const SYSTEM_COLLECTIONS: &[&str] = &[
    "access",
    "activity",
    "collections",
    "comments",
    "dashboards",
    "extensions",
    "fields",
    "files",
    "flows",
    "folders",
    "notifications",
    "operations",
    "panels",
    "permissions",
    "policies",
    "presets",
    "relations",
    "revisions",
    "roles",
    "settings",
    "shares",
    "translations",
    "users",
    "versions",
    "webhooks",
];

/// Whether `collection` is one of the root-level system collections
pub fn is_system_collection(collection: &str) -> bool {
    SYSTEM_COLLECTIONS.contains(&collection)
}

/// Build the request path for a collection and an optional item id.
///
/// An empty `id` addresses the collection as a whole.
pub fn resolve_path(collection: &str, id: &str) -> String {
    let base = if is_system_collection(collection) {
        format!("/{}", collection)
    } else {
        format!("/items/{}", collection)
    };

    if id.is_empty() {
        base
    } else {
        format!("{}/{}", base, id)
    }
}

/// Append form-encoded query parameters to `path`.
///
/// Parameters are encoded in the given order; an empty slice returns the
/// path unchanged.
pub fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish();
    format!("{}?{}", path, query)
}
