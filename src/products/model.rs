//! Product document model.

use serde::{Deserialize, Serialize};

/// A persisted product document.
///
/// The store assigns `_id` and the timestamps; everything else is whatever
/// the admin client sent. Fields other than `name` are flattened under
/// `attrs`, preserving the schemaless document semantics of the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Document creation time, epoch seconds.
    pub created_at: i64,
    /// Last save time, epoch seconds.
    pub updated_at: i64,
    #[serde(flatten)]
    pub attrs: serde_json::Map<String, serde_json::Value>,
}

/// An incoming product payload, before the store has assigned an identifier.
/// No validation is applied; an absent `name` persists as the empty string.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductDraft {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub attrs: serde_json::Map<String, serde_json::Value>,
}
