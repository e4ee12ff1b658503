//! Envelope normalisation for backend payloads.
//!
//! The backend's endpoints grew independently and wrap their lists in
//! different envelopes: a bare array, a paginated `{ "results": [...] }`,
//! a `{ "data": [...] }` wrapper, or a single object. Everything downstream
//! of the transport works on one canonical shape, [`NormalizedList`].
//!
//! # Precedence
//!
//! First match wins:
//!
//! 1. payload is an array → its elements
//! 2. `payload.results` is an array → those elements
//! 3. `payload.data` is an array → those elements
//! 4. payload is any other object → `[payload]`
//! 5. anything else (`null`, scalars) → `[]`

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Envelope keys probed, in order, for a list of records.
const LIST_FIELDS: &[&str] = &["results", "data"];

/// Canonical list form of any backend payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedList<T> {
    pub items: Vec<T>,
}

impl<T> NormalizedList<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for NormalizedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

/// Canonicalise a payload of unknown shape into a list of raw records.
///
/// Total: never fails, degrades to an empty list.
pub fn normalize(payload: &Value) -> NormalizedList<Value> {
    let items = match payload {
        Value::Array(items) => items.clone(),
        Value::Object(map) => LIST_FIELDS
            .iter()
            .find_map(|field| match map.get(*field) {
                Some(Value::Array(items)) => Some(items.clone()),
                _ => None,
            })
            .unwrap_or_else(|| vec![payload.clone()]),
        _ => Vec::new(),
    };
    NormalizedList { items }
}

/// Deserialise each record independently, dropping the ones that do not fit `T`.
pub fn decode_items<T: DeserializeOwned>(items: &[Value]) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match T::deserialize(item) {
            Ok(record) => out.push(record),
            Err(e) => debug!(idx, error = %e, "dropping record that does not match expected shape"),
        }
    }
    out
}

/// Normalise a payload and project it onto typed records.
pub fn decode_list<T: DeserializeOwned>(payload: &Value) -> NormalizedList<T> {
    let raw = normalize(payload);
    NormalizedList {
        items: decode_items(&raw.items),
    }
}
