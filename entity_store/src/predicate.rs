//! Predicate and partial-update value maps.

use serde_json::Value;

/// AND-of-equalities filter over named fields.
///
/// Every entry is an equality condition on one field; entries are conjoined
/// with `AND`. An empty predicate means "no filter". Field names are passed
/// through to the backend unvalidated; checking them against the entity
/// shape is the schema's job, not the store's.
///
/// String values shaped like UUIDs or RFC3339 timestamps are bound in their
/// native encodings (blob and datetime text), matching how `bind_insert`
/// stores such fields. A plain text column that happens to hold a
/// UUID-shaped string will therefore not match.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    fields: Vec<(String, Value)>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.push((field.to_string(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Field/value pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(field, value)| (field.as_str(), value))
    }
}

/// Set of field assignments applied by a partial update.
///
/// Same shape as [`Predicate`], applied with `SET` semantics instead of
/// filtering; the same UUID and timestamp string coercions apply to the
/// assigned values.
#[derive(Debug, Clone, Default)]
pub struct Patch {
    fields: Vec<(String, Value)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `field`.
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.push((field.to_string(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Field/value pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(field, value)| (field.as_str(), value))
    }
}
