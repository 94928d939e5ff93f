//! # FORZIUM-CERBERUS TYPE DEFINITIONS
//!
//! Shared data carried between the host framework, the rule engine and the
//! request loaders.

use crate::routing::HttpMethod;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Decoded JSON body: field name to value.
pub type Document = serde_json::Map<String, JsonValue>;

/// Whether required-field rules are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Every `required` rule is enforced.
    #[default]
    Create,
    /// Partial update: absent fields are never reported as required.
    Update,
}

impl Mode {
    /// PUT and PATCH are partial updates, everything else creates.
    pub fn for_method(method: &HttpMethod) -> Self {
        match method {
            HttpMethod::PUT | HttpMethod::PATCH => Mode::Update,
            _ => Mode::Create,
        }
    }

    pub fn from_update(update: bool) -> Self {
        if update {
            Mode::Update
        } else {
            Mode::Create
        }
    }

    pub fn is_update(self) -> bool {
        self == Mode::Update
    }
}

/// One entry of a field's error list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldError {
    Message(String),
    /// Errors of a nested document declared through the `schema` rule.
    Nested(FieldErrors),
}

impl FieldError {
    pub fn as_message(&self) -> Option<&str> {
        match self {
            FieldError::Message(message) => Some(message),
            FieldError::Nested(_) => None,
        }
    }
}

/// Field-error collection.
///
/// Ordered mapping from field name to a non-empty list of entries. Serializes
/// as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    fields: IndexMap<String, Vec<FieldError>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(FieldError::Message(message.into()));
    }

    pub fn push_nested(&mut self, field: impl Into<String>, nested: FieldErrors) {
        if nested.is_empty() {
            return;
        }
        self.fields
            .entry(field.into())
            .or_default()
            .push(FieldError::Nested(nested));
    }

    pub fn get(&self, field: &str) -> Option<&[FieldError]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Plain message entries of `field`, nested entries skipped.
    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.get(field)
            .map(|entries| entries.iter().filter_map(FieldError::as_message).collect())
            .unwrap_or_default()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldError])> {
        self.fields
            .iter()
            .map(|(field, entries)| (field.as_str(), entries.as_slice()))
    }

    /// Reorder so fields follow `order`; fields not listed keep their
    /// relative order after the listed ones.
    pub fn reorder<'a>(&mut self, order: impl IntoIterator<Item = &'a str>) {
        let mut rank: IndexMap<&str, usize> = IndexMap::new();
        for (index, name) in order.into_iter().enumerate() {
            rank.entry(name).or_insert(index);
        }
        let unranked = rank.len();
        let mut fields: Vec<(String, Vec<FieldError>)> = self.fields.drain(..).collect();
        fields.sort_by_key(|(name, _)| rank.get(name.as_str()).copied().unwrap_or(unranked));
        self.fields = fields.into_iter().collect();
    }

    pub fn to_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}
