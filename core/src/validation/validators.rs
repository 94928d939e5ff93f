//! # SCHEMA RULE ENGINE
//!
//! [`SchemaValidator`] runs one schema, one registry and one set of engine
//! options against decoded documents.
//!
//! Per field, rules run in a fixed order:
//!
//! 1. `readonly` - a client-supplied value fails and nothing else runs
//! 2. `nullable` - `null` stops the field, failing unless nullable
//! 3. `type` - a mismatch stops the field
//! 4. `empty` - an empty string, list or dict stops the field, failing
//!    unless empty values are allowed
//! 5. `allowed`, `forbidden`, `min`, `max`, `minlength`, `maxlength`, `regex`
//! 6. nested `schema`
//! 7. custom validators, in declaration order
//!
//! Errors accumulate across fields and are reported in schema declaration
//! order, undeclared fields last.

use crate::errors::ProjectError;
use crate::types::{Document, FieldErrors};
use crate::validation::registry::{Registry, RuleContext};
use crate::validation::schema::{FieldRules, JsonType, Schema};
use crate::validation::{Outcome, ValidationContext, Validator, ValidatorOptions};
use serde_json::{Number, Value as JsonValue};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Error key for documents that are not JSON objects.
pub const DOCUMENT_KEY: &str = "_schema";

/// Fixed error messages.
pub mod messages {
    pub const REQUIRED_FIELD: &str = "required field";
    pub const UNKNOWN_FIELD: &str = "unknown field";
    pub const NOT_NULLABLE: &str = "null value not allowed";
    pub const EMPTY_NOT_ALLOWED: &str = "empty values not allowed";
    pub const READONLY_FIELD: &str = "field is read-only";
    pub const NOT_A_DOCUMENT: &str = "document must be of dict type";
    pub const NOT_A_DICT: &str = "must be of dict type";
}

#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: Arc<Schema>,
    registry: Arc<Registry>,
    options: ValidatorOptions,
}

impl SchemaValidator {
    /// Fails if `schema` names a rule or coercer `registry` lacks.
    pub fn new(
        schema: impl Into<Arc<Schema>>,
        registry: impl Into<Arc<Registry>>,
    ) -> Result<Self, ProjectError> {
        let schema = schema.into();
        let registry = registry.into();
        registry.check(&schema)?;
        Ok(Self {
            schema,
            registry,
            options: ValidatorOptions::default(),
        })
    }

    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    fn validate_mapping(
        &self,
        schema: &Schema,
        mapping: &Document,
        ctx: &ValidationContext<'_>,
        errors: &mut FieldErrors,
    ) -> Document {
        let mut document = self.normalize(schema, mapping, ctx, errors);

        let readonly: HashSet<&str> = schema
            .fields()
            .filter(|(name, rules)| rules.readonly && mapping.contains_key(*name))
            .map(|(name, _)| name)
            .collect();
        for name in &readonly {
            errors.push(*name, messages::READONLY_FIELD);
        }

        let mut replaced = Vec::new();
        for (field, value) in &document {
            if readonly.contains(field.as_str()) {
                continue;
            }
            match schema.get(field) {
                Some(rules) => {
                    if let Some(normalized) =
                        self.validate_field(field, value, rules, &document, ctx, errors)
                    {
                        replaced.push((field.clone(), normalized));
                    }
                }
                None if !self.options.allow_unknown => {
                    errors.push(field.as_str(), messages::UNKNOWN_FIELD)
                }
                None => {}
            }
        }
        for (field, value) in replaced {
            document.insert(field, value);
        }

        if !ctx.mode.is_update() {
            for (name, rules) in schema.fields() {
                let required = rules.required.unwrap_or(self.options.require_all);
                if required && !document.contains_key(name) {
                    errors.push(name, messages::REQUIRED_FIELD);
                }
            }
        }

        errors.reorder(schema.field_names());
        document
    }

    fn normalize(
        &self,
        schema: &Schema,
        mapping: &Document,
        ctx: &ValidationContext<'_>,
        errors: &mut FieldErrors,
    ) -> Document {
        let mut document = mapping.clone();

        if self.options.purge_unknown && !self.options.allow_unknown {
            document.retain(|field, _| schema.contains(field));
        }

        // Partial updates never fill in defaults for absent fields.
        if !ctx.mode.is_update() {
            for (name, rules) in schema.fields() {
                let Some(default) = &rules.default else {
                    continue;
                };
                let missing = match document.get(name) {
                    None => true,
                    Some(JsonValue::Null) => !rules.nullable,
                    Some(_) => false,
                };
                if missing {
                    document.insert(name.to_string(), default.clone());
                }
            }
        }

        for (name, rules) in schema.fields() {
            if rules.coerce.is_empty() {
                continue;
            }
            let Some(value) = document.get_mut(name) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            match self.coerce(&rules.coerce, value) {
                Ok(coerced) => *value = coerced,
                Err(reason) => errors.push(
                    name,
                    format!("field '{}' cannot be coerced: {}", name, reason),
                ),
            }
        }

        document
    }

    fn coerce(&self, chain: &[String], value: &JsonValue) -> Result<JsonValue, String> {
        let mut current = value.clone();
        for name in chain {
            if let Some(coercer) = self.registry.get_coercer(name) {
                current = coercer(&current)?;
            }
        }
        Ok(current)
    }

    /// Returns the normalized value when a nested schema rewrote it.
    fn validate_field(
        &self,
        field: &str,
        value: &JsonValue,
        rules: &FieldRules,
        document: &Document,
        ctx: &ValidationContext<'_>,
        errors: &mut FieldErrors,
    ) -> Option<JsonValue> {
        if value.is_null() {
            if !rules.nullable {
                errors.push(field, messages::NOT_NULLABLE);
            }
            return None;
        }

        if !rules.types.is_empty() && !rules.types.iter().any(|t| t.matches(value)) {
            errors.push(field, bad_type_message(&rules.types));
            return None;
        }

        if let Some(empty_allowed) = rules.empty {
            if is_empty(value) {
                if !empty_allowed {
                    errors.push(field, messages::EMPTY_NOT_ALLOWED);
                }
                return None;
            }
        }

        if let Some(allowed) = &rules.allowed {
            check_membership(field, value, allowed, true, errors);
        }
        if let Some(forbidden) = &rules.forbidden {
            check_membership(field, value, forbidden, false, errors);
        }

        if let JsonValue::Number(n) = value {
            if let Some(min) = &rules.min {
                if compare_numbers(n, min) == Some(Ordering::Less) {
                    errors.push(field, format!("min value is {}", min));
                }
            }
            if let Some(max) = &rules.max {
                if compare_numbers(n, max) == Some(Ordering::Greater) {
                    errors.push(field, format!("max value is {}", max));
                }
            }
        }

        if let Some(len) = length(value) {
            if let Some(min) = rules.minlength.filter(|min| len < *min) {
                errors.push(field, format!("min length is {}", min));
            }
            if let Some(max) = rules.maxlength.filter(|max| len > *max) {
                errors.push(field, format!("max length is {}", max));
            }
        }

        if let (Some(pattern), Some(text)) = (&rules.regex, value.as_str()) {
            if !pattern.is_full_match(text) {
                errors.push(
                    field,
                    format!("value does not match regex '{}'", pattern.as_str()),
                );
            }
        }

        let mut replacement = None;
        if let Some(nested_schema) = &rules.schema {
            match value.as_object() {
                Some(nested) => {
                    let mut nested_errors = FieldErrors::new();
                    let normalized =
                        self.validate_mapping(nested_schema, nested, ctx, &mut nested_errors);
                    errors.push_nested(field, nested_errors);
                    replacement = Some(JsonValue::Object(normalized));
                }
                None => errors.push(field, messages::NOT_A_DICT),
            }
        }

        for name in &rules.validators {
            if let Some(rule) = self.registry.get_rule(name) {
                let mut rule_ctx = RuleContext::new(errors, document, ctx);
                rule(&mut rule_ctx, field, value);
            }
        }

        replacement
    }
}

impl Validator for SchemaValidator {
    fn validate(&self, document: &JsonValue, ctx: &ValidationContext<'_>) -> Outcome {
        let mut errors = FieldErrors::new();
        let Some(mapping) = document.as_object() else {
            errors.push(DOCUMENT_KEY, messages::NOT_A_DOCUMENT);
            return Outcome {
                document: Document::new(),
                errors,
            };
        };

        let normalized = self.validate_mapping(&self.schema, mapping, ctx, &mut errors);
        if !errors.is_empty() {
            log::debug!(
                "Document failed validation on {} field(s): {}",
                errors.len(),
                errors.field_names().join(", ")
            );
        }
        Outcome {
            document: normalized,
            errors,
        }
    }
}

fn bad_type_message(types: &[JsonType]) -> String {
    match types {
        [single] => format!("must be of {} type", single.name()),
        many => {
            let names: Vec<String> = many.iter().map(|t| format!("'{}'", t.name())).collect();
            format!("must be of [{}] type", names.join(", "))
        }
    }
}

/// Integers compare exactly; floats on either side fall back to `f64`.
fn compare_numbers(left: &Number, right: &Number) -> Option<Ordering> {
    match (integer(left), integer(right)) {
        (Some(left), Some(right)) => Some(left.cmp(&right)),
        _ => left.as_f64()?.partial_cmp(&right.as_f64()?),
    }
}

fn integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn is_empty(value: &JsonValue) -> bool {
    length(value) == Some(0)
}

fn length(value: &JsonValue) -> Option<usize> {
    match value {
        JsonValue::String(text) => Some(text.chars().count()),
        JsonValue::Array(items) => Some(items.len()),
        JsonValue::Object(map) => Some(map.len()),
        _ => None,
    }
}

fn check_membership(
    field: &str,
    value: &JsonValue,
    values: &[JsonValue],
    allowed: bool,
    errors: &mut FieldErrors,
) {
    let rejected = |item: &JsonValue| values.contains(item) != allowed;
    match value {
        JsonValue::Array(items) => {
            let offending: Vec<&JsonValue> = items.iter().filter(|item| rejected(item)).collect();
            if !offending.is_empty() {
                let rendered = serde_json::to_string(&offending).unwrap_or_default();
                errors.push(field, format!("unallowed values {}", rendered));
            }
        }
        single if rejected(single) => {
            errors.push(field, format!("unallowed value {}", display_value(single)));
        }
        _ => {}
    }
}

fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}
