//! # SCHEMA DEFINITIONS
//!
//! A [`Schema`] is an ordered mapping from field name to [`FieldRules`]. It is
//! either built in code or parsed from a JSON document:
//!
//! ```json
//! {
//!   "name": {"type": "string", "minlength": 3, "required": true},
//!   "age": {"type": "integer", "min": 10, "required": true}
//! }
//! ```
//!
//! Parsing rejects unknown rule names, ill-typed rule values and invalid
//! regular expressions with a configuration error, so a schema that parses
//! never faults during validation.

use crate::errors::ProjectError;
use crate::validation::error_codes;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Number, Value as JsonValue};

/// **JSON TYPE ENUMERATION**
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    String,
    /// Whole numbers. Booleans never match.
    Integer,
    /// Numbers written with a fraction or exponent.
    Float,
    /// Any number.
    Number,
    Boolean,
    Dict,
    List,
}

impl JsonType {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(JsonType::String),
            "integer" => Some(JsonType::Integer),
            "float" => Some(JsonType::Float),
            "number" => Some(JsonType::Number),
            "boolean" => Some(JsonType::Boolean),
            "dict" => Some(JsonType::Dict),
            "list" => Some(JsonType::List),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Integer => "integer",
            JsonType::Float => "float",
            JsonType::Number => "number",
            JsonType::Boolean => "boolean",
            JsonType::Dict => "dict",
            JsonType::List => "list",
        }
    }

    pub fn matches(&self, value: &JsonValue) -> bool {
        match (self, value) {
            (JsonType::String, JsonValue::String(_)) => true,
            (JsonType::Integer, JsonValue::Number(n)) => n.is_i64() || n.is_u64(),
            (JsonType::Float, JsonValue::Number(n)) => n.is_f64(),
            (JsonType::Number, JsonValue::Number(_)) => true,
            (JsonType::Boolean, JsonValue::Bool(_)) => true,
            (JsonType::Dict, JsonValue::Object(_)) => true,
            (JsonType::List, JsonValue::Array(_)) => true,
            _ => false,
        }
    }
}

/// Compiled `regex` rule. The whole value must match.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, ProjectError> {
        let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| {
            ProjectError::configuration(
                error_codes::INVALID_SCHEMA,
                format!("Invalid regex '{}': {}", source, e),
            )
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_full_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Rules declared for one field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRules {
    /// Accepted types; empty accepts anything.
    pub types: Vec<JsonType>,
    /// `None` defers to [`ValidatorOptions::require_all`].
    ///
    /// [`ValidatorOptions::require_all`]: crate::validation::ValidatorOptions
    pub required: Option<bool>,
    pub nullable: bool,
    /// `None` leaves empty values unchecked.
    pub empty: Option<bool>,
    pub readonly: bool,
    pub allowed: Option<Vec<JsonValue>>,
    pub forbidden: Option<Vec<JsonValue>>,
    pub min: Option<Number>,
    pub max: Option<Number>,
    pub minlength: Option<usize>,
    pub maxlength: Option<usize>,
    pub regex: Option<Pattern>,
    pub default: Option<JsonValue>,
    /// Registered coercer names, applied in order.
    pub coerce: Vec<String>,
    /// Registered custom rule names, applied in order.
    pub validators: Vec<String>,
    /// Rules for the fields of a dict value.
    pub schema: Option<Schema>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_type(mut self, json_type: JsonType) -> Self {
        self.types = vec![json_type];
        self
    }

    pub fn one_of_types(mut self, types: impl IntoIterator<Item = JsonType>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn empty(mut self, allowed: bool) -> Self {
        self.empty = Some(allowed);
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn allowed(mut self, values: impl IntoIterator<Item = JsonValue>) -> Self {
        self.allowed = Some(values.into_iter().collect());
        self
    }

    pub fn forbidden(mut self, values: impl IntoIterator<Item = JsonValue>) -> Self {
        self.forbidden = Some(values.into_iter().collect());
        self
    }

    pub fn min(mut self, min: impl Into<Number>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn max(mut self, max: impl Into<Number>) -> Self {
        self.max = Some(max.into());
        self
    }

    pub fn minlength(mut self, length: usize) -> Self {
        self.minlength = Some(length);
        self
    }

    pub fn maxlength(mut self, length: usize) -> Self {
        self.maxlength = Some(length);
        self
    }

    pub fn regex(mut self, pattern: &str) -> Result<Self, ProjectError> {
        self.regex = Some(Pattern::new(pattern)?);
        Ok(self)
    }

    pub fn default_value(mut self, value: JsonValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn coerce(mut self, name: impl Into<String>) -> Self {
        self.coerce.push(name.into());
        self
    }

    pub fn validator(mut self, name: impl Into<String>) -> Self {
        self.validators.push(name.into());
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    fn from_value(field: &str, value: &JsonValue) -> Result<Self, ProjectError> {
        let rules = value
            .as_object()
            .ok_or_else(|| schema_error(field, "rules must be a mapping"))?;

        let mut parsed = FieldRules::new();
        for (rule, constraint) in rules {
            match rule.as_str() {
                "type" => {
                    parsed.types = string_or_list(field, rule, constraint)?
                        .iter()
                        .map(|name| {
                            JsonType::parse(name).ok_or_else(|| {
                                schema_error(field, &format!("unsupported type '{}'", name))
                            })
                        })
                        .collect::<Result<_, _>>()?;
                }
                "required" => parsed.required = Some(boolean(field, rule, constraint)?),
                "nullable" => parsed.nullable = boolean(field, rule, constraint)?,
                "empty" => parsed.empty = Some(boolean(field, rule, constraint)?),
                "readonly" => parsed.readonly = boolean(field, rule, constraint)?,
                "allowed" => parsed.allowed = Some(list(field, rule, constraint)?),
                "forbidden" => parsed.forbidden = Some(list(field, rule, constraint)?),
                "min" => parsed.min = Some(number(field, rule, constraint)?),
                "max" => parsed.max = Some(number(field, rule, constraint)?),
                "minlength" => parsed.minlength = Some(length(field, rule, constraint)?),
                "maxlength" => parsed.maxlength = Some(length(field, rule, constraint)?),
                "regex" => {
                    let source = constraint
                        .as_str()
                        .ok_or_else(|| schema_error(field, "'regex' must be a string"))?;
                    parsed.regex = Some(Pattern::new(source)?);
                }
                "default" => parsed.default = Some(constraint.clone()),
                "coerce" => parsed.coerce = string_or_list(field, rule, constraint)?,
                "validator" | "check_with" => {
                    parsed
                        .validators
                        .extend(string_or_list(field, rule, constraint)?);
                }
                "schema" => parsed.schema = Some(Schema::from_value(constraint)?),
                "meta" => {}
                unknown => {
                    return Err(schema_error(field, &format!("unknown rule '{}'", unknown)));
                }
            }
        }
        Ok(parsed)
    }
}

/// **SCHEMA**
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: IndexMap<String, FieldRules>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, rules: FieldRules) -> Self {
        self.fields.insert(name.into(), rules);
        self
    }

    pub fn from_value(value: &JsonValue) -> Result<Self, ProjectError> {
        let definitions = value.as_object().ok_or_else(|| {
            ProjectError::configuration(error_codes::INVALID_SCHEMA, "Schema must be a mapping")
        })?;

        let mut schema = Schema::new();
        for (field, rules) in definitions {
            schema
                .fields
                .insert(field.clone(), FieldRules::from_value(field, rules)?);
        }
        Ok(schema)
    }

    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRules)> {
        self.fields.iter().map(|(name, rules)| (name.as_str(), rules))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Custom rule names referenced anywhere in the schema, nested ones
    /// included.
    pub fn validator_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for rules in self.fields.values() {
            names.extend(rules.validators.iter().map(String::as_str));
            if let Some(nested) = &rules.schema {
                names.extend(nested.validator_names());
            }
        }
        names
    }

    /// Coercer names referenced anywhere in the schema, nested ones included.
    pub fn coercer_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for rules in self.fields.values() {
            names.extend(rules.coerce.iter().map(String::as_str));
            if let Some(nested) = &rules.schema {
                names.extend(nested.coercer_names());
            }
        }
        names
    }
}

impl TryFrom<JsonValue> for Schema {
    type Error = ProjectError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Schema::from_value(&value)
    }
}

fn schema_error(field: &str, message: &str) -> ProjectError {
    ProjectError::configuration(
        error_codes::INVALID_SCHEMA,
        format!("field '{}': {}", field, message),
    )
}

fn boolean(field: &str, rule: &str, value: &JsonValue) -> Result<bool, ProjectError> {
    value
        .as_bool()
        .ok_or_else(|| schema_error(field, &format!("'{}' must be a boolean", rule)))
}

fn number(field: &str, rule: &str, value: &JsonValue) -> Result<Number, ProjectError> {
    match value {
        JsonValue::Number(n) => Ok(n.clone()),
        _ => Err(schema_error(field, &format!("'{}' must be a number", rule))),
    }
}

fn length(field: &str, rule: &str, value: &JsonValue) -> Result<usize, ProjectError> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| schema_error(field, &format!("'{}' must be a non-negative integer", rule)))
}

fn list(field: &str, rule: &str, value: &JsonValue) -> Result<Vec<JsonValue>, ProjectError> {
    value
        .as_array()
        .cloned()
        .ok_or_else(|| schema_error(field, &format!("'{}' must be a list", rule)))
}

fn string_or_list(field: &str, rule: &str, value: &JsonValue) -> Result<Vec<String>, ProjectError> {
    let invalid = || schema_error(field, &format!("'{}' must be a name or a list of names", rule));
    match value {
        JsonValue::String(name) => Ok(vec![name.clone()]),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid()))
            .collect(),
        _ => Err(invalid()),
    }
}
