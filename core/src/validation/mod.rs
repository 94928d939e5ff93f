//! # FORZIUM-CERBERUS VALIDATION MODULE
//!
//! **SCHEMA-DRIVEN RULE ENGINE WITH TRAIT-BASED ARCHITECTURE**
//!
//! Validates a decoded JSON document against a declarative [`Schema`] and
//! produces an [`Outcome`]: the normalized document plus a per-field error
//! collection.
//!
//! ## VALIDATION PIPELINE
//!
//! 1. **NORMALIZATION** - purge unknown fields, fill defaults, run coercions
//! 2. **FIELD RULES** - nullable, type, empty, bounds, patterns, nested schemas
//! 3. **CUSTOM RULES** - named rules looked up in the [`Registry`]
//! 4. **REQUIRED FIELDS** - create mode only
//!
//! ## USAGE
//!
//! ```rust
//! use forzium_cerberus::validation::{
//!     FieldRules, JsonType, Registry, Schema, SchemaValidator, ValidationContext, Validator,
//! };
//! use serde_json::json;
//!
//! let schema = Schema::new().field("age", FieldRules::new().of_type(JsonType::Integer).min(10));
//! let validator = SchemaValidator::new(schema, Registry::new()).unwrap();
//! let outcome = validator.validate(&json!({"age": 8}), &ValidationContext::update());
//! assert_eq!(outcome.errors.messages("age"), vec!["min value is 10"]);
//! ```

use crate::errors::ValidationError;
use crate::request::HttpRequest;
use crate::types::{Document, FieldErrors, Mode};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub mod registry;
pub mod schema;
pub mod validators;

pub use registry::{CoerceFn, Registry, RuleContext, RuleFn};
pub use schema::{FieldRules, JsonType, Pattern, Schema};
pub use validators::{messages, SchemaValidator, DOCUMENT_KEY};

/// **CORE VALIDATOR TRAIT**
///
/// Implemented by the bare rule engine and by the request-aware validator.
/// Validation never fails with an error: malformed documents come back as a
/// failed [`Outcome`].
pub trait Validator {
    fn validate(&self, document: &JsonValue, ctx: &ValidationContext<'_>) -> Outcome;
}

/// **VALIDATION CONTEXT**
///
/// Per-call state threaded through one validation pass. Custom rules read the
/// in-flight request from here rather than from validator instance state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationContext<'r> {
    pub mode: Mode,
    pub request: Option<&'r HttpRequest>,
}

impl<'r> ValidationContext<'r> {
    pub fn new(mode: Mode, request: Option<&'r HttpRequest>) -> Self {
        Self { mode, request }
    }

    pub fn create() -> Self {
        Self::new(Mode::Create, None)
    }

    pub fn update() -> Self {
        Self::new(Mode::Update, None)
    }

    pub fn with_request(mut self, request: &'r HttpRequest) -> Self {
        self.request = Some(request);
        self
    }
}

/// Result of one validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Document after normalization.
    pub document: Document,
    pub errors: FieldErrors,
}

impl Outcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<Document, ValidationError> {
        if self.errors.is_empty() {
            Ok(self.document)
        } else {
            Err(ValidationError::new(self.errors))
        }
    }
}

/// **ENGINE OPTIONS**
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Accept fields the schema does not declare.
    pub allow_unknown: bool,
    /// Drop undeclared fields from the normalized document instead of
    /// reporting them.
    pub purge_unknown: bool,
    /// Treat every declared field as required in create mode.
    pub require_all: bool,
}

/// **ERROR CODES**
pub mod error_codes {
    pub const INVALID_JSON: &str = "RUST_CORE_VALIDATION_INVALID_JSON";
    pub const INVALID_HTTP_METHOD: &str = "RUST_CORE_CONFIG_INVALID_HTTP_METHOD";
    pub const DOCUMENT_INVALID: &str = "RUST_CORE_VALIDATION_DOCUMENT_INVALID";
    pub const ROUTE_NOT_FOUND: &str = "RUST_CORE_ROUTING_ROUTE_NOT_FOUND";
    pub const INVALID_ROUTE_PATTERN: &str = "RUST_CORE_CONFIG_INVALID_ROUTE_PATTERN";
    pub const INVALID_SCHEMA: &str = "RUST_CORE_CONFIG_INVALID_SCHEMA";
    pub const UNREGISTERED_RULE: &str = "RUST_CORE_CONFIG_UNREGISTERED_RULE";
    pub const UNREGISTERED_COERCER: &str = "RUST_CORE_CONFIG_UNREGISTERED_COERCER";
    pub const INVALID_SETTINGS: &str = "RUST_CORE_CONFIG_INVALID_SETTINGS";
    pub const HANDLER_FAILED: &str = "RUST_CORE_SYSTEM_HANDLER_FAILED";
}
