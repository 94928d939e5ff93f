//! Named custom rules and coercions.
//!
//! Schemas reference custom behavior by name (`"validator": "validate_email"`,
//! `"coerce": "normalize_email"`). A [`Registry`] resolves those names to
//! closures. Validators check at construction that every name a schema uses
//! is registered.

use crate::errors::ProjectError;
use crate::request::HttpRequest;
use crate::settings::Settings;
use crate::types::{Document, FieldErrors, Mode};
use crate::validation::error_codes;
use crate::validation::schema::Schema;
use crate::validation::ValidationContext;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Custom rule: reports failures through [`RuleContext::error`].
pub type RuleFn = Arc<dyn Fn(&mut RuleContext<'_>, &str, &JsonValue) + Send + Sync>;

/// Coercion from raw to normalized value. `Err` carries the reason.
pub type CoerceFn = Arc<dyn Fn(&JsonValue) -> Result<JsonValue, String> + Send + Sync>;

#[derive(Clone, Default)]
pub struct Registry {
    rules: HashMap<String, RuleFn>,
    coercers: HashMap<String, CoerceFn>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&mut RuleContext<'_>, &str, &JsonValue) + Send + Sync + 'static,
    {
        self.rules.insert(name.into(), Arc::new(rule));
        self
    }

    pub fn coercer<F>(mut self, name: impl Into<String>, coercer: F) -> Self
    where
        F: Fn(&JsonValue) -> Result<JsonValue, String> + Send + Sync + 'static,
    {
        self.coercers.insert(name.into(), Arc::new(coercer));
        self
    }

    pub fn get_rule(&self, name: &str) -> Option<&RuleFn> {
        self.rules.get(name)
    }

    pub fn get_coercer(&self, name: &str) -> Option<&CoerceFn> {
        self.coercers.get(name)
    }

    /// Fails on the first name `schema` uses that is not registered.
    pub fn check(&self, schema: &Schema) -> Result<(), ProjectError> {
        if let Some(name) = schema
            .validator_names()
            .into_iter()
            .find(|name| !self.rules.contains_key(*name))
        {
            return Err(ProjectError::configuration(
                error_codes::UNREGISTERED_RULE,
                format!("Schema references unregistered validator '{}'", name),
            ));
        }

        if let Some(name) = schema
            .coercer_names()
            .into_iter()
            .find(|name| !self.coercers.contains_key(*name))
        {
            return Err(ProjectError::configuration(
                error_codes::UNREGISTERED_COERCER,
                format!("Schema references unregistered coercer '{}'", name),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rules: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        let mut coercers: Vec<&str> = self.coercers.keys().map(String::as_str).collect();
        rules.sort_unstable();
        coercers.sort_unstable();
        f.debug_struct("Registry")
            .field("rules", &rules)
            .field("coercers", &coercers)
            .finish()
    }
}

/// What a custom rule sees while it runs.
pub struct RuleContext<'a> {
    errors: &'a mut FieldErrors,
    document: &'a Document,
    request: Option<&'a HttpRequest>,
    mode: Mode,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(
        errors: &'a mut FieldErrors,
        document: &'a Document,
        ctx: &ValidationContext<'a>,
    ) -> Self {
        Self {
            errors,
            document,
            request: ctx.request,
            mode: ctx.mode,
        }
    }

    /// Record a failure for `field`.
    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(field, message);
    }

    /// The request being validated, if validation runs inside one.
    pub fn request(&self) -> Option<&'a HttpRequest> {
        self.request
    }

    /// Application settings reachable through the request.
    pub fn settings(&self) -> Option<&'a Settings> {
        self.request.map(HttpRequest::settings)
    }

    /// The normalized document the field belongs to.
    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::schema::FieldRules;
    use serde_json::json;

    fn email_schema() -> Schema {
        Schema::new().field(
            "email",
            FieldRules::new()
                .coerce("normalize_email")
                .validator("validate_email"),
        )
    }

    #[test]
    fn test_check_accepts_registered_names() {
        let registry = Registry::new()
            .rule("validate_email", |_ctx, _field, _value| {})
            .coercer("normalize_email", |value| Ok(value.clone()));
        assert!(registry.check(&email_schema()).is_ok());
    }

    #[test]
    fn test_check_reports_missing_rule() {
        let registry = Registry::new().coercer("normalize_email", |value| Ok(value.clone()));
        match registry.check(&email_schema()) {
            Err(ProjectError::Configuration { code, message }) => {
                assert_eq!(code, error_codes::UNREGISTERED_RULE);
                assert!(message.contains("validate_email"));
            }
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_check_reports_missing_coercer() {
        let registry = Registry::new().rule("validate_email", |_ctx, _field, _value| {});
        assert!(matches!(
            registry.check(&email_schema()),
            Err(ProjectError::Configuration { code, .. }) if code == error_codes::UNREGISTERED_COERCER
        ));
    }

    #[test]
    fn test_rule_context_exposes_request_settings() {
        let mut settings = Settings::new();
        settings.set("email", "at", "@");
        let request = HttpRequest::post("/").with_settings(Arc::new(settings));

        let mut errors = FieldErrors::new();
        let document = Document::new();
        let ctx = ValidationContext::create().with_request(&request);
        let mut rule_ctx = RuleContext::new(&mut errors, &document, &ctx);

        let at = rule_ctx.settings().and_then(|s| s.get_str("email", "at"));
        assert_eq!(at, Some("@"));
        rule_ctx.error("email", "Not valid email");
        assert_eq!(errors.messages("email"), vec!["Not valid email"]);
    }

    #[test]
    fn test_debug_lists_names() {
        let registry = Registry::new().coercer("lower", |value| {
            Ok(json!(value.as_str().map(str::to_lowercase)))
        });
        assert_eq!(
            format!("{:?}", registry),
            r#"Registry { rules: [], coercers: ["lower"] }"#
        );
    }
}
