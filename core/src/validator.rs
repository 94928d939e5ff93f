//! # REQUEST-AWARE VALIDATOR
//!
//! [`CerberusValidator`] binds a schema and a rule registry to the request
//! loading contract of the host framework:
//!
//! - `load` validates the JSON body with every `required` rule enforced;
//! - `update_load` validates it as a partial update.
//!
//! Both return the normalized document or fail with
//! [`ProjectError::Invalid`] carrying the field-error collection.
//!
//! The most recently loaded request is kept on the instance and exposed
//! through [`CerberusValidator::request`]. Custom rules never read that slot:
//! they get the request of their own call through [`RuleContext`], so one
//! validator can serve concurrent requests.
//!
//! [`RuleContext`]: crate::validation::RuleContext

use crate::app::LoadFn;
use crate::errors::ProjectError;
use crate::request::HttpRequest;
use crate::types::{Document, Mode};
use crate::validation::{
    Outcome, Registry, Schema, SchemaValidator, ValidationContext, Validator, ValidatorOptions,
};
use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use std::sync::Arc;

#[derive(Debug)]
pub struct CerberusValidator {
    engine: SchemaValidator,
    request: RwLock<Option<Arc<HttpRequest>>>,
}

impl CerberusValidator {
    /// Validator without custom rules or coercions.
    pub fn new(schema: impl Into<Arc<Schema>>) -> Result<Self, ProjectError> {
        Self::with_registry(schema, Registry::new())
    }

    /// Fails if `schema` names a rule or coercer `registry` lacks.
    pub fn with_registry(
        schema: impl Into<Arc<Schema>>,
        registry: impl Into<Arc<Registry>>,
    ) -> Result<Self, ProjectError> {
        Ok(Self::from_engine(SchemaValidator::new(schema, registry)?))
    }

    pub(crate) fn from_engine(engine: SchemaValidator) -> Self {
        Self {
            engine,
            request: RwLock::new(None),
        }
    }

    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.engine = self.engine.with_options(options);
        self
    }

    pub fn with_request(self, request: &HttpRequest) -> Self {
        self.bind(request);
        self
    }

    pub fn schema(&self) -> &Schema {
        self.engine.schema()
    }

    pub fn registry(&self) -> &Registry {
        self.engine.registry()
    }

    pub fn options(&self) -> ValidatorOptions {
        self.engine.options()
    }

    /// The request bound last, if any.
    pub fn request(&self) -> Option<Arc<HttpRequest>> {
        self.request.read().clone()
    }

    /// Validate `document` with the bound request as rule context.
    pub fn validate_document(&self, document: &JsonValue, mode: Mode) -> Outcome {
        let request = self.request();
        let ctx = ValidationContext::new(mode, request.as_deref());
        self.engine.validate(document, &ctx)
    }

    pub fn load(&self, request: &HttpRequest) -> Result<Document, ProjectError> {
        self.load_with(request, Mode::Create)
    }

    pub fn update_load(&self, request: &HttpRequest) -> Result<Document, ProjectError> {
        self.load_with(request, Mode::Update)
    }

    fn load_with(&self, request: &HttpRequest, mode: Mode) -> Result<Document, ProjectError> {
        self.bind(request);
        self.load_in_context(request, mode)
    }

    /// Validate the body of `request` without touching the bound slot.
    pub(crate) fn load_in_context(
        &self,
        request: &HttpRequest,
        mode: Mode,
    ) -> Result<Document, ProjectError> {
        let document = request.json()?;
        let ctx = ValidationContext::new(mode, Some(request));
        let document = self.engine.validate(&document, &ctx).into_result()?;
        log::debug!(
            "Loaded {} field(s) for {} {} ({:?})",
            document.len(),
            request.method,
            request.path,
            mode
        );
        Ok(document)
    }

    /// `load` as a view loader.
    pub fn load_fn(self: &Arc<Self>) -> LoadFn {
        let validator = Arc::clone(self);
        Arc::new(move |request: &HttpRequest| {
            validator.load(request).map(JsonValue::Object)
        })
    }

    /// `update_load` as a view loader.
    pub fn update_load_fn(self: &Arc<Self>) -> LoadFn {
        let validator = Arc::clone(self);
        Arc::new(move |request: &HttpRequest| {
            validator.update_load(request).map(JsonValue::Object)
        })
    }

    fn bind(&self, request: &HttpRequest) {
        *self.request.write() = Some(Arc::new(request.clone()));
    }
}

impl Validator for CerberusValidator {
    fn validate(&self, document: &JsonValue, ctx: &ValidationContext<'_>) -> Outcome {
        self.engine.validate(document, ctx)
    }
}
