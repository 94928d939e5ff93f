//! # LOADER FACTORY
//!
//! Builds the `load` callable a JSON view declares. Every call validates the
//! request body with a fresh [`CerberusValidator`]; the request reaches
//! custom rules through the per-call context and is never copied into the
//! validator.
//!
//! **UPDATE MODE SELECTION**
//!
//! - `update: Some(true)` - always a partial update, `required` relaxed
//! - `update: Some(false)` - always a full document
//! - `update: None` - sensed per request: `PUT` and `PATCH` are updates
//!
//! Schema and registry are checked once, when the loader is built.

use crate::app::LoadFn;
use crate::errors::ProjectError;
use crate::request::HttpRequest;
use crate::types::{Document, Mode};
use crate::validation::{Registry, Schema, SchemaValidator, ValidatorOptions};
use crate::validator::CerberusValidator;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Build a loader for `schema` in one call.
pub fn loader(
    schema: impl Into<Arc<Schema>>,
    registry: impl Into<Arc<Registry>>,
    update: Option<bool>,
) -> Result<Loader, ProjectError> {
    LoaderBuilder::new(schema)
        .registry(registry)
        .update(update)
        .build()
}

#[derive(Debug, Clone)]
pub struct Loader {
    engine: SchemaValidator,
    update: Option<bool>,
}

impl Loader {
    pub fn builder(schema: impl Into<Arc<Schema>>) -> LoaderBuilder {
        LoaderBuilder::new(schema)
    }

    pub fn schema(&self) -> &Schema {
        self.engine.schema()
    }

    pub fn update(&self) -> Option<bool> {
        self.update
    }

    /// Mode `request` is validated in.
    pub fn mode_for(&self, request: &HttpRequest) -> Mode {
        self.update
            .map(Mode::from_update)
            .unwrap_or_else(|| Mode::for_method(&request.method))
    }

    pub fn load(&self, request: &HttpRequest) -> Result<Document, ProjectError> {
        let validator = CerberusValidator::from_engine(self.engine.clone());
        validator.load_in_context(request, self.mode_for(request))
    }

    pub fn into_load_fn(self) -> LoadFn {
        Arc::new(move |request: &HttpRequest| self.load(request).map(JsonValue::Object))
    }
}

#[derive(Debug)]
pub struct LoaderBuilder {
    schema: Arc<Schema>,
    registry: Arc<Registry>,
    options: ValidatorOptions,
    update: Option<bool>,
}

impl LoaderBuilder {
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        Self {
            schema: schema.into(),
            registry: Arc::new(Registry::new()),
            options: ValidatorOptions::default(),
            update: None,
        }
    }

    pub fn registry(mut self, registry: impl Into<Arc<Registry>>) -> Self {
        self.registry = registry.into();
        self
    }

    pub fn options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn update(mut self, update: Option<bool>) -> Self {
        self.update = update;
        self
    }

    pub fn build(self) -> Result<Loader, ProjectError> {
        let engine = SchemaValidator::new(self.schema, self.registry)?.with_options(self.options);
        Ok(Loader {
            engine,
            update: self.update,
        })
    }
}
