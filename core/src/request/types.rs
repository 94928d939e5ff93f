use crate::errors::ProjectError;
use crate::request::parser::{parse_json_body, parse_query_string};
use crate::routing::HttpMethod;
use crate::settings::Settings;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

/// An in-flight request as seen by views and loaders.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
    pub path_params: HashMap<String, String>,
    pub body: RequestBody,
    settings: Arc<Settings>,
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(JsonValue),
    /// Undecoded bytes, parsed on first access through [`HttpRequest::json`].
    Raw(Vec<u8>),
}

impl HttpRequest {
    /// `target` may carry a query string, e.g. `/?entry=Correct`.
    pub fn new(method: HttpMethod, target: &str) -> Self {
        let (path, query_params) = match target.split_once('?') {
            Some((path, query)) => (path, parse_query_string(query)),
            None => (target, HashMap::new()),
        };

        Self {
            method,
            path: path.to_string(),
            headers: HashMap::new(),
            query_params,
            path_params: HashMap::new(),
            body: RequestBody::Empty,
            settings: Arc::new(Settings::default()),
        }
    }

    pub fn get(target: &str) -> Self {
        Self::new(HttpMethod::GET, target)
    }

    pub fn post(target: &str) -> Self {
        Self::new(HttpMethod::POST, target)
    }

    pub fn put(target: &str) -> Self {
        Self::new(HttpMethod::PUT, target)
    }

    pub fn patch(target: &str) -> Self {
        Self::new(HttpMethod::PATCH, target)
    }

    pub fn delete(target: &str) -> Self {
        Self::new(HttpMethod::DELETE, target)
    }

    pub fn with_json(mut self, value: JsonValue) -> Self {
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = RequestBody::Json(value);
        self
    }

    pub fn with_body(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.body = RequestBody::Raw(data.into());
        self
    }

    pub fn with_settings(mut self, settings: Arc<Settings>) -> Self {
        self.settings = settings;
        self
    }

    /// Decoded JSON body. An empty body decodes to `null`.
    pub fn json(&self) -> Result<JsonValue, ProjectError> {
        match &self.body {
            RequestBody::Empty => Ok(JsonValue::Null),
            RequestBody::Json(value) => Ok(value.clone()),
            RequestBody::Raw(data) => parse_json_body(data),
        }
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Settings of the application dispatching this request.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
