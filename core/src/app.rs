//! # FORZIUM APPLICATION
//!
//! Minimal host framework: JSON views registered per method and path, an
//! application settings registry, and typed error views.
//!
//! A JSON view may declare a `load` callable. Dispatch hands the view
//! whatever `load` returns; without one the view receives the raw JSON body.
//! When a loader or view fails, dispatch walks the error and its
//! [`source`](std::error::Error::source) chain and renders the first match
//! among the registered error views. Anything unclaimed falls back to a
//! `{"error": {"code", "message"}}` body with [`ProjectError::status_code`].

use crate::errors::ProjectError;
use crate::request::HttpRequest;
use crate::response::{json_response, HttpResponse};
use crate::routing::{parse_route_pattern, RouteMatcher};
use crate::settings::Settings;
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;

/// Turns a request into the document a view consumes.
pub type LoadFn = Arc<dyn Fn(&HttpRequest) -> Result<JsonValue, ProjectError> + Send + Sync>;

/// View body: receives the request and the loaded document.
pub type HandlerFn =
    Arc<dyn Fn(&HttpRequest, JsonValue) -> Result<JsonValue, ProjectError> + Send + Sync>;

type RenderFn =
    Arc<dyn Fn(&(dyn Error + 'static), &HttpRequest) -> Option<HttpResponse> + Send + Sync>;

struct JsonView {
    load: Option<LoadFn>,
    handler: HandlerFn,
}

#[derive(Default)]
pub struct App {
    matcher: RouteMatcher,
    views: HashMap<String, JsonView>,
    settings: Arc<Settings>,
    error_views: Vec<RenderFn>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one application setting. Settings are shared with every request
    /// dispatched afterwards.
    pub fn setting(
        &mut self,
        section: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<JsonValue>,
    ) -> &mut Self {
        Arc::make_mut(&mut self.settings).set(section, name, value);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Arc::new(settings);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Register a JSON view for `method` on `path`.
    pub fn json<H>(
        &mut self,
        method: &str,
        path: &str,
        load: Option<LoadFn>,
        handler: H,
    ) -> Result<&mut Self, ProjectError>
    where
        H: Fn(&HttpRequest, JsonValue) -> Result<JsonValue, ProjectError> + Send + Sync + 'static,
    {
        let handler_id = format!("{} {}", method.to_uppercase(), path);
        if self.views.contains_key(&handler_id) {
            return Err(ProjectError::configuration(
                crate::validation::error_codes::INVALID_ROUTE_PATTERN,
                format!("View already registered for {}", handler_id),
            ));
        }

        let route = parse_route_pattern(path, method, &handler_id)?;
        self.matcher.add_route(route);
        self.views.insert(
            handler_id,
            JsonView {
                load,
                handler: Arc::new(handler),
            },
        );
        Ok(self)
    }

    /// Render errors of type `E` with `render`. Views registered earlier win.
    pub fn error_view<E, F>(&mut self, render: F) -> &mut Self
    where
        E: Error + 'static,
        F: Fn(&E, &HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        self.error_views.push(Arc::new(
            move |err: &(dyn Error + 'static), request: &HttpRequest| {
                err.downcast_ref::<E>().map(|typed| render(typed, request))
            },
        ));
        self
    }

    pub fn handle(&self, request: HttpRequest) -> HttpResponse {
        let mut request = request.with_settings(Arc::clone(&self.settings));
        log::debug!("Dispatching {} {}", request.method, request.path);

        match self.dispatch(&mut request) {
            Ok(body) => json_response(200, body),
            Err(err) => self.render_error(&err, &request),
        }
    }

    fn dispatch(&self, request: &mut HttpRequest) -> Result<JsonValue, ProjectError> {
        let found = self.matcher.match_route(&request.path, &request.method)?;
        request.path_params = found.path_params;
        let request: &HttpRequest = request;

        let view = self.views.get(&found.handler_id).ok_or_else(|| {
            ProjectError::system(
                crate::validation::error_codes::HANDLER_FAILED,
                format!("Route '{}' has no view", found.handler_id),
            )
        })?;

        let document = match &view.load {
            Some(load) => load(request)?,
            None => request.json()?,
        };
        (view.handler)(request, document)
    }

    fn render_error(&self, err: &ProjectError, request: &HttpRequest) -> HttpResponse {
        let mut current: Option<&(dyn Error + 'static)> = Some(err);
        while let Some(candidate) = current {
            if let Some(response) = self
                .error_views
                .iter()
                .find_map(|render| render(candidate, request))
            {
                return response;
            }
            current = candidate.source();
        }

        let status = err.status_code();
        if status >= 500 {
            log::warn!("Unhandled error for {} {}: {}", request.method, request.path, err);
        } else {
            log::debug!("Request {} {} rejected: {}", request.method, request.path, err);
        }
        json_response(
            status,
            json!({
                "error": {
                    "code": err.code(),
                    "message": err.to_string(),
                }
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use crate::types::FieldErrors;
    use serde_json::json;

    fn echo_app() -> App {
        let mut app = App::new();
        app.json("POST", "/echo", None, |_request, json| Ok(json))
            .unwrap();
        app
    }

    #[test]
    fn test_view_receives_raw_body_without_loader() {
        let response = echo_app().handle(HttpRequest::post("/echo").with_json(json!({"a": 1})));
        assert_eq!(response.status_code, 200);
        assert_eq!(response.json(), &json!({"a": 1}));
    }

    #[test]
    fn test_unknown_route_is_not_found() {
        let response = echo_app().handle(HttpRequest::get("/echo"));
        assert_eq!(response.status_code, 404);
        assert_eq!(
            response.json()["error"]["code"],
            crate::validation::error_codes::ROUTE_NOT_FOUND
        );
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        let response = echo_app().handle(HttpRequest::post("/echo").with_body("{oops"));
        assert_eq!(response.status_code, 400);
    }

    #[test]
    fn test_duplicate_view_is_rejected() {
        let mut app = echo_app();
        let result = app.json("post", "/echo", None, |_request, json| Ok(json));
        assert!(matches!(result, Err(ProjectError::Configuration { .. })));
    }

    #[test]
    fn test_unknown_method_is_a_configuration_error() {
        let mut app = App::new();
        let result = app.json("FETCH", "/echo", None, |_request, json| Ok(json));
        match result {
            Err(err @ ProjectError::Configuration { .. }) => assert_eq!(err.status_code(), 500),
            Err(other) => panic!("Expected configuration error, got {:?}", other),
            Ok(_) => panic!("Expected configuration error"),
        }
    }

    #[test]
    fn test_loader_output_reaches_view() {
        let mut app = App::new();
        let load: LoadFn = Arc::new(|request: &HttpRequest| -> Result<JsonValue, ProjectError> {
            Ok(json!({"entry": request.query("entry")}))
        });
        app.json("POST", "/", Some(load), |_request, json| Ok(json))
            .unwrap();

        let response = app.handle(HttpRequest::post("/?entry=Correct"));
        assert_eq!(response.json(), &json!({"entry": "Correct"}));
    }

    #[test]
    fn test_error_view_matches_source_chain() {
        let mut app = App::new();
        let load: LoadFn = Arc::new(|_request: &HttpRequest| -> Result<JsonValue, ProjectError> {
            let mut errors = FieldErrors::new();
            errors.push("age", "required field");
            Err(ProjectError::from(ValidationError::new(errors)))
        });
        app.json("POST", "/", Some(load), |_request, json| Ok(json))
            .unwrap();

        let unhandled = app.handle(HttpRequest::post("/"));
        assert_eq!(unhandled.status_code, 500);

        app.error_view::<ValidationError, _>(|err, _request| {
            json_response(422, err.errors().to_value())
        });
        let handled = app.handle(HttpRequest::post("/"));
        assert_eq!(handled.status_code, 422);
        assert_eq!(handled.json(), &json!({"age": ["required field"]}));
    }

    #[test]
    fn test_requests_see_app_settings() {
        let mut app = App::new();
        app.setting("email", "at", "@");
        app.json("GET", "/settings", None, |request, _json| {
            Ok(json!(request.settings().get_str("email", "at")))
        })
        .unwrap();

        let response = app.handle(HttpRequest::get("/settings"));
        assert_eq!(response.json(), &json!("@"));
    }
}
