//! # CERBERUS APPLICATION GLUE
//!
//! Installs the error view that turns a [`ValidationError`] raised by a
//! loader into a `422 Unprocessable Entity` response whose JSON body is the
//! field-error collection.

use crate::app::App;
use crate::errors::ValidationError;
use crate::request::HttpRequest;
use crate::response::{json_response, HttpResponse};

pub const UNPROCESSABLE_ENTITY: u16 = 422;

/// Register the validation error view on `app`.
pub fn register(app: &mut App) -> &mut App {
    log::debug!("Registering validation error view");
    app.error_view::<ValidationError, _>(render_validation_error)
}

/// A fresh application with the validation error view registered.
pub fn app() -> App {
    let mut app = App::new();
    register(&mut app);
    app
}

pub fn render_validation_error(err: &ValidationError, request: &HttpRequest) -> HttpResponse {
    log::debug!(
        "Rejecting {} {} with {} field error(s)",
        request.method,
        request.path,
        err.errors().len()
    );
    json_response(UNPROCESSABLE_ENTITY, err.errors().to_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::loader;
    use crate::validation::{Registry, Schema};
    use serde_json::json;

    fn user_app() -> App {
        let schema = Schema::from_value(&json!({
            "name": {"type": "string", "minlength": 3, "required": true},
            "age": {"type": "integer", "min": 10, "required": true}
        }))
        .unwrap();
        let load = loader(schema, Registry::new(), None).unwrap().into_load_fn();

        let mut app = app();
        app.json("POST", "/", Some(load.clone()), |_request, json| Ok(json))
            .unwrap();
        app.json("PUT", "/", Some(load), |_request, json| Ok(json))
            .unwrap();
        app
    }

    #[test]
    fn test_validation_error_renders_422() {
        let response = user_app().handle(HttpRequest::post("/").with_json(json!({"name": "Another"})));
        assert_eq!(response.status_code, UNPROCESSABLE_ENTITY);
        assert_eq!(response.json(), &json!({"age": ["required field"]}));
    }

    #[test]
    fn test_valid_document_passes_through() {
        let response = user_app().handle(HttpRequest::put("/").with_json(json!({"age": 12})));
        assert_eq!(response.status_code, 200);
        assert_eq!(response.json(), &json!({"age": 12}));
    }

    #[test]
    fn test_other_errors_keep_their_status() {
        let response = user_app().handle(HttpRequest::post("/").with_body("not json"));
        assert_eq!(response.status_code, 400);
    }

    #[test]
    fn test_register_on_existing_app() {
        let mut app = App::new();
        app.json("POST", "/", None, |_request, _json| {
            Err(ValidationError::new(Default::default()).into())
        })
        .unwrap();
        assert_eq!(app.handle(HttpRequest::post("/")).status_code, 500);

        register(&mut app);
        let response = app.handle(HttpRequest::post("/"));
        assert_eq!(response.status_code, UNPROCESSABLE_ENTITY);
        assert_eq!(response.json(), &json!({}));
    }
}
