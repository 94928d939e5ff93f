//! # FORZIUM-CERBERUS
//!
//! **SCHEMA VALIDATION OF JSON REQUEST BODIES FOR FORZIUM VIEWS**
//!
//! **ARCHITECTURE**: Rule engine ([`validation`]), request-aware validator
//! ([`validator`]), loader factory ([`loader`]) and 422 error view
//! ([`cerberus_app`]) on top of a small host framework ([`app`])
//! **GUARANTEE**: Rejected documents never reach the view
//!
//! ```rust
//! use forzium_cerberus::api::*;
//! use serde_json::json;
//!
//! let schema = Schema::from_value(&json!({
//!     "name": {"type": "string", "required": true},
//!     "age": {"type": "integer", "min": 10, "required": true}
//! }))
//! .unwrap();
//!
//! let mut app = app();
//! let load = loader(schema, Registry::new(), None).unwrap().into_load_fn();
//! app.json("POST", "/", Some(load), |_request, json| Ok(json)).unwrap();
//!
//! let response = app.handle(HttpRequest::post("/").with_json(json!({"name": "Another"})));
//! assert_eq!(response.status_code, 422);
//! assert_eq!(response.json(), &json!({"age": ["required field"]}));
//! ```

pub mod api;
pub mod app;
pub mod cerberus_app;
pub mod errors;
pub mod loader;
pub mod request;
pub mod response;
pub mod routing;
pub mod settings;
pub mod types;

// **VALIDATION MODULE REGISTRATION**
pub mod validation;
pub mod validator;

#[cfg(test)]
mod tests {
    use crate::api::*;
    use serde_json::json;

    fn user_schema() -> Schema {
        Schema::new()
            .field(
                "name",
                FieldRules::new()
                    .of_type(JsonType::String)
                    .minlength(3)
                    .required(),
            )
            .field(
                "age",
                FieldRules::new().of_type(JsonType::Integer).min(10).required(),
            )
    }

    // **PIPELINE TESTS**
    #[test]
    fn test_validation_pipeline() {
        // **STEP 1**: Decode the body
        let request = HttpRequest::post("/").with_body(r#"{"name": "Somebody", "age": 22}"#);
        let body = request.json().unwrap();

        // **STEP 2**: Run the rule engine directly
        let engine = SchemaValidator::new(user_schema(), Registry::new()).unwrap();
        assert!(engine.validate(&body, &ValidationContext::create()).is_valid());

        // **STEP 3**: Load through the request-aware validator
        let validator = CerberusValidator::new(user_schema()).unwrap();
        let document = validator.load(&request).unwrap();
        assert_eq!(document.get("age"), Some(&json!(22)));
    }

    #[test]
    fn test_validation_error_propagation() {
        let validator = CerberusValidator::new(user_schema()).unwrap();
        let request = HttpRequest::post("/").with_json(json!({"name": "Sb", "age": 8}));

        match validator.load(&request).unwrap_err() {
            ProjectError::Invalid(err) => {
                assert_eq!(err.errors().messages("name"), vec!["min length is 3"]);
                assert_eq!(err.errors().messages("age"), vec!["min value is 10"]);
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_codes_surface_through_app() {
        let mut app = app();
        let load = loader(user_schema(), Registry::new(), None)
            .unwrap()
            .into_load_fn();
        app.json("POST", "/users", Some(load), |_request, json| Ok(json))
            .unwrap();

        let missing = app.handle(HttpRequest::get("/users"));
        assert_eq!(missing.status_code, 404);

        let rejected = app.handle(HttpRequest::post("/users").with_json(json!({})));
        assert_eq!(rejected.status_code, UNPROCESSABLE_ENTITY);
        assert_eq!(
            rejected.json(),
            &json!({"name": ["required field"], "age": ["required field"]})
        );
    }
}
