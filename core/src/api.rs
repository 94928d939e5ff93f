pub use crate::app::{App, HandlerFn, LoadFn};
pub use crate::cerberus_app::{app, register, render_validation_error, UNPROCESSABLE_ENTITY};
pub use crate::errors::{ProjectError, ValidationError};
pub use crate::loader::{loader, Loader, LoaderBuilder};
pub use crate::request::{HttpRequest, RequestBody};
pub use crate::response::{json_response, HttpResponse};
pub use crate::routing::{HttpMethod, RouteMatcher};
pub use crate::settings::Settings;
pub use crate::types::{Document, FieldError, FieldErrors, Mode};
pub use crate::validation::{
    FieldRules, JsonType, Outcome, Registry, RuleContext, Schema, SchemaValidator,
    ValidationContext, Validator, ValidatorOptions,
};
pub use crate::validator::CerberusValidator;
