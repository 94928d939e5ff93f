use crate::types::FieldErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("VALIDATION ERROR: {code} - {message}")]
    Validation { code: String, message: String },

    #[error("NOT FOUND ERROR: {code} - {message}")]
    NotFound { code: String, message: String },

    #[error("CONFIGURATION ERROR: {code} - {message}")]
    Configuration { code: String, message: String },

    #[error("INVALID DOCUMENT: {0}")]
    Invalid(#[from] ValidationError),

    #[error("SYSTEM ERROR: {code} - {message}")]
    System { code: String, message: String },
}

impl ProjectError {
    pub fn configuration(code: &str, message: impl Into<String>) -> Self {
        Self::Configuration {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn system(code: &str, message: impl Into<String>) -> Self {
        Self::System {
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Status used when no error view claims the error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::Configuration { .. } | Self::Invalid(_) | Self::System { .. } => 500,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Validation { code, .. }
            | Self::NotFound { code, .. }
            | Self::Configuration { code, .. }
            | Self::System { code, .. } => code,
            Self::Invalid(_) => crate::validation::error_codes::DOCUMENT_INVALID,
        }
    }
}

/// Field-level validation failure.
///
/// Carries exactly one field-error collection, the complete result of a
/// single validation pass. Rendered by the error view that
/// [`crate::cerberus_app::register`] installs.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("document failed validation on {}", .errors.field_names().join(", "))]
pub struct ValidationError {
    errors: FieldErrors,
}

impl ValidationError {
    pub fn new(errors: FieldErrors) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}
