//! Application settings registry.
//!
//! Settings are grouped in named sections, e.g. `email.at`. An [`App`] owns
//! one registry and shares it with every request it dispatches, so view code
//! and custom validation rules can read application-wide configuration.
//!
//! [`App`]: crate::app::App

use crate::errors::ProjectError;
use crate::validation::error_codes;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    sections: HashMap<String, HashMap<String, JsonValue>>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a `{"section": {"name": value}}` JSON document.
    pub fn from_value(value: JsonValue) -> Result<Self, ProjectError> {
        serde_json::from_value(value).map_err(|e| {
            ProjectError::configuration(
                error_codes::INVALID_SETTINGS,
                format!("Invalid settings document: {}", e),
            )
        })
    }

    pub fn set(
        &mut self,
        section: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<JsonValue>,
    ) {
        self.sections
            .entry(section.into())
            .or_default()
            .insert(name.into(), value.into());
    }

    pub fn get(&self, section: &str, name: &str) -> Option<&JsonValue> {
        self.sections.get(section)?.get(name)
    }

    pub fn get_str(&self, section: &str, name: &str) -> Option<&str> {
        self.get(section, name)?.as_str()
    }
}
