use serde_json::Value as JsonValue;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: JsonValue,
}

impl HttpResponse {
    pub fn json(&self) -> &JsonValue {
        &self.body
    }
}
