use crate::response::types::HttpResponse;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

pub fn json_response(status: u16, value: JsonValue) -> HttpResponse {
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());

    HttpResponse {
        status_code: status,
        headers,
        body: value,
    }
}
