use crate::errors::ProjectError;
use crate::validation::error_codes;
use std::collections::HashMap;

pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if !key.is_empty() => Some((
                    urlencoding::decode(&key.replace('+', " ")).ok()?.into_owned(),
                    urlencoding::decode(&value.replace('+', " ")).ok()?.into_owned(),
                )),
                _ => None,
            }
        })
        .collect()
}

pub fn parse_json_body(data: &[u8]) -> Result<serde_json::Value, ProjectError> {
    serde_json::from_slice(data).map_err(|e| ProjectError::Validation {
        code: error_codes::INVALID_JSON.to_string(),
        message: format!("Invalid JSON: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_string_simple() {
        let query = "key1=value1&key2=value2";
        let result = parse_query_string(query);
        assert_eq!(result.get("key1"), Some(&"value1".to_string()));
        assert_eq!(result.get("key2"), Some(&"value2".to_string()));
    }

    #[test]
    fn test_parse_query_string_encoded() {
        let query = "name=John%20Doe&city=New+York";
        let result = parse_query_string(query);
        assert_eq!(result.get("name"), Some(&"John Doe".to_string()));
        assert_eq!(result.get("city"), Some(&"New York".to_string()));
    }

    #[test]
    fn test_parse_query_string_keeps_equals_in_value() {
        let result = parse_query_string("filter=a=b");
        assert_eq!(result.get("filter"), Some(&"a=b".to_string()));
    }

    #[test]
    fn test_parse_query_string_empty() {
        assert!(parse_query_string("").is_empty());
    }

    #[test]
    fn test_parse_json_body_valid() {
        let json_data = br#"{"name": "test", "value": 42}"#;
        let result = parse_json_body(json_data).unwrap();
        assert_eq!(result["name"], "test");
        assert_eq!(result["value"], 42);
    }

    #[test]
    fn test_parse_json_body_invalid() {
        let json_data = br#"{"name": "test", invalid}"#;
        match parse_json_body(json_data) {
            Err(ProjectError::Validation { code, .. }) => {
                assert_eq!(code, error_codes::INVALID_JSON)
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }
}
