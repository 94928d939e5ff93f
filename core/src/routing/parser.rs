use crate::errors::ProjectError;
use crate::routing::types::{HttpMethod, Route};
use crate::validation::error_codes;
use regex::Regex;

pub fn parse_route_pattern(
    pattern: &str,
    method: &str,
    handler_id: &str,
) -> Result<Route, ProjectError> {
    let mut regex_pattern = String::from("^");
    let mut param_names = Vec::new();

    for part in pattern.split('/').filter(|part| !part.is_empty()) {
        regex_pattern.push('/');
        if part.starts_with('{') && part.ends_with('}') && part.len() > 2 {
            let param_name = &part[1..part.len() - 1];
            param_names.push(param_name.to_string());
            regex_pattern.push_str(r"([^/]+)");
        } else {
            regex_pattern.push_str(&regex::escape(part));
        }
    }
    // Root and trailing slashes collapse to the same route.
    regex_pattern.push_str("/?$");

    let path_regex = Regex::new(&regex_pattern).map_err(|e| {
        ProjectError::configuration(
            error_codes::INVALID_ROUTE_PATTERN,
            format!("Invalid route pattern: {}", e),
        )
    })?;

    Ok(Route {
        path: pattern.to_string(),
        method: parse_http_method(method)?,
        handler_id: handler_id.to_string(),
        path_regex,
        param_names,
    })
}

pub fn parse_http_method(method: &str) -> Result<HttpMethod, ProjectError> {
    match method.to_uppercase().as_str() {
        "GET" => Ok(HttpMethod::GET),
        "POST" => Ok(HttpMethod::POST),
        "PUT" => Ok(HttpMethod::PUT),
        "DELETE" => Ok(HttpMethod::DELETE),
        "PATCH" => Ok(HttpMethod::PATCH),
        "HEAD" => Ok(HttpMethod::HEAD),
        "OPTIONS" => Ok(HttpMethod::OPTIONS),
        "TRACE" => Ok(HttpMethod::TRACE),
        _ => Err(ProjectError::configuration(
            error_codes::INVALID_HTTP_METHOD,
            format!("Invalid HTTP method: {}", method),
        )),
    }
}
