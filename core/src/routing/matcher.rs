use crate::errors::ProjectError;
use crate::routing::types::{HttpMethod, Route, RouteMatch};
use crate::validation::error_codes;
use std::collections::HashMap;

pub struct RouteMatcher {
    routes: Vec<Route>,
}

impl RouteMatcher {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn match_route(&self, path: &str, method: &HttpMethod) -> Result<RouteMatch, ProjectError> {
        for route in &self.routes {
            if route.method != *method {
                continue;
            }

            if let Some(captures) = route.path_regex.captures(path) {
                let mut path_params = HashMap::new();
                for (i, param_name) in route.param_names.iter().enumerate() {
                    if let Some(value) = captures.get(i + 1) {
                        path_params.insert(param_name.clone(), value.as_str().to_string());
                    }
                }

                return Ok(RouteMatch {
                    handler_id: route.handler_id.clone(),
                    path_params,
                });
            }
        }

        Err(ProjectError::NotFound {
            code: error_codes::ROUTE_NOT_FOUND.to_string(),
            message: format!("No route found for {} {}", method, path),
        })
    }
}

impl Default for RouteMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::parse_route_pattern;

    #[test]
    fn test_match_respects_method() {
        let mut matcher = RouteMatcher::new();
        matcher.add_route(parse_route_pattern("/user", "POST", "user_post").unwrap());
        matcher.add_route(parse_route_pattern("/user", "PUT", "user_put").unwrap());

        let found = matcher.match_route("/user", &HttpMethod::PUT).unwrap();
        assert_eq!(found.handler_id, "user_put");

        let missing = matcher.match_route("/user", &HttpMethod::DELETE);
        assert!(matches!(missing, Err(ProjectError::NotFound { .. })));
    }

    #[test]
    fn test_match_extracts_params() {
        let mut matcher = RouteMatcher::new();
        matcher.add_route(parse_route_pattern("/documents/{id}", "GET", "doc").unwrap());

        let found = matcher.match_route("/documents/7", &HttpMethod::GET).unwrap();
        assert_eq!(found.path_params.get("id"), Some(&"7".to_string()));
    }
}
