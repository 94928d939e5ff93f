pub mod matcher;
pub mod parser;
pub mod types;

pub use matcher::RouteMatcher;
pub use parser::{parse_http_method, parse_route_pattern};
pub use types::{HttpMethod, Route, RouteMatch};
