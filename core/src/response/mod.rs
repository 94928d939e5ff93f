pub mod serializer;
pub mod types;

pub use serializer::json_response;
pub use types::HttpResponse;
