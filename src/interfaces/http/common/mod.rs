//! Shared HTTP building blocks: response envelope, error mapping and the
//! validating JSON extractor.

pub mod errors;
pub mod params;
pub mod response;
pub mod validated_json;

pub use errors::{api_error, ApiError};
pub use params::{origin_spec, parse_mode};
pub use response::{ApiResponse, PaginatedResponse};
pub use validated_json::ValidatedJson;
