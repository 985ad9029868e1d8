//! Origin location catalog (airports and seaports)

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
