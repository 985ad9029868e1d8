//! Staff views: full quotation history, CSV export, dashboard, audit log

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
