//! Tariff catalog: versioned rates per origin and transport mode

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
