//! Tariff aggregate
//!
//! Versioned rates keyed by (origin, transport mode). A tariff is never
//! edited or deleted; a newer one supersedes it.

pub mod model;
pub mod repository;

pub use model::{NewTariff, Tariff, TariffFilter};
pub use repository::TariffRepository;
