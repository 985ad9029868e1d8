//! Origin locations (airports and seaports) and the country to entry
//! point mapping used for country-based quoting.

pub mod countries;
pub mod entry_point;
pub mod model;
pub mod repository;

pub use countries::WORLD_COUNTRIES;
pub use entry_point::{normalize_country, resolve_entry_point, EntryPoint, EntryPointTable};
pub use model::{LocationFilter, LocationKind, NewLocation, OriginLocation};
pub use repository::LocationRepository;
