//! # Freight Quote
//!
//! Air and sea freight quotations in USD. Tariffs are versioned per origin
//! entry point and transport mode; a quotation resolves the tariff valid
//! now and charges the larger of the weight and volume figures.
//!
//! ## Architecture
//!
//! - **domain**: models, the charge calculator, entry point mapping and
//!   repository traits
//! - **application**: use-cases (identity, tariff catalog, locations,
//!   quotations, audit)
//! - **infrastructure**: SeaORM persistence, migrations, JWT and bcrypt
//! - **interfaces**: axum REST API with OpenAPI documentation
//! - **server**: process lifecycle shared by the CLI

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::http::create_api_router;
