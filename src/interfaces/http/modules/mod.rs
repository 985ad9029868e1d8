//! HTTP feature modules, one per resource

pub mod admin;
pub mod auth;
pub mod health;
pub mod locations;
pub mod metrics;
pub mod quotations;
pub mod request_id;
pub mod tariffs;
pub mod users;
