//! Transport modes shared by tariffs, quotations and locations

pub mod mode;

pub use mode::TransportMode;
