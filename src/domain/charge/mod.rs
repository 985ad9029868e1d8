//! Charge calculation
//!
//! Pure functions, no I/O.

pub mod calculator;

pub use calculator::{
    aggregate_pieces, compute_breakdown, compute_charge, ChargeBasis, ChargeBreakdown, Piece,
    PieceMeasure, ShipmentTotals, MAX_PIECES, MAX_PIECE_DIMENSION_CM, MAX_PIECE_WEIGHT_KG,
    MAX_VOLUME_M3, MAX_WEIGHT_KG,
};
