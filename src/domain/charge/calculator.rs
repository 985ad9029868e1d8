//! Chargeable dimension and amount for a shipment under a tariff.
//!
//! Air freight bills on kilograms, sea freight on cubic metres. The
//! volumetric factor (kg per m³) converts between the two so that bulky
//! light cargo is billed on its space and dense cargo on its mass.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::shipping::TransportMode;
use crate::domain::tariff::Tariff;
use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

pub const MAX_PIECES: usize = 200;
pub const MAX_PIECE_WEIGHT_KG: i64 = 100_000;
pub const MAX_PIECE_DIMENSION_CM: i64 = 100_000;
/// Totals a full shipment of maximal pieces can reach
pub const MAX_WEIGHT_KG: i64 = 20_000_000;
pub const MAX_VOLUME_M3: i64 = 200_000_000_000;

const CM3_PER_M3: i64 = 1_000_000;

/// Which dimension the amount was billed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeBasis {
    Weight,
    Volume,
}

impl ChargeBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weight => "WEIGHT",
            Self::Volume => "VOLUME",
        }
    }
}

impl fmt::Display for ChargeBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChargeBasis {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WEIGHT" => Ok(Self::Weight),
            "VOLUME" => Ok(Self::Volume),
            other => Err(DomainError::Validation(format!("Unknown charge basis '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChargeBreakdown {
    pub basis: ChargeBasis,
    /// kg for air, m³ for sea
    pub chargeable_value: Decimal,
    pub volumetric_weight_kg: Decimal,
    pub rate_usd: Decimal,
    pub amount_usd: Decimal,
}

fn ensure_inputs(weight_kg: Decimal, volume_m3: Decimal, factor: Decimal) -> DomainResult<()> {
    if weight_kg < Decimal::ZERO {
        return Err(DomainError::InvalidInput(format!(
            "weight_kg must be >= 0, got {}",
            weight_kg
        )));
    }
    if volume_m3 < Decimal::ZERO {
        return Err(DomainError::InvalidInput(format!(
            "volume_m3 must be >= 0, got {}",
            volume_m3
        )));
    }
    if factor <= Decimal::ZERO {
        return Err(DomainError::InvalidInput(format!(
            "volumetric_factor must be > 0, got {}",
            factor
        )));
    }
    if weight_kg > Decimal::from(MAX_WEIGHT_KG) {
        return Err(DomainError::InvalidInput(format!(
            "weight_kg must be <= {}, got {}",
            MAX_WEIGHT_KG, weight_kg
        )));
    }
    if volume_m3 > Decimal::from(MAX_VOLUME_M3) {
        return Err(DomainError::InvalidInput(format!(
            "volume_m3 must be <= {}, got {}",
            MAX_VOLUME_M3, volume_m3
        )));
    }
    Ok(())
}

/// Decimal arithmetic overflows at ~7.9e28; surface that as bad input.
fn in_range(value: Option<Decimal>, what: &str) -> DomainResult<Decimal> {
    value.ok_or_else(|| DomainError::InvalidInput(format!("{} is out of range", what)))
}

fn money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn quantize(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Full calculation with the billed dimension.
///
/// The amount is computed from the unrounded chargeable value and then
/// rounded half-up to cents.
pub fn compute_breakdown(
    weight_kg: Decimal,
    volume_m3: Decimal,
    volumetric_factor: Decimal,
    tariff: &Tariff,
) -> DomainResult<ChargeBreakdown> {
    ensure_inputs(weight_kg, volume_m3, volumetric_factor)?;

    let volumetric_weight = in_range(volume_m3.checked_mul(volumetric_factor), "volumetric weight")?;

    let (basis, chargeable, dp) = match tariff.mode {
        TransportMode::Air => {
            if volumetric_weight > weight_kg {
                (ChargeBasis::Volume, volumetric_weight, 3)
            } else {
                (ChargeBasis::Weight, weight_kg, 3)
            }
        }
        TransportMode::Sea => {
            let weight_as_volume =
                in_range(weight_kg.checked_div(volumetric_factor), "weight as volume")?;
            if weight_as_volume > volume_m3 {
                (ChargeBasis::Weight, weight_as_volume, 6)
            } else {
                (ChargeBasis::Volume, volume_m3, 6)
            }
        }
    };

    let amount = in_range(chargeable.checked_mul(tariff.rate_usd), "amount")?;

    Ok(ChargeBreakdown {
        basis,
        chargeable_value: quantize(chargeable, dp),
        volumetric_weight_kg: quantize(volumetric_weight, 3),
        rate_usd: tariff.rate_usd,
        amount_usd: money(amount),
    })
}

/// Billable USD amount for a shipment.
pub fn compute_charge(
    weight_kg: Decimal,
    volume_m3: Decimal,
    volumetric_factor: Decimal,
    tariff: &Tariff,
) -> DomainResult<Decimal> {
    compute_breakdown(weight_kg, volume_m3, volumetric_factor, tariff).map(|b| b.amount_usd)
}

/// One physical package as entered by the user
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub weight_kg: Decimal,
    pub length_cm: Decimal,
    pub width_cm: Decimal,
    pub height_cm: Decimal,
}

/// Piece with derived volume figures
#[derive(Debug, Clone, PartialEq)]
pub struct PieceMeasure {
    pub piece: Piece,
    pub volume_m3: Decimal,
    pub volumetric_weight_kg: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentTotals {
    pub items: Vec<PieceMeasure>,
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
    pub volumetric_weight_kg: Decimal,
}

/// Sum pieces into shipment totals. Volume is L×W×H in cm converted to m³.
pub fn aggregate_pieces(pieces: &[Piece], volumetric_factor: Decimal) -> DomainResult<ShipmentTotals> {
    if pieces.is_empty() || pieces.len() > MAX_PIECES {
        return Err(DomainError::InvalidInput(format!(
            "a shipment needs between 1 and {} pieces, got {}",
            MAX_PIECES,
            pieces.len()
        )));
    }
    if volumetric_factor <= Decimal::ZERO {
        return Err(DomainError::InvalidInput(format!(
            "volumetric_factor must be > 0, got {}",
            volumetric_factor
        )));
    }

    let per_m3 = Decimal::from(CM3_PER_M3);
    let mut items = Vec::with_capacity(pieces.len());
    let mut weight = Decimal::ZERO;
    let mut volume = Decimal::ZERO;

    for (idx, piece) in pieces.iter().enumerate() {
        for (name, value, max) in [
            ("weight_kg", piece.weight_kg, MAX_PIECE_WEIGHT_KG),
            ("length_cm", piece.length_cm, MAX_PIECE_DIMENSION_CM),
            ("width_cm", piece.width_cm, MAX_PIECE_DIMENSION_CM),
            ("height_cm", piece.height_cm, MAX_PIECE_DIMENSION_CM),
        ] {
            if value <= Decimal::ZERO || value > Decimal::from(max) {
                return Err(DomainError::InvalidInput(format!(
                    "piece {}: {} must be > 0 and <= {}",
                    idx + 1,
                    name,
                    max
                )));
            }
        }

        // Bounded above, so L×W×H stays far below the Decimal limit
        let piece_volume = piece.length_cm * piece.width_cm * piece.height_cm / per_m3;
        let piece_volumetric = in_range(piece_volume.checked_mul(volumetric_factor), "volumetric weight")?;
        weight += piece.weight_kg;
        volume += piece_volume;
        items.push(PieceMeasure {
            piece: piece.clone(),
            volume_m3: quantize(piece_volume, 6),
            volumetric_weight_kg: quantize(piece_volumetric, 3),
        });
    }

    let volumetric_total = in_range(volume.checked_mul(volumetric_factor), "volumetric weight")?;

    Ok(ShipmentTotals {
        items,
        weight_kg: weight,
        volume_m3: volume,
        volumetric_weight_kg: quantize(volumetric_total, 3),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn tariff(mode: TransportMode, rate: Decimal) -> Tariff {
        Tariff {
            id: 1,
            origin: "X".into(),
            mode,
            rate_usd: rate,
            valid_from: Utc::now(),
            valid_until: None,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    fn d(units: i64) -> Decimal {
        Decimal::from(units)
    }

    #[test]
    fn air_dense_cargo_bills_on_weight() {
        let t = tariff(TransportMode::Air, d(5));
        let b = compute_breakdown(d(100), Decimal::new(1, 1), d(167), &t).unwrap();
        assert_eq!(b.basis, ChargeBasis::Weight);
        assert_eq!(b.volumetric_weight_kg, Decimal::new(167, 1));
        assert_eq!(b.chargeable_value, d(100));
        assert_eq!(b.amount_usd, d(500));
    }

    #[test]
    fn air_bulky_cargo_bills_on_volume() {
        let t = tariff(TransportMode::Air, d(5));
        let b = compute_breakdown(d(10), d(2), d(167), &t).unwrap();
        assert_eq!(b.basis, ChargeBasis::Volume);
        assert_eq!(b.chargeable_value, d(334));
        assert_eq!(b.amount_usd, d(1670));
    }

    #[test]
    fn sea_uses_weight_over_factor() {
        let t = tariff(TransportMode::Sea, d(40));
        // 1670 kg / 167 = 10 m³ > 2 m³
        let b = compute_breakdown(d(1670), d(2), d(167), &t).unwrap();
        assert_eq!(b.basis, ChargeBasis::Weight);
        assert_eq!(b.chargeable_value, d(10));
        assert_eq!(b.amount_usd, d(400));

        let b = compute_breakdown(d(100), d(3), d(167), &t).unwrap();
        assert_eq!(b.basis, ChargeBasis::Volume);
        assert_eq!(b.amount_usd, d(120));
    }

    #[test]
    fn amount_rounds_half_up_to_cents() {
        let t = tariff(TransportMode::Air, Decimal::new(1, 2)); // 0.01
        // 0.5 kg * 0.01 = 0.005 -> 0.01
        let amount = compute_charge(Decimal::new(5, 1), Decimal::ZERO, d(167), &t).unwrap();
        assert_eq!(amount, Decimal::new(1, 2));
    }

    #[test]
    fn zero_shipment_costs_nothing() {
        let t = tariff(TransportMode::Air, d(5));
        assert_eq!(compute_charge(d(0), d(0), d(167), &t).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn rejects_negative_and_zero_factor() {
        let t = tariff(TransportMode::Air, d(5));
        assert!(matches!(
            compute_charge(d(-1), d(0), d(167), &t),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            compute_charge(d(1), d(-1), d(167), &t),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            compute_charge(d(1), d(1), d(0), &t),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn aggregates_pieces_in_cubic_metres() {
        let pieces = vec![
            Piece {
                weight_kg: d(10),
                length_cm: d(100),
                width_cm: d(50),
                height_cm: d(40),
            },
            Piece {
                weight_kg: Decimal::new(25, 1),
                length_cm: d(20),
                width_cm: d(20),
                height_cm: d(20),
            },
        ];
        let totals = aggregate_pieces(&pieces, d(167)).unwrap();
        assert_eq!(totals.weight_kg, Decimal::new(125, 1));
        // 0.2 + 0.008
        assert_eq!(totals.volume_m3, Decimal::new(208, 3));
        assert_eq!(totals.items[0].volume_m3, Decimal::new(2, 1));
        assert_eq!(totals.items[1].volumetric_weight_kg, Decimal::new(1336, 3));
        assert_eq!(totals.volumetric_weight_kg, Decimal::new(34736, 3));
    }

    #[test]
    fn piece_bounds_are_enforced() {
        assert!(aggregate_pieces(&[], d(167)).is_err());

        let piece = Piece {
            weight_kg: d(1),
            length_cm: d(1),
            width_cm: d(1),
            height_cm: d(1),
        };
        let too_many = vec![piece.clone(); MAX_PIECES + 1];
        assert!(aggregate_pieces(&too_many, d(167)).is_err());

        let flat = Piece {
            height_cm: d(0),
            ..piece
        };
        let err = aggregate_pieces(&[flat], d(167)).unwrap_err();
        assert!(err.to_string().contains("height_cm"));
    }

    #[test]
    fn oversized_inputs_are_rejected_not_overflowed() {
        let t = tariff(TransportMode::Air, d(5));
        assert!(matches!(
            compute_breakdown(Decimal::MAX, d(0), d(167), &t),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            compute_breakdown(d(1), Decimal::MAX, d(167), &t),
            Err(DomainError::InvalidInput(_))
        ));

        let sea = tariff(TransportMode::Sea, d(40));
        assert!(matches!(
            compute_breakdown(Decimal::MAX, d(1), d(167), &sea),
            Err(DomainError::InvalidInput(_))
        ));

        // In bounds, but the factor pushes the product past the Decimal range
        assert!(matches!(
            compute_breakdown(d(1), d(MAX_VOLUME_M3), Decimal::MAX, &t),
            Err(DomainError::InvalidInput(_))
        ));
        let pricey = tariff(TransportMode::Air, Decimal::MAX);
        assert!(matches!(
            compute_breakdown(d(MAX_WEIGHT_KG), d(0), d(167), &pricey),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn largest_allowed_shipment_is_priced() {
        let t = tariff(TransportMode::Air, Decimal::new(99_999_999_9999, 4));
        let b = compute_breakdown(d(MAX_WEIGHT_KG), d(MAX_VOLUME_M3), d(167), &t).unwrap();
        assert_eq!(b.basis, ChargeBasis::Volume);

        let big = Piece {
            weight_kg: d(MAX_PIECE_WEIGHT_KG),
            length_cm: d(MAX_PIECE_DIMENSION_CM),
            width_cm: d(MAX_PIECE_DIMENSION_CM),
            height_cm: d(MAX_PIECE_DIMENSION_CM),
        };
        let totals = aggregate_pieces(&vec![big; MAX_PIECES], d(167)).unwrap();
        assert_eq!(totals.weight_kg, d(MAX_WEIGHT_KG));
        assert_eq!(totals.volume_m3, d(MAX_VOLUME_M3));
    }

    #[test]
    fn piece_above_limit_is_rejected() {
        let piece = Piece {
            weight_kg: d(1),
            length_cm: d(MAX_PIECE_DIMENSION_CM + 1),
            width_cm: d(1),
            height_cm: d(1),
        };
        let err = aggregate_pieces(&[piece.clone()], d(167)).unwrap_err();
        assert!(err.to_string().contains("length_cm"));

        let heavy = Piece {
            weight_kg: Decimal::MAX,
            length_cm: d(1),
            ..piece
        };
        let err = aggregate_pieces(&[heavy], d(167)).unwrap_err();
        assert!(err.to_string().contains("weight_kg"));
    }

    proptest! {
        #[test]
        fn charge_is_monotone_in_weight(
            w in 0i64..1_000_000,
            extra in 0i64..1_000_000,
            v in 0i64..100_000,
            sea in any::<bool>(),
        ) {
            let mode = if sea { TransportMode::Sea } else { TransportMode::Air };
            let t = tariff(mode, Decimal::new(575, 2));
            let vol = Decimal::new(v, 3);
            let lo = compute_charge(Decimal::new(w, 2), vol, d(167), &t).unwrap();
            let hi = compute_charge(Decimal::new(w + extra, 2), vol, d(167), &t).unwrap();
            prop_assert!(hi >= lo);
        }

        #[test]
        fn charge_is_monotone_in_volume(
            w in 0i64..1_000_000,
            v in 0i64..100_000,
            extra in 0i64..100_000,
            sea in any::<bool>(),
        ) {
            let mode = if sea { TransportMode::Sea } else { TransportMode::Air };
            let t = tariff(mode, Decimal::new(575, 2));
            let weight = Decimal::new(w, 2);
            let lo = compute_charge(weight, Decimal::new(v, 3), d(167), &t).unwrap();
            let hi = compute_charge(weight, Decimal::new(v + extra, 3), d(167), &t).unwrap();
            prop_assert!(hi >= lo);
        }

        #[test]
        fn charge_never_below_either_dimension(
            w in 0i64..1_000_000,
            v in 0i64..100_000,
        ) {
            let t = tariff(TransportMode::Air, d(2));
            let weight = Decimal::new(w, 2);
            let volume = Decimal::new(v, 3);
            let amount = compute_charge(weight, volume, d(167), &t).unwrap();
            prop_assert!(amount >= (weight * d(2)).round_dp(2));
            prop_assert!(amount >= (volume * d(167) * d(2)).round_dp(2));
        }
    }
}
