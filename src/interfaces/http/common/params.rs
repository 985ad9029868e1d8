//! Parsing helpers shared by request DTOs

use crate::application::OriginSpec;
use crate::domain::{DomainError, TransportMode};

pub fn parse_mode(raw: &str) -> Result<TransportMode, DomainError> {
    raw.parse()
}

/// An origin is given either as an entry point code or as a country,
/// never both.
pub fn origin_spec(origin: Option<String>, country: Option<String>) -> Result<OriginSpec, DomainError> {
    let origin = origin.filter(|o| !o.trim().is_empty());
    let country = country.filter(|c| !c.trim().is_empty());
    match (origin, country) {
        (Some(code), None) => Ok(OriginSpec::Code(code)),
        (None, Some(country)) => Ok(OriginSpec::Country(country)),
        (Some(_), Some(_)) => Err(DomainError::Validation(
            "give either origin or origin_country, not both".into(),
        )),
        (None, None) => Err(DomainError::Validation(
            "origin or origin_country is required".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_origin_form() {
        assert!(matches!(
            origin_spec(Some("BOG".into()), None),
            Ok(OriginSpec::Code(c)) if c == "BOG"
        ));
        assert!(matches!(
            origin_spec(Some(" ".into()), Some("Peru".into())),
            Ok(OriginSpec::Country(c)) if c == "Peru"
        ));
        assert!(origin_spec(Some("BOG".into()), Some("Colombia".into())).is_err());
        assert!(origin_spec(None, None).is_err());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert_eq!(parse_mode("sea").unwrap(), TransportMode::Sea);
        assert!(parse_mode("rail").is_err());
    }
}
