//! Country to entry point mapping.
//!
//! A configured table names the preferred airport/seaport per country.
//! Countries without an entry get a technical entry point whose code is
//! derived from a hash of mode and country, so the same input always maps
//! to the same code. Only known countries get one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::countries::WORLD_COUNTRIES;
use super::model::LocationKind;
use crate::domain::shipping::TransportMode;

/// Static mapping configured by operators
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryPointTable {
    /// Country name -> airport code
    pub air: HashMap<String, String>,
    /// Country name -> seaport code
    pub sea: HashMap<String, String>,
    /// Alternate spelling or ISO code -> canonical country name
    pub aliases: HashMap<String, String>,
    /// Names accepted in addition to the built-in country list
    pub extra_countries: Vec<String>,
}

impl EntryPointTable {
    fn codes_for(&self, mode: TransportMode) -> &HashMap<String, String> {
        match mode {
            TransportMode::Air => &self.air,
            TransportMode::Sea => &self.sea,
        }
    }

    fn known_country(&self, raw: &str) -> Option<&str> {
        self.air
            .keys()
            .chain(self.sea.keys())
            .chain(self.extra_countries.iter())
            .map(String::as_str)
            .chain(WORLD_COUNTRIES.iter().copied())
            .find(|c| c.eq_ignore_ascii_case(raw))
    }

    /// Whether `country` (already normalized) may be used as an origin
    pub fn is_known_country(&self, country: &str) -> bool {
        !country.is_empty() && self.known_country(country).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub code: String,
    pub name: String,
    pub country: String,
    pub kind: LocationKind,
    /// True when no configured code existed for the country
    pub generated: bool,
}

/// Canonical country name for user input. Trims, then resolves aliases
/// and known country names case-insensitively. Unknown input is returned
/// trimmed.
pub fn normalize_country(raw: &str, table: &EntryPointTable) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if let Some((_, canonical)) = table
        .aliases
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
    {
        return canonical.clone();
    }

    table
        .known_country(trimmed)
        .map(str::to_string)
        .unwrap_or_else(|| trimmed.to_string())
}

/// Technical code for a country without a configured entry point:
/// `AIR-`/`SEA-` followed by the first ten upper-case hex digits of
/// SHA-256 over `"<MODE>:<country>"`.
pub fn generated_code(country: &str, mode: TransportMode) -> String {
    let digest = Sha256::digest(format!("{}:{}", mode.code_prefix(), country).as_bytes());
    let hex = hex::encode_upper(digest);
    format!("{}-{}", mode.code_prefix(), &hex[..10])
}

fn generated_name(country: &str, mode: TransportMode) -> String {
    match mode {
        TransportMode::Air => format!("Main hub {}", country),
        TransportMode::Sea => format!("Main port {}", country),
    }
}

/// Entry point serving `country` for `mode`. `country` is expected to be
/// normalized already.
pub fn resolve_entry_point(country: &str, mode: TransportMode, table: &EntryPointTable) -> EntryPoint {
    let kind = LocationKind::for_mode(mode);

    let configured = table
        .codes_for(mode)
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(country));

    match configured {
        Some((canonical, code)) => EntryPoint {
            code: code.clone(),
            name: code.clone(),
            country: canonical.clone(),
            kind,
            generated: false,
        },
        None => EntryPoint {
            code: generated_code(country, mode),
            name: generated_name(country, mode),
            country: country.to_string(),
            kind,
            generated: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> EntryPointTable {
        let mut t = EntryPointTable::default();
        t.air.insert("Colombia".into(), "BOG".into());
        t.sea.insert("Colombia".into(), "CTG".into());
        t.aliases.insert("CO".into(), "Colombia".into());
        t
    }

    #[test]
    fn normalizes_aliases_and_case() {
        let t = table();
        assert_eq!(normalize_country("  co ", &t), "Colombia");
        assert_eq!(normalize_country("COLOMBIA", &t), "Colombia");
        assert_eq!(normalize_country(" Peru ", &t), "Peru");
        assert_eq!(normalize_country("   ", &t), "");
    }

    #[test]
    fn known_countries() {
        let mut t = table();
        assert!(t.is_known_country("Peru"));
        assert!(t.is_known_country(&normalize_country("united states", &t)));
        assert_eq!(normalize_country("united states", &t), "United States");
        assert!(!t.is_known_country("Colmbia"));
        assert!(!t.is_known_country(""));

        t.extra_countries.push("Atlantis".into());
        assert!(t.is_known_country("atlantis"));
        assert_eq!(normalize_country("ATLANTIS", &t), "Atlantis");
    }

    #[test]
    fn configured_code_wins() {
        let t = table();
        let air = resolve_entry_point("Colombia", TransportMode::Air, &t);
        assert_eq!(air.code, "BOG");
        assert_eq!(air.kind, LocationKind::Airport);
        assert!(!air.generated);

        let sea = resolve_entry_point("Colombia", TransportMode::Sea, &t);
        assert_eq!(sea.code, "CTG");
        assert_eq!(sea.kind, LocationKind::Seaport);
    }

    #[test]
    fn fallback_is_deterministic() {
        let t = table();
        let a = resolve_entry_point("Peru", TransportMode::Air, &t);
        let b = resolve_entry_point("Peru", TransportMode::Air, &t);
        assert_eq!(a, b);
        assert!(a.generated);
        assert_eq!(a.name, "Main hub Peru");
        assert!(a.code.starts_with("AIR-"));
        assert_eq!(a.code.len(), 14);
        assert!(a.code[4..]
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));

        let sea = resolve_entry_point("Peru", TransportMode::Sea, &t);
        assert_eq!(sea.name, "Main port Peru");
        assert!(sea.code.starts_with("SEA-"));
        assert_ne!(a.code[4..], sea.code[4..]);
    }

    #[test]
    fn generated_code_matches_hash() {
        let digest = Sha256::digest(b"AIR:Peru");
        let expected = format!("AIR-{}", &hex::encode_upper(digest)[..10]);
        assert_eq!(generated_code("Peru", TransportMode::Air), expected);
    }
}
