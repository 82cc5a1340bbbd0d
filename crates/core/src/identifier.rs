//! Patient identifiers and their issuance.
//!
//! Records are keyed by a short numeric identifier that patients type in to log in. The
//! *canonical* identifier form is **exactly 5 ASCII digits with a non-zero first digit**, i.e.
//! the decimal rendering of an integer in `10000..=99999`.
//!
//! This module provides:
//! - A small wrapper type ([`PatientId`]) that guarantees the canonical form once constructed.
//! - The [`IdentifierGenerator`] seam used by the session controller to issue identifiers at
//!   intake, with a random implementation and a fixed one for deterministic runs.
//!
//! Notes:
//! - Issuance performs no collision check against existing records. Two intakes that draw the
//!   same identifier overwrite one another's intake file.
//! - Technician input and login input are *not* required to be canonical; the store treats
//!   those keys as opaque strings. Use [`PatientId::parse`] when canonical form matters.

use crate::{RecordError, RecordResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::{fmt, str::FromStr};

/// Canonical 5-digit patient identifier.
///
/// # Construction
/// - [`IdentifierGenerator::generate`] issues a fresh identifier.
/// - [`PatientId::parse`] validates an externally supplied identifier.
///
/// # Display format
/// Always the 5-digit decimal string, e.g. `12345`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatientId(u32);

impl PatientId {
    /// Smallest issuable identifier.
    pub const MIN: u32 = 10_000;
    /// Largest issuable identifier.
    pub const MAX: u32 = 99_999;

    /// Wraps a numeric value, rejecting anything outside `MIN..=MAX`.
    pub fn from_number(value: u32) -> RecordResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            return Ok(Self(value));
        }
        Err(RecordError::InvalidInput(format!(
            "patient identifier must be in {}..={}, got {value}",
            Self::MIN,
            Self::MAX
        )))
    }

    /// Validates and parses an identifier string that must already be canonical.
    ///
    /// Surrounding whitespace, signs and leading zeros are not normalised away.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> RecordResult<Self> {
        if Self::is_canonical(input) {
            return input
                .parse::<u32>()
                .map(Self)
                .map_err(|e| RecordError::InvalidInput(e.to_string()));
        }
        Err(RecordError::InvalidInput(format!(
            "patient identifier must be 5 digits without a leading zero, got: '{input}'"
        )))
    }

    /// Returns true if `input` is a canonical identifier.
    ///
    /// Purely syntactic: exactly 5 bytes, all ASCII digits, first digit non-zero.
    pub fn is_canonical(input: &str) -> bool {
        let bytes = input.as_bytes();
        bytes.len() == 5 && bytes[0] != b'0' && bytes.iter().all(u8::is_ascii_digit)
    }

    /// Numeric value of the identifier.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatientId::parse(s)
    }
}

impl serde::Serialize for PatientId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for PatientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PatientId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Source of newly issued patient identifiers.
pub trait IdentifierGenerator {
    /// Issues the next identifier. Never fails and never consults the record store.
    fn generate(&mut self) -> PatientId;
}

/// Uniformly random identifiers over `PatientId::MIN..=PatientId::MAX`.
#[derive(Debug)]
pub struct RandomIdentifierGenerator {
    rng: StdRng,
}

impl RandomIdentifierGenerator {
    /// Generator seeded from operating-system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIdentifierGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierGenerator for RandomIdentifierGenerator {
    fn generate(&mut self) -> PatientId {
        PatientId(self.rng.gen_range(PatientId::MIN..=PatientId::MAX))
    }
}

/// Always issues the same identifier.
#[derive(Clone, Copy, Debug)]
pub struct FixedIdentifierGenerator(PatientId);

impl FixedIdentifierGenerator {
    pub fn new(id: PatientId) -> Self {
        Self(id)
    }
}

impl IdentifierGenerator for FixedIdentifierGenerator {
    fn generate(&mut self) -> PatientId {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_identifiers_are_canonical_and_in_range() {
        let mut generator = RandomIdentifierGenerator::seeded(7);
        for _ in 0..10_000 {
            let id = generator.generate();
            let rendered = id.to_string();
            assert_eq!(rendered.len(), 5, "identifier {rendered} should be 5 digits");
            assert!(PatientId::is_canonical(&rendered));
            assert!((10_000..=99_999).contains(&id.value()));
        }
    }

    #[test]
    fn test_seeded_generators_are_reproducible() {
        let mut a = RandomIdentifierGenerator::seeded(42);
        let mut b = RandomIdentifierGenerator::seeded(42);
        let from_a: Vec<_> = (0..20).map(|_| a.generate()).collect();
        let from_b: Vec<_> = (0..20).map(|_| b.generate()).collect();
        assert_eq!(from_a, from_b);
    }

    #[test]
    fn test_generator_reaches_both_ends_of_range() {
        let mut generator = RandomIdentifierGenerator::seeded(1);
        let ids: Vec<u32> = (0..200_000).map(|_| generator.generate().value()).collect();
        assert!(ids.iter().any(|&v| v < 10_100));
        assert!(ids.iter().any(|&v| v > 99_899));
    }

    #[test]
    fn test_fixed_generator_repeats_identifier() {
        let id = PatientId::parse("12345").unwrap();
        let mut generator = FixedIdentifierGenerator::new(id);
        assert_eq!(generator.generate(), id);
        assert_eq!(generator.generate(), id);
    }

    #[test]
    fn test_parse_valid_identifier() {
        let id = PatientId::parse("12345").expect("should parse");
        assert_eq!(id.value(), 12_345);
        assert_eq!(id.to_string(), "12345");
    }

    #[test]
    fn test_parse_rejects_leading_zero() {
        let err = PatientId::parse("01234").expect_err("leading zero is not canonical");
        match err {
            RecordError::InvalidInput(msg) => assert!(msg.contains("5 digits")),
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_wrong_length_and_non_digits() {
        assert!(PatientId::parse("1234").is_err());
        assert!(PatientId::parse("123456").is_err());
        assert!(PatientId::parse("12a45").is_err());
        assert!(PatientId::parse(" 12345").is_err());
        assert!(PatientId::parse("+1234").is_err());
        assert!(PatientId::parse("").is_err());
    }

    #[test]
    fn test_from_number_bounds() {
        assert!(PatientId::from_number(9_999).is_err());
        assert!(PatientId::from_number(100_000).is_err());
        assert_eq!(PatientId::from_number(10_000).unwrap().to_string(), "10000");
        assert_eq!(PatientId::from_number(99_999).unwrap().to_string(), "99999");
    }

    #[test]
    fn test_from_str_matches_parse() {
        let id: PatientId = "54321".parse().unwrap();
        assert_eq!(id, PatientId::parse("54321").unwrap());
    }

    #[test]
    fn test_serde_uses_string_form() {
        let id = PatientId::parse("12345").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"12345\"");
        let back: PatientId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<PatientId>("\"00001\"").is_err());
    }
}
