//! Categorical value normalization
//!
//! Maps free-text importance, season and suitability values from the habitat
//! export onto the controlled vocabulary stored in `taxonomy_habitat_m2m`.
//! Every function here is pure; callers decide how to report coercions.

use std::fmt;

/// A normalized value plus whether the raw input had to be replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized<T> {
    pub value: T,
    /// Raw input was outside the accepted set and a default was substituted
    pub coerced: bool,
}

impl<T> Normalized<T> {
    fn accepted(value: T) -> Self {
        Self { value, coerced: false }
    }

    fn coerced(value: T) -> Self {
        Self { value, coerced: true }
    }
}

/// Seasonal occurrence of a taxon in a habitat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Passage,
    Resident,
    Breeding,
    NonBreeding,
    Unknown,
}

impl Season {
    pub const ALL: [Season; 5] = [
        Season::Passage,
        Season::Resident,
        Season::Breeding,
        Season::NonBreeding,
        Season::Unknown,
    ];

    /// Canonical stored form
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Passage => "Passage",
            Season::Resident => "Resident",
            Season::Breeding => "Breeding Season",
            Season::NonBreeding => "Non-Breeding Season",
            Season::Unknown => "Seasonal Occurrence Unknown",
        }
    }

    /// Lower-case shorthand used by some exports (case-sensitive)
    fn from_alias(raw: &str) -> Option<Season> {
        match raw {
            "passage" => Some(Season::Passage),
            "resident" => Some(Season::Resident),
            "breeding" => Some(Season::Breeding),
            "non-breeding" => Some(Season::NonBreeding),
            "unknown" => Some(Season::Unknown),
            _ => None,
        }
    }

    fn from_canonical(raw: &str) -> Option<Season> {
        Season::ALL.into_iter().find(|season| season.as_str() == raw)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How suitable a habitat is for a taxon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suitability {
    Suitable,
    Marginal,
    Unknown,
}

impl Suitability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Suitability::Suitable => "Suitable",
            Suitability::Marginal => "Marginal",
            Suitability::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Yes` is major importance; `No` is not; anything else is coerced to `No`
pub fn normalize_importance(raw: &str) -> Normalized<bool> {
    match raw {
        "Yes" => Normalized::accepted(true),
        "No" => Normalized::accepted(false),
        _ => Normalized::coerced(false),
    }
}

/// Alias lookup first, then the canonical set, else `Seasonal Occurrence Unknown`
pub fn normalize_season(raw: &str) -> Normalized<Season> {
    match Season::from_alias(raw).or_else(|| Season::from_canonical(raw)) {
        Some(season) => Normalized::accepted(season),
        None => Normalized::coerced(Season::Unknown),
    }
}

pub fn normalize_suitability(raw: &str) -> Normalized<Suitability> {
    match raw {
        "Suitable" => Normalized::accepted(Suitability::Suitable),
        "Marginal" => Normalized::accepted(Suitability::Marginal),
        "Unknown" => Normalized::accepted(Suitability::Unknown),
        _ => Normalized::coerced(Suitability::Unknown),
    }
}
