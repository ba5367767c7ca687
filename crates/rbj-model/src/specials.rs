//! Kind-specific rule parameters from the `specials` column.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::check_kind::KnownKey;
use crate::error::SpecialsError;

/// Parsed `key=value` pairs of a rule's specials cell.
///
/// Keys keep the spelling used in the rule table. Lookups and duplicate
/// detection ignore ASCII case, so `Relation` and `relation` name the same
/// entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<String, String>",
    try_from = "BTreeMap<String, String>"
)]
pub struct Specials {
    entries: BTreeMap<String, String>,
}

impl Specials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, rejecting a key that is already present.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), SpecialsError> {
        let key = key.into();
        if self.position(&key).is_some() {
            return Err(SpecialsError::DuplicateKey { key });
        }
        self.entries.insert(key, value.into());
        Ok(())
    }

    /// Looks up a value by key (ASCII case-insensitive).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|(_, value)| value.as_str())
    }

    /// Looks up a recognized key, treating a blank value as absent.
    pub fn known(&self, key: KnownKey) -> Option<&str> {
        self.get(key.as_str())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Keys that are not among `mapped`, in sorted order.
    pub fn unmapped_keys<'a>(&'a self, mapped: &'a [KnownKey]) -> impl Iterator<Item = &'a str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(move |key| !mapped.iter().any(|known| known.matches(key)))
    }

    fn position(&self, key: &str) -> Option<(&String, &String)> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
    }
}

impl TryFrom<BTreeMap<String, String>> for Specials {
    type Error = SpecialsError;

    /// Rebuilds the map through [`Specials::insert`], so keys that differ
    /// only in case are rejected.
    fn try_from(entries: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut specials = Specials::new();
        for (key, value) in entries {
            if key.trim().is_empty() {
                return Err(SpecialsError::EmptyKey {
                    entry: format!("{key}={value}"),
                });
            }
            specials.insert(key, value)?;
        }
        Ok(specials)
    }
}

impl From<Specials> for BTreeMap<String, String> {
    fn from(specials: Specials) -> Self {
        specials.entries
    }
}

impl fmt::Display for Specials {
    /// Formats the entries as `key=value,key=value`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (key, value)) in self.entries.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_case_insensitive_duplicates() {
        let mut specials = Specials::new();
        specials.insert("Relation", "within").unwrap();
        let err = specials.insert("relation", "touches").unwrap_err();
        assert!(matches!(err, SpecialsError::DuplicateKey { ref key } if key == "relation"));
        assert_eq!(specials.len(), 1);
    }

    #[test]
    fn test_known_lookup_ignores_case_and_blank_values() {
        let mut specials = Specials::new();
        specials.insert("Field", "LOKALID").unwrap();
        specials.insert("relation", "  ").unwrap();
        assert_eq!(specials.known(KnownKey::Field), Some("LOKALID"));
        assert_eq!(specials.known(KnownKey::Relation), None);
        assert!(specials.contains("RELATION"));
    }

    #[test]
    fn test_display_joins_entries() {
        let mut specials = Specials::new();
        specials.insert("ToleranceUnits", "cm").unwrap();
        specials.insert("Tolerance", "5").unwrap();
        assert_eq!(specials.to_string(), "Tolerance=5,ToleranceUnits=cm");
        assert_eq!(Specials::new().to_string(), "");
    }

    #[test]
    fn test_try_from_rejects_case_insensitive_duplicates() {
        let entries = BTreeMap::from([
            ("Relation".to_string(), "within".to_string()),
            ("relation".to_string(), "touches".to_string()),
        ]);
        let err = Specials::try_from(entries).unwrap_err();
        assert!(matches!(err, SpecialsError::DuplicateKey { .. }));

        let blank = BTreeMap::from([(" ".to_string(), "x".to_string())]);
        assert!(matches!(
            Specials::try_from(blank),
            Err(SpecialsError::EmptyKey { .. })
        ));
    }

    #[test]
    fn test_unmapped_keys() {
        let mut specials = Specials::new();
        specials.insert("Relation", "within").unwrap();
        specials.insert("colour", "red").unwrap();
        let unmapped: Vec<&str> = specials.unmapped_keys(&[KnownKey::Relation]).collect();
        assert_eq!(unmapped, vec!["colour"]);
    }
}
