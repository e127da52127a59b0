//! Named character attributes, each clamped to [0, 100]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lowest value an attribute can hold
pub const MIN_ATTRIBUTE: u8 = 0;

/// Highest value an attribute can hold
pub const MAX_ATTRIBUTE: u8 = 100;

pub const VIGOR: &str = "vigor";
pub const INGENUITY: &str = "ingenuity";
pub const ADAPTATION: &str = "adaptation";
pub const INFLUENCE: &str = "influence";

/// Mapping of attribute name to value.
///
/// Every write goes through [`Attributes::set`], and deserialization clamps
/// too, so a value outside [0, 100] can never be observed, whatever the
/// remote document contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, i64>", into = "BTreeMap<String, i64>")]
pub struct Attributes(BTreeMap<String, u8>);

impl Attributes {
    /// An empty attribute set.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Starting attributes for a freshly created character.
    pub fn starting() -> Self {
        let mut attributes = Self::new();
        attributes.set(VIGOR, 80);
        attributes.set(INGENUITY, 70);
        attributes.set(ADAPTATION, 60);
        attributes.set(INFLUENCE, 50);
        attributes
    }

    pub fn get(&self, name: &str) -> Option<u8> {
        self.0.get(name).copied()
    }

    /// Set an attribute, clamping the value into range.
    pub fn set(&mut self, name: impl Into<String>, value: i64) {
        self.0.insert(name.into(), clamp(value));
    }

    /// Raise every attribute by `amount`, capped at the maximum.
    pub fn boost_all(&mut self, amount: u8) {
        for value in self.0.values_mut() {
            *value = value.saturating_add(amount).min(MAX_ATTRIBUTE);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::starting()
    }
}

fn clamp(value: i64) -> u8 {
    value.clamp(i64::from(MIN_ATTRIBUTE), i64::from(MAX_ATTRIBUTE)) as u8
}

impl From<BTreeMap<String, i64>> for Attributes {
    fn from(raw: BTreeMap<String, i64>) -> Self {
        Self(
            raw.into_iter()
                .map(|(name, value)| (name, clamp(value)))
                .collect(),
        )
    }
}

impl From<Attributes> for BTreeMap<String, i64> {
    fn from(attributes: Attributes) -> Self {
        attributes
            .0
            .into_iter()
            .map(|(name, value)| (name, i64::from(value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_values() {
        let attributes = Attributes::starting();
        assert_eq!(attributes.get(VIGOR), Some(80));
        assert_eq!(attributes.get(INGENUITY), Some(70));
        assert_eq!(attributes.get(ADAPTATION), Some(60));
        assert_eq!(attributes.get(INFLUENCE), Some(50));
    }

    #[test]
    fn set_clamps() {
        let mut attributes = Attributes::new();
        attributes.set(VIGOR, 140);
        attributes.set(INFLUENCE, -3);
        assert_eq!(attributes.get(VIGOR), Some(100));
        assert_eq!(attributes.get(INFLUENCE), Some(0));
    }

    #[test]
    fn boost_all_caps_at_maximum() {
        let mut attributes = Attributes::new();
        attributes.set(VIGOR, 98);
        attributes.set(INGENUITY, 40);
        attributes.boost_all(5);
        assert_eq!(attributes.get(VIGOR), Some(100));
        assert_eq!(attributes.get(INGENUITY), Some(45));
    }

    #[test]
    fn deserialization_clamps_remote_values() {
        let attributes: Attributes =
            serde_json::from_str(r#"{"vigor": 250, "ingenuity": -10, "influence": 55}"#).unwrap();
        assert_eq!(attributes.get(VIGOR), Some(100));
        assert_eq!(attributes.get(INGENUITY), Some(0));
        assert_eq!(attributes.get(INFLUENCE), Some(55));
    }
}
