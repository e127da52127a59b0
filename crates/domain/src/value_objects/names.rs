//! Validated name newtypes
//!
//! These newtypes ensure that names are valid by construction:
//! - Non-empty
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Minimum length for a display name (in characters, after trimming)
pub const MIN_DISPLAY_NAME_LENGTH: usize = 3;

/// Maximum length for a display name (in characters, after trimming)
pub const MAX_DISPLAY_NAME_LENGTH: usize = 20;

/// Maximum length for a character name
const MAX_CHARACTER_NAME_LENGTH: usize = 200;

// ============================================================================
// DisplayName
// ============================================================================

/// A validated player display name (3-20 chars, trimmed).
///
/// Once recorded on the profile document it never changes for that identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new validated display name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the trimmed name is shorter than
    /// 3 or longer than 20 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        let length = trimmed.chars().count();
        if !(MIN_DISPLAY_NAME_LENGTH..=MAX_DISPLAY_NAME_LENGTH).contains(&length) {
            return Err(DomainError::validation(format!(
                "Display name must be between {} and {} characters",
                MIN_DISPLAY_NAME_LENGTH, MAX_DISPLAY_NAME_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for DisplayName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> String {
        name.0
    }
}

// ============================================================================
// CharacterName
// ============================================================================

/// A validated character name (non-empty, <=200 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterName(String);

impl CharacterName {
    /// Create a new validated character name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - The name exceeds 200 characters after trimming
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Character name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_CHARACTER_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Character name cannot exceed {} characters",
                MAX_CHARACTER_NAME_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CharacterName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CharacterName> for String {
    fn from(name: CharacterName) -> String {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_accepts_bounds() {
        assert!(DisplayName::new("Ari").is_ok());
        assert!(DisplayName::new("a".repeat(20)).is_ok());
    }

    #[test]
    fn display_name_rejects_out_of_range() {
        for name in ["", "ab", "   ab   ", &"x".repeat(21)] {
            let err = DisplayName::new(name).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{name:?}");
        }
    }

    #[test]
    fn display_name_counts_characters_not_bytes() {
        // Six accented characters, twelve bytes.
        assert!(DisplayName::new("éèêëàâ").is_ok());
        assert!(DisplayName::new("é".repeat(21)).is_err());
    }

    #[test]
    fn display_name_trims() {
        let name = DisplayName::new("  Lyra  ").unwrap();
        assert_eq!(name.as_str(), "Lyra");
    }

    #[test]
    fn display_name_serde_validates() {
        let ok: DisplayName = serde_json::from_str("\"Lyra\"").unwrap();
        assert_eq!(ok.as_str(), "Lyra");
        assert!(serde_json::from_str::<DisplayName>("\"Ly\"").is_err());
    }

    #[test]
    fn character_name_rejects_blank() {
        assert!(CharacterName::new("   ").is_err());
        assert_eq!(CharacterName::new(" Kael ").unwrap().as_str(), "Kael");
    }
}
