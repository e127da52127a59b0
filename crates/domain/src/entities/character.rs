//! Player character created once per adventure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{Archetype, CharacterName};

/// The player's character.
///
/// Fields are fixed after creation; only a new adventure replaces the
/// character as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    name: CharacterName,
    archetype: Archetype,
    description: String,
    background: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl Character {
    /// Build a character from raw form input.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if any of the four fields is empty,
    /// and `DomainError::Parse` if the archetype is not a known value.
    pub fn create(
        name: &str,
        archetype: &str,
        description: &str,
        background: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let description = description.trim();
        let background = background.trim();
        if name.trim().is_empty()
            || archetype.trim().is_empty()
            || description.is_empty()
            || background.is_empty()
        {
            return Err(DomainError::validation(
                "Name, archetype, description and background are all required",
            ));
        }

        Ok(Self {
            name: CharacterName::new(name)?,
            archetype: archetype.parse()?,
            description: description.to_string(),
            background: background.to_string(),
            created_at: Some(created_at),
        })
    }

    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn creates_from_complete_form() {
        let character = Character::create(
            "Lyra",
            "scholar",
            "Tall, ink-stained fingers",
            "Raised in the archives",
            created(),
        )
        .unwrap();
        assert_eq!(character.name().as_str(), "Lyra");
        assert_eq!(character.archetype(), Archetype::Scholar);
        assert_eq!(character.created_at(), Some(created()));
    }

    #[test]
    fn any_blank_field_fails_validation() {
        let cases = [
            ("", "scholar", "d", "b"),
            ("Lyra", "", "d", "b"),
            ("Lyra", "scholar", "  ", "b"),
            ("Lyra", "scholar", "d", ""),
        ];
        for (name, archetype, description, background) in cases {
            let err =
                Character::create(name, archetype, description, background, created()).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[test]
    fn serializes_camel_case() {
        let character =
            Character::create("Lyra", "mystic", "d", "b", created()).unwrap();
        let json = serde_json::to_value(&character).unwrap();
        assert_eq!(json["archetype"], "mystic");
        assert!(json.get("createdAt").is_some());
    }
}
