//! Character creation form input

/// Raw field values as typed by the player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterForm {
    pub name: String,
    pub archetype: String,
    pub description: String,
    pub background: String,
}

impl CharacterForm {
    pub fn new(
        name: impl Into<String>,
        archetype: impl Into<String>,
        description: impl Into<String>,
        background: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            archetype: archetype.into(),
            description: description.into(),
            background: background.into(),
        }
    }
}

/// State of the character-name input.
///
/// Once a display name is recorded, the character carries that name and
/// the field is read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameField {
    pub value: String,
    pub locked: bool,
}

impl NameField {
    pub fn locked(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            locked: true,
        }
    }

    pub fn open() -> Self {
        Self::default()
    }

    /// The name to use for a submitted form.
    pub fn resolve<'a>(&'a self, submitted: &'a str) -> &'a str {
        if self.locked {
            &self.value
        } else {
            submitted
        }
    }
}
