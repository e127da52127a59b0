//! Game modes selectable before the narration begins

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Narrative style chosen once per playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Exploration,
    Mystery,
    Combat,
    Intrigue,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        Self::Exploration,
        Self::Mystery,
        Self::Combat,
        Self::Intrigue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exploration => "exploration",
            Self::Mystery => "mystery",
            Self::Combat => "combat",
            Self::Intrigue => "intrigue",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted.is_empty() {
            return Err(DomainError::validation("A game mode must be chosen"));
        }
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| DomainError::parse(format!("Unknown game mode: {}", s.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_modes() {
        assert_eq!("exploration".parse::<GameMode>().unwrap(), GameMode::Exploration);
        assert_eq!("INTRIGUE".parse::<GameMode>().unwrap(), GameMode::Intrigue);
    }

    #[test]
    fn rejects_blank_and_unknown() {
        assert!(matches!(
            "  ".parse::<GameMode>(),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            "chess".parse::<GameMode>(),
            Err(DomainError::Parse(_))
        ));
    }
}
