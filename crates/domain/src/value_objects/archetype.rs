//! Character archetypes offered at character creation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The predefined character archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Explorer,
    Scholar,
    Warrior,
    Mystic,
    Rogue,
    Diplomat,
}

impl Archetype {
    pub const ALL: [Archetype; 6] = [
        Self::Explorer,
        Self::Scholar,
        Self::Warrior,
        Self::Mystic,
        Self::Rogue,
        Self::Diplomat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explorer => "explorer",
            Self::Scholar => "scholar",
            Self::Warrior => "warrior",
            Self::Mystic => "mystic",
            Self::Rogue => "rogue",
            Self::Diplomat => "diplomat",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Archetype {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted.is_empty() {
            return Err(DomainError::validation("Archetype must be selected"));
        }
        Self::ALL
            .into_iter()
            .find(|archetype| archetype.as_str() == wanted)
            .ok_or_else(|| DomainError::parse(format!("Unknown archetype: {}", s.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Mystic".parse::<Archetype>().unwrap(), Archetype::Mystic);
        assert_eq!(" rogue ".parse::<Archetype>().unwrap(), Archetype::Rogue);
    }

    #[test]
    fn empty_selection_is_a_validation_error() {
        let err = "".parse::<Archetype>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn unknown_value_is_a_parse_error() {
        let err = "bard".parse::<Archetype>().unwrap_err();
        assert!(matches!(err, DomainError::Parse(_)));
    }

    #[test]
    fn display_matches_wire_format() {
        for archetype in Archetype::ALL {
            let json = serde_json::to_string(&archetype).unwrap();
            assert_eq!(json, format!("\"{archetype}\""));
        }
    }
}
