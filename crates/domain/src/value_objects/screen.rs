//! Top-level client screens

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The full-page view the player sees. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Login,
    CharacterCreation,
    ModeSelection,
    Game,
}

impl Screen {
    /// Whether moving from `self` to `next` is a legal screen change.
    ///
    /// Login, CharacterCreation and Game are reachable from anywhere: losing
    /// the identity, starting a new adventure and restoring a saved session
    /// can each happen on any screen. Mode selection only follows character
    /// creation or a restore from Login.
    pub fn can_transition_to(self, next: Screen) -> bool {
        match next {
            Screen::Login | Screen::CharacterCreation | Screen::Game => true,
            Screen::ModeSelection => matches!(
                self,
                Screen::Login | Screen::CharacterCreation | Screen::ModeSelection
            ),
        }
    }

    /// Like `can_transition_to`, as a `Result`.
    pub fn transition_to(self, next: Screen) -> Result<Screen, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::invalid_state_transition(format!(
                "Cannot move from {self:?} to {next:?}"
            )))
        }
    }

    /// Screens holding a partially entered form. Remote pushes must not
    /// overwrite local state while one of these is shown.
    pub fn holds_form(self) -> bool {
        matches!(self, Screen::Login | Screen::CharacterCreation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_reachable_from_every_screen() {
        for from in [
            Screen::Login,
            Screen::CharacterCreation,
            Screen::ModeSelection,
            Screen::Game,
        ] {
            assert!(from.can_transition_to(Screen::Login));
            assert!(from.can_transition_to(Screen::Game));
        }
    }

    #[test]
    fn game_cannot_fall_back_to_mode_selection() {
        assert!(!Screen::Game.can_transition_to(Screen::ModeSelection));
        assert!(Screen::Game.transition_to(Screen::ModeSelection).is_err());
        assert_eq!(
            Screen::CharacterCreation.transition_to(Screen::ModeSelection),
            Ok(Screen::ModeSelection)
        );
    }

    #[test]
    fn only_login_and_character_creation_hold_forms() {
        assert!(Screen::Login.holds_form());
        assert!(Screen::CharacterCreation.holds_form());
        assert!(!Screen::ModeSelection.holds_form());
        assert!(!Screen::Game.holds_form());
    }
}
