//! Screen controller
//!
//! Tracks which screen is visible and the alert overlay shown above it.
//! Every real screen change bumps an epoch; work started on one screen
//! holds a [`ScreenTicket`] and must check [`ScreenController::is_current`]
//! before touching state, so a handler left over from a previous screen
//! becomes a no-op.

use echoverse_domain::{DomainError, Screen};

use crate::application::dto::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenTicket {
    screen: Screen,
    epoch: u64,
}

impl ScreenTicket {
    pub fn screen(&self) -> Screen {
        self.screen
    }
}

#[derive(Debug, Default)]
pub struct ScreenController {
    current: Screen,
    epoch: u64,
    notice: Option<Notice>,
}

impl ScreenController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    /// Move to `next`. Re-entering the current screen keeps the epoch.
    pub fn transition(&mut self, next: Screen) -> Result<(), DomainError> {
        if next == self.current {
            return Ok(());
        }
        self.current = self.current.transition_to(next)?;
        self.epoch += 1;
        tracing::info!(screen = ?next, epoch = self.epoch, "Screen changed");
        Ok(())
    }

    pub fn ticket(&self) -> ScreenTicket {
        ScreenTicket {
            screen: self.current,
            epoch: self.epoch,
        }
    }

    /// Whether no screen change happened since `ticket` was taken.
    pub fn is_current(&self, ticket: &ScreenTicket) -> bool {
        ticket.epoch == self.epoch && ticket.screen == self.current
    }

    /// Show an alert over the current screen, replacing any previous one.
    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_login() {
        assert_eq!(ScreenController::new().current(), Screen::Login);
    }

    #[test]
    fn screen_change_invalidates_ticket() {
        let mut screens = ScreenController::new();
        let ticket = screens.ticket();
        screens.transition(Screen::CharacterCreation).unwrap();
        assert!(!screens.is_current(&ticket));
        assert!(screens.is_current(&screens.ticket()));
    }

    #[test]
    fn same_screen_keeps_ticket_valid() {
        let mut screens = ScreenController::new();
        let ticket = screens.ticket();
        screens.transition(Screen::Login).unwrap();
        assert!(screens.is_current(&ticket));
    }

    #[test]
    fn illegal_transition_leaves_screen_unchanged() {
        let mut screens = ScreenController::new();
        screens.transition(Screen::Game).unwrap();
        assert!(screens.transition(Screen::ModeSelection).is_err());
        assert_eq!(screens.current(), Screen::Game);
    }

    #[test]
    fn notice_survives_screen_changes_until_dismissed() {
        let mut screens = ScreenController::new();
        screens.show_notice(Notice::error("boom"));
        screens.transition(Screen::CharacterCreation).unwrap();
        assert_eq!(screens.notice(), Some(&Notice::error("boom")));

        let dismissed = screens.dismiss_notice();
        assert_eq!(dismissed, Some(Notice::error("boom")));
        assert!(screens.notice().is_none());
        assert_eq!(screens.current(), Screen::CharacterCreation);
    }
}
