//! Action dispatcher - lifecycle of one narration round-trip
//!
//! Phases run `Idle -> Pending -> {Applied, Failed} -> Idle`. Each request
//! gets a sequence number; a completion whose number is not the one in
//! flight is stale and gets dropped, so an abandoned request can never
//! overwrite the result of a later one.

use std::sync::Arc;

use crate::application::error::{ClientError, Operation};
use crate::ports::outbound::{NarrationError, NarrationPort, NarrationRequest, NarrationResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Idle,
    Pending,
    Applied,
    Failed,
}

/// The input affordance shown under the narrative. Exactly one is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionPanel {
    Choices(Vec<String>),
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub sequence: u64,
    pub action: String,
    pub is_initial: bool,
}

pub struct ActionDispatcher {
    narration: Arc<dyn NarrationPort>,
    phase: ActionPhase,
    last_outcome: Option<ActionPhase>,
    panel: ActionPanel,
    in_flight: Option<u64>,
    next_sequence: u64,
}

impl ActionDispatcher {
    pub fn new(narration: Arc<dyn NarrationPort>) -> Self {
        Self {
            narration,
            phase: ActionPhase::Idle,
            last_outcome: None,
            panel: ActionPanel::FreeText,
            in_flight: None,
            next_sequence: 1,
        }
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    /// How the last settled request ended (`Applied` or `Failed`).
    pub fn last_outcome(&self) -> Option<ActionPhase> {
        self.last_outcome
    }

    pub fn panel(&self) -> &ActionPanel {
        &self.panel
    }

    /// Action controls are disabled while a request is pending.
    pub fn controls_enabled(&self) -> bool {
        self.phase != ActionPhase::Pending
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ActionPhase::Pending
    }

    /// The canned choice at `index`, if choices are showing.
    pub fn option(&self, index: usize) -> Option<&str> {
        match &self.panel {
            ActionPanel::Choices(options) => options.get(index).map(String::as_str),
            ActionPanel::FreeText => None,
        }
    }

    /// Enter `Pending` for a new request.
    pub fn begin(&mut self, action: &str, is_initial: bool) -> Result<PendingAction, ClientError> {
        if self.phase == ActionPhase::Pending {
            return Err(ClientError::Busy(Operation::Narration));
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.in_flight = Some(sequence);
        self.phase = ActionPhase::Pending;
        tracing::debug!(sequence, is_initial, "Narration request pending");
        Ok(PendingAction {
            sequence,
            action: action.to_string(),
            is_initial,
        })
    }

    pub async fn send(
        &self,
        request: NarrationRequest,
    ) -> Result<NarrationResponse, NarrationError> {
        self.narration.narrate(request).await
    }

    /// Whether `pending` is still the request in flight.
    pub fn is_in_flight(&self, pending: &PendingAction) -> bool {
        self.in_flight == Some(pending.sequence)
    }

    /// Record a successful response. Returns `false` for a stale one.
    pub fn complete(&mut self, pending: &PendingAction, options: &[String]) -> bool {
        if !self.accepts(pending) {
            return false;
        }
        self.in_flight = None;
        self.phase = ActionPhase::Applied;
        self.panel = if options.is_empty() {
            ActionPanel::FreeText
        } else {
            ActionPanel::Choices(options.to_vec())
        };
        true
    }

    /// Record a failed request. Returns `false` for a stale one.
    ///
    /// Free text is the fallback affordance after a failure.
    pub fn fail(&mut self, pending: &PendingAction) -> bool {
        if !self.accepts(pending) {
            return false;
        }
        self.in_flight = None;
        self.phase = ActionPhase::Failed;
        self.panel = ActionPanel::FreeText;
        true
    }

    /// Return to `Idle` after `Applied` or `Failed`.
    pub fn settle(&mut self) {
        if matches!(self.phase, ActionPhase::Applied | ActionPhase::Failed) {
            self.last_outcome = Some(self.phase);
            self.phase = ActionPhase::Idle;
        }
    }

    /// Abandon whatever is in flight and show free text.
    pub fn reset(&mut self) {
        if let Some(sequence) = self.in_flight.take() {
            tracing::debug!(sequence, "Abandoning in-flight narration request");
        }
        self.phase = ActionPhase::Idle;
        self.last_outcome = None;
        self.panel = ActionPanel::FreeText;
    }

    fn accepts(&self, pending: &PendingAction) -> bool {
        if self.is_in_flight(pending) {
            return true;
        }
        tracing::debug!(
            sequence = pending.sequence,
            in_flight = ?self.in_flight,
            "Dropping stale narration response"
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::MockNarrationPort;

    fn dispatcher() -> ActionDispatcher {
        ActionDispatcher::new(Arc::new(MockNarrationPort::new()))
    }

    fn options() -> Vec<String> {
        vec!["Look around".to_string(), "Call out".to_string()]
    }

    #[test]
    fn starts_idle_with_free_text() {
        let actions = dispatcher();
        assert_eq!(actions.phase(), ActionPhase::Idle);
        assert_eq!(actions.panel(), &ActionPanel::FreeText);
        assert!(actions.controls_enabled());
    }

    #[test]
    fn pending_blocks_reentry_and_disables_controls() {
        let mut actions = dispatcher();
        actions.begin("Look", false).unwrap();
        assert!(!actions.controls_enabled());
        assert!(actions.is_loading());
        assert_eq!(
            actions.begin("Run", false).unwrap_err(),
            ClientError::Busy(Operation::Narration)
        );
    }

    #[test]
    fn options_show_choices_and_hide_free_text() {
        let mut actions = dispatcher();
        let pending = actions.begin("Start", true).unwrap();
        assert!(actions.complete(&pending, &options()));
        assert_eq!(actions.phase(), ActionPhase::Applied);
        assert_eq!(actions.option(1), Some("Call out"));

        actions.settle();
        assert_eq!(actions.phase(), ActionPhase::Idle);
        assert_eq!(actions.last_outcome(), Some(ActionPhase::Applied));
        assert!(actions.controls_enabled());
    }

    #[test]
    fn no_options_means_free_text() {
        let mut actions = dispatcher();
        let pending = actions.begin("Wait", false).unwrap();
        actions.complete(&pending, &[]);
        assert_eq!(actions.panel(), &ActionPanel::FreeText);
        assert_eq!(actions.option(0), None);
    }

    #[test]
    fn failure_falls_back_to_free_text() {
        let mut actions = dispatcher();
        let first = actions.begin("Start", true).unwrap();
        actions.complete(&first, &options());
        actions.settle();

        let second = actions.begin("Look around", false).unwrap();
        assert!(actions.fail(&second));
        actions.settle();
        assert_eq!(actions.panel(), &ActionPanel::FreeText);
        assert_eq!(actions.last_outcome(), Some(ActionPhase::Failed));
        assert!(actions.controls_enabled());
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut actions = dispatcher();
        let abandoned = actions.begin("Old", false).unwrap();
        actions.reset();
        let current = actions.begin("New", false).unwrap();

        assert!(!actions.is_in_flight(&abandoned));
        assert!(actions.is_in_flight(&current));
        assert!(!actions.complete(&abandoned, &options()));
        assert_eq!(actions.phase(), ActionPhase::Pending);
        assert!(!actions.fail(&abandoned));

        assert!(actions.complete(&current, &[]));
        assert!(current.sequence > abandoned.sequence);
    }
}
