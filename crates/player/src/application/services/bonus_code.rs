//! Hidden bonus code detection

use std::collections::VecDeque;

/// Key codes that unlock the bonus, in order.
pub const BONUS_SEQUENCE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "KeyB",
    "KeyA",
];

/// Rolling buffer of the last ten key codes.
#[derive(Debug, Default)]
pub struct BonusCodeTracker {
    recent: VecDeque<String>,
}

impl BonusCodeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns `true` when it completes the sequence;
    /// the buffer is cleared on a match.
    pub fn push(&mut self, code: &str) -> bool {
        self.recent.push_back(code.to_string());
        if self.recent.len() > BONUS_SEQUENCE.len() {
            self.recent.pop_front();
        }

        let matched = self.recent.len() == BONUS_SEQUENCE.len()
            && self
                .recent
                .iter()
                .zip(BONUS_SEQUENCE)
                .all(|(pressed, expected)| pressed == expected);
        if matched {
            self.recent.clear();
        }
        matched
    }

    pub fn clear(&mut self) {
        self.recent.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_sequence_matches_on_last_key() {
        let mut tracker = BonusCodeTracker::new();
        let (last, head) = BONUS_SEQUENCE.split_last().unwrap();
        for code in head {
            assert!(!tracker.push(code));
        }
        assert!(tracker.push(last));
    }

    #[test]
    fn leading_noise_is_rolled_out() {
        let mut tracker = BonusCodeTracker::new();
        tracker.push("KeyX");
        tracker.push("Enter");
        let matched = BONUS_SEQUENCE.iter().map(|code| tracker.push(code)).last();
        assert_eq!(matched, Some(true));
    }

    #[test]
    fn buffer_clears_after_match() {
        let mut tracker = BonusCodeTracker::new();
        for code in BONUS_SEQUENCE {
            tracker.push(code);
        }
        assert!(!tracker.push("KeyA"));
    }

    #[test]
    fn wrong_order_never_matches() {
        let mut tracker = BonusCodeTracker::new();
        let mut reversed = BONUS_SEQUENCE;
        reversed.reverse();
        assert!(!reversed.iter().any(|code| tracker.push(code)));
    }
}
