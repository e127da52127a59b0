//! Simple test fixtures used across unit tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::application::dto::CharacterForm;
use crate::ports::outbound::NarrationResponse;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
        .single()
        .unwrap_or_default()
}

pub fn explorer_form() -> CharacterForm {
    CharacterForm::new(
        "Lyra",
        "explorer",
        "Weathered cloak, restless eyes",
        "Born between two ticks of the great clock",
    )
}

pub fn narration(text: &str, options: &[&str]) -> NarrationResponse {
    NarrationResponse {
        narration: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        new_state: None,
    }
}
