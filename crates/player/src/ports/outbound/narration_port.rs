//! Narration Port - the remote story generator

use async_trait::async_trait;
use echoverse_domain::{PlayerIdentity, SessionState};
use serde::{Deserialize, Serialize};

use super::NarrationError;

/// One turn sent to the narration service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationRequest {
    pub user_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_archetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_mode: Option<String>,
    pub player_action: String,
    pub is_start: bool,
}

impl NarrationRequest {
    /// Build the request for one turn of `state`.
    ///
    /// Returns `None` when the identity has no display name yet.
    pub fn for_turn(
        identity: &PlayerIdentity,
        state: &SessionState,
        action: &str,
        is_initial: bool,
    ) -> Option<Self> {
        let display_name = identity.display_name.as_ref()?;
        let character = state.character.as_ref();
        Some(Self {
            user_id: identity.user_id.to_string(),
            display_name: display_name.to_string(),
            player_name: character.map(|c| c.name().to_string()),
            player_archetype: character.map(|c| c.archetype().to_string()),
            player_description: character.map(|c| c.description().to_string()),
            player_background: character.map(|c| c.background().to_string()),
            game_mode: state.mode.map(|mode| mode.to_string()),
            player_action: action.to_string(),
            is_start: is_initial,
        })
    }
}

/// The service's answer for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationResponse {
    pub narration: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Full replacement for the session state, when the service sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_state: Option<SessionState>,
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NarrationPort: Send + Sync {
    async fn narrate(&self, request: NarrationRequest) -> Result<NarrationResponse, NarrationError>;
}
