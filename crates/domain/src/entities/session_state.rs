//! The session state aggregate
//!
//! One `SessionState` is live per authenticated identity. The per-user
//! session document is its durable mirror: everything except `identity`
//! is serialized into that document, since the storage path already names
//! the user.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::character::Character;
use crate::ids::UserId;
use crate::value_objects::{Attributes, DisplayName, GameMode};

/// Name of the inventory marker granted by the bonus code
pub const BONUS_MARKER_NAME: &str = "Code Konami activé";

/// Description of the bonus marker item
pub const BONUS_MARKER_DESCRIPTION: &str = "Vos statistiques ont été boostées !";

/// Attribute increase granted by the bonus code
pub const BONUS_ATTRIBUTE_AMOUNT: u8 = 5;

/// Where a freshly created character wakes up
pub const STARTING_LOCATION: &str =
    "un endroit flou et indéfinissable au moment de la micro-fracture initiale";

/// Who is authenticated, and under which display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub user_id: UserId,
    pub display_name: Option<DisplayName>,
}

impl PlayerIdentity {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: DisplayName) -> Self {
        self.display_name = Some(display_name);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Standing with one faction. The score is not bounded client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionRelation {
    pub name: String,
    pub relation: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRecord {
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldEventRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Player,
    #[serde(alias = "gemini")]
    Narrator,
}

/// One line of the narrative log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(alias = "type")]
    pub speaker: Speaker,
    pub text: String,
}

impl HistoryEntry {
    pub fn player(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Player,
            text: text.into(),
        }
    }

    pub fn narrator(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Narrator,
            text: text.into(),
        }
    }
}

/// The mutable record of one player's adventure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    #[serde(skip)]
    pub identity: Option<PlayerIdentity>,
    pub character: Option<Character>,
    #[serde(rename = "gameMode")]
    pub mode: Option<GameMode>,
    pub attributes: Attributes,
    pub inventory: Vec<InventoryItem>,
    pub faction_relations: BTreeMap<String, FactionRelation>,
    pub npcs_met: Vec<NpcRecord>,
    pub active_quests: Vec<QuestRecord>,
    pub major_world_events: Vec<WorldEventRecord>,
    pub history: Vec<HistoryEntry>,
    pub location: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            identity: None,
            character: None,
            mode: None,
            attributes: Attributes::starting(),
            inventory: Vec::new(),
            faction_relations: default_factions(),
            npcs_met: Vec::new(),
            active_quests: Vec::new(),
            major_world_events: Vec::new(),
            history: Vec::new(),
            location: None,
        }
    }
}

fn default_factions() -> BTreeMap<String, FactionRelation> {
    [
        ("gardeChronique", "La Garde Chronique", 0),
        ("fluxLibres", "Les Flux Libres", 0),
        ("resonancesObscures", "Les Résonances Obscures", -100),
    ]
    .into_iter()
    .map(|(key, name, relation)| {
        (
            key.to_string(),
            FactionRelation {
                name: name.to_string(),
                relation,
            },
        )
    })
    .collect()
}

impl SessionState {
    /// Fresh state for a newly created character.
    pub fn for_character(identity: Option<PlayerIdentity>, character: Character) -> Self {
        Self {
            identity,
            character: Some(character),
            location: Some(STARTING_LOCATION.to_string()),
            ..Self::default()
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.identity.as_ref().map(|identity| &identity.user_id)
    }

    pub fn display_name(&self) -> Option<&DisplayName> {
        self.identity
            .as_ref()
            .and_then(|identity| identity.display_name.as_ref())
    }

    /// Whether a playable session exists (a character was created).
    pub fn has_session(&self) -> bool {
        self.character.is_some()
    }

    /// Start over: keep who is playing, drop everything about the adventure.
    pub fn reset(&mut self) {
        let identity = self.identity.take();
        *self = Self {
            identity,
            ..Self::default()
        };
    }

    pub fn record_player_action(&mut self, text: impl Into<String>) {
        self.history.push(HistoryEntry::player(text));
    }

    pub fn record_narration(&mut self, text: impl Into<String>) {
        self.history.push(HistoryEntry::narrator(text));
    }

    /// Add an item unless one with the same name is already held.
    ///
    /// Returns whether the item was added.
    pub fn grant_item_once(&mut self, item: InventoryItem) -> bool {
        if self.inventory.iter().any(|held| held.name == item.name) {
            return false;
        }
        self.inventory.push(item);
        true
    }

    /// Apply the bonus-code reward: every attribute +5 (capped), and the
    /// marker item at most once.
    pub fn apply_bonus(&mut self) {
        self.attributes.boost_all(BONUS_ATTRIBUTE_AMOUNT);
        self.grant_item_once(InventoryItem::new(
            BONUS_MARKER_NAME,
            BONUS_MARKER_DESCRIPTION,
        ));
    }

    /// Take a server-confirmed state.
    ///
    /// Identity, history, character and mode are carried over from `self`:
    /// the history is client-owned, and the character and mode only change
    /// through a new adventure. Every other field comes from `confirmed`.
    pub fn adopt(&mut self, confirmed: SessionState) {
        let identity = self.identity.take();
        let history = std::mem::take(&mut self.history);
        let character = self.character.take();
        let mode = self.mode.take();
        *self = SessionState {
            identity,
            character,
            mode,
            history,
            ..confirmed
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::VIGOR;
    use chrono::{TimeZone, Utc};

    fn identity() -> PlayerIdentity {
        PlayerIdentity::new(UserId::new("uid-1"))
            .with_display_name(DisplayName::new("Lyra").unwrap())
    }

    fn character() -> Character {
        Character::create(
            "Lyra",
            "explorer",
            "Weathered cloak",
            "Born between two ticks of the clock",
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn for_character_uses_starting_values() {
        let state = SessionState::for_character(Some(identity()), character());
        assert!(state.has_session());
        assert_eq!(state.attributes.get(VIGOR), Some(80));
        assert_eq!(state.faction_relations.len(), 3);
        assert_eq!(
            state.faction_relations["resonancesObscures"].relation,
            -100
        );
        assert_eq!(state.location.as_deref(), Some(STARTING_LOCATION));
    }

    #[test]
    fn identity_is_not_serialized() {
        let state = SessionState::for_character(Some(identity()), character());
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("identity").is_none());
        assert!(json.get("gameMode").is_some());
        assert!(json.get("factionRelations").is_some());
    }

    #[test]
    fn reset_keeps_identity_only() {
        let mut state = SessionState::for_character(Some(identity()), character());
        state.mode = Some(GameMode::Mystery);
        state.record_narration("The fog lifts.");
        state.reset();
        assert_eq!(state.identity, Some(identity()));
        assert!(!state.has_session());
        assert!(state.mode.is_none());
        assert!(state.history.is_empty());
    }

    #[test]
    fn grant_item_once_deduplicates_by_name() {
        let mut state = SessionState::default();
        assert!(state.grant_item_once(InventoryItem::new("Lantern", "Brass")));
        assert!(!state.grant_item_once(InventoryItem::new("Lantern", "Different")));
        assert_eq!(state.inventory.len(), 1);
    }

    #[test]
    fn bonus_marker_added_at_most_once() {
        let mut state = SessionState::default();
        state.apply_bonus();
        state.apply_bonus();
        let markers = state
            .inventory
            .iter()
            .filter(|item| item.name == BONUS_MARKER_NAME)
            .count();
        assert_eq!(markers, 1);
        assert_eq!(state.attributes.get(VIGOR), Some(90));
    }

    #[test]
    fn adopt_keeps_history_and_identity() {
        let mut state = SessionState::for_character(Some(identity()), character());
        state.record_narration("Once.");

        let mut confirmed = SessionState::for_character(None, character());
        confirmed.attributes.set(VIGOR, 12);
        confirmed.record_narration("Ignored server copy.");

        state.adopt(confirmed);
        assert_eq!(state.attributes.get(VIGOR), Some(12));
        assert_eq!(state.history, vec![HistoryEntry::narrator("Once.")]);
        assert_eq!(state.identity, Some(identity()));
    }

    #[test]
    fn adopt_keeps_character_and_mode_when_confirmed_state_omits_them() {
        let mut state = SessionState::for_character(Some(identity()), character());
        state.mode = Some(GameMode::Exploration);

        let mut confirmed = SessionState::default();
        confirmed.attributes.set(VIGOR, 95);
        confirmed.mode = Some(GameMode::Combat);

        state.adopt(confirmed);
        assert_eq!(state.character, Some(character()));
        assert_eq!(state.mode, Some(GameMode::Exploration));
        assert_eq!(state.attributes.get(VIGOR), Some(95));
    }

    #[test]
    fn legacy_history_shape_deserializes() {
        let entry: HistoryEntry =
            serde_json::from_str(r#"{"type": "gemini", "text": "Hello"}"#).unwrap();
        assert_eq!(entry, HistoryEntry::narrator("Hello"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let state: SessionState = serde_json::from_str(r#"{"gameMode": "combat"}"#).unwrap();
        assert_eq!(state.mode, Some(GameMode::Combat));
        assert_eq!(state.attributes, Attributes::starting());
        assert!(state.identity.is_none());
    }
}
