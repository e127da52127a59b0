//! Echoverse domain: the session state of one player's adventure and the
//! value objects that keep it valid.

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{
    Character, FactionRelation, HistoryEntry, InventoryItem, NpcRecord, PlayerIdentity,
    QuestRecord, SessionState, Speaker, WorldEventRecord, BONUS_ATTRIBUTE_AMOUNT,
    BONUS_MARKER_DESCRIPTION, BONUS_MARKER_NAME, STARTING_LOCATION,
};
pub use error::DomainError;
pub use ids::UserId;
pub use value_objects::{
    Archetype, Attributes, CharacterName, DisplayName, GameMode, ADAPTATION, INFLUENCE, INGENUITY,
    MAX_ATTRIBUTE, MAX_DISPLAY_NAME_LENGTH, MIN_ATTRIBUTE, MIN_DISPLAY_NAME_LENGTH, Screen, VIGOR,
};
