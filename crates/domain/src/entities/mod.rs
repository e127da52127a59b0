//! Domain entities

mod character;
mod session_state;

pub use character::Character;
pub use session_state::{
    FactionRelation, HistoryEntry, InventoryItem, NpcRecord, PlayerIdentity, QuestRecord,
    SessionState, Speaker, WorldEventRecord, BONUS_ATTRIBUTE_AMOUNT, BONUS_MARKER_DESCRIPTION,
    BONUS_MARKER_NAME, STARTING_LOCATION,
};
