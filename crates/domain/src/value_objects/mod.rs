//! Value objects for the session domain

mod archetype;
mod attributes;
mod game_mode;
mod names;
mod screen;

pub use archetype::Archetype;
pub use attributes::{
    Attributes, ADAPTATION, INFLUENCE, INGENUITY, MAX_ATTRIBUTE, MIN_ATTRIBUTE, VIGOR,
};
pub use game_mode::GameMode;
pub use names::{CharacterName, DisplayName, MAX_DISPLAY_NAME_LENGTH, MIN_DISPLAY_NAME_LENGTH};
pub use screen::Screen;
