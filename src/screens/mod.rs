//! Screen plugins. Only the character-select flow needs logic; in-game has
//! no overlay of its own.

mod character_select;

pub use character_select::SelectedCharacter;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(character_select::plugin);
}
