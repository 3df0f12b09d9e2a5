//! Wave Arena — top-down wave-survival combat simulation.

pub mod audio;
pub mod camera;
#[cfg(feature = "dev")]
pub mod dev_tools;
pub mod gameplay;
pub mod screens;
pub mod third_party;

#[cfg(test)]
pub mod testing;

use bevy::prelude::*;

/// Primary game states.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Character roster is up; the simulation is not running yet.
    #[default]
    CharacterSelect,
    /// Active gameplay state.
    InGame,
}

/// System sets for the `Update` schedule, chained in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Input polling and player-handle resolution.
    Input,
    /// Enemy decisions, steering, and velocity updates.
    Movement,
    /// Attacks, projectile hits, contact damage.
    Combat,
    /// Damage queue resolution and death handling.
    Death,
    /// Wave spawning.
    Spawning,
    /// Presentation bookkeeping (facing flips, camera view).
    Ui,
}

/// Z layer for the player and enemies.
pub const Z_ACTOR: f32 = 1.0;

/// Z layer for projectiles (drawn above actors).
pub const Z_PROJECTILE: f32 = 1.5;

/// Run condition: the simulation only advances while in-game.
pub fn gameplay_running(state: Res<State<GameState>>) -> bool {
    *state.get() == GameState::InGame
}

/// Root plugin: states, system-set ordering, and all domain plugins.
///
/// Physics ([`third_party::plugin`]) is added separately by `main` so that
/// headless test apps can run the simulation systems without the avian
/// pipeline.
pub fn plugin(app: &mut App) {
    app.init_state::<GameState>();

    app.configure_sets(
        Update,
        (
            GameSet::Input,
            GameSet::Movement,
            GameSet::Combat,
            GameSet::Death,
            GameSet::Spawning,
            GameSet::Ui,
        )
            .chain(),
    );

    app.add_plugins((
        audio::plugin,
        camera::plugin,
        gameplay::plugin,
        screens::plugin,
    ));

    #[cfg(feature = "dev")]
    app.add_plugins(dev_tools::plugin);
}
