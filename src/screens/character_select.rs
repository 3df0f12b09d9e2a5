//! Character-select flow: number keys pick a roster entry, Enter confirms.
//!
//! Confirmation is the one place where the simulation's dependencies get
//! wired: the player is spawned through the archetype factory, the world's
//! player handle is published, the camera is handed its target, the wave
//! spawner is re-armed, and the game state flips to `InGame`.

use bevy::prelude::*;

use crate::GameState;
use crate::camera::CameraTarget;
use crate::gameplay::PlayerHandle;
use crate::gameplay::player::{CharacterKind, spawn_player};
use crate::gameplay::spawner::WaveSpawner;

/// Number-key bindings, index-aligned with [`CharacterKind::ALL`].
const ROSTER_KEYS: &[KeyCode] = &[KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];

// === Resources ===

/// The currently highlighted roster entry. Confirm is inert until set.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct SelectedCharacter(pub Option<CharacterKind>);

// === Systems ===

/// Number-key roster selection.
fn select_character(keyboard: Res<ButtonInput<KeyCode>>, mut selected: ResMut<SelectedCharacter>) {
    for (index, &key) in ROSTER_KEYS.iter().enumerate() {
        if keyboard.just_pressed(key) {
            let kind = CharacterKind::ALL[index];
            selected.0 = Some(kind);
            info!("selected {}", kind.display_name());
        }
    }
}

/// Enter confirms the selection and starts the game.
fn confirm_selection(
    keyboard: Res<ButtonInput<KeyCode>>,
    selected: Res<SelectedCharacter>,
    mut commands: Commands,
    mut player_handle: ResMut<PlayerHandle>,
    mut camera_target: ResMut<CameraTarget>,
    mut spawner: ResMut<WaveSpawner>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keyboard.just_pressed(KeyCode::Enter) {
        return;
    }
    let Some(kind) = selected.0 else {
        return;
    };

    let player = spawn_player(&mut commands, kind, Vec2::ZERO);
    player_handle.0 = Some(player);
    camera_target.0 = Some(player);
    // First wave lands one full interval after the player appears.
    spawner.rearm();
    next_state.set(GameState::InGame);
    info!("{} enters the arena", kind.display_name());
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<SelectedCharacter>();

    app.init_resource::<SelectedCharacter>();

    app.add_systems(
        Update,
        (select_character, confirm_selection)
            .chain()
            .run_if(in_state(GameState::CharacterSelect)),
    );
}
