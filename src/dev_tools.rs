//! Development tools — only included with the `dev` feature.
//!
//! The egui world inspector is added by `main` (it needs a real render
//! target); this module carries the headless-safe debug helpers.

use bevy::prelude::*;

use crate::gameplay::enemy::{EnemyAssets, EnemyKind, spawn_enemy};
use crate::gameplay::player::{Player, resolve_player};
use crate::gameplay::PlayerHandle;
use crate::gameplay_running;

/// Enemies spawned per E key press.
const ENEMIES_PER_SPAWN: usize = 3;

/// Distance from the player at which debug enemies appear.
const DEBUG_SPAWN_DISTANCE: f32 = 6.0;

/// E spawns a fan of enemies around the player, skipping the spawner's
/// off-screen and overlap rules entirely.
fn debug_spawn_enemies(
    keyboard: Res<ButtonInput<KeyCode>>,
    player_handle: Res<PlayerHandle>,
    players: Query<&GlobalTransform, With<Player>>,
    assets: Res<EnemyAssets>,
    mut commands: Commands,
) {
    if !keyboard.just_pressed(KeyCode::KeyE) {
        return;
    }
    let Some((_, player_pos)) = resolve_player(&player_handle, &players) else {
        return;
    };

    for (index, &kind) in EnemyKind::ALL.iter().take(ENEMIES_PER_SPAWN).enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let angle = index as f32 / ENEMIES_PER_SPAWN as f32 * std::f32::consts::TAU;
        let position = player_pos + Vec2::from_angle(angle) * DEBUG_SPAWN_DISTANCE;
        spawn_enemy(&mut commands, kind, position, &assets);
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, debug_spawn_enemies.run_if(gameplay_running));
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::gameplay::enemy::Enemy;
    use crate::testing::{assert_entity_count, create_base_test_app, transition_to_ingame};

    fn create_dev_tools_test_app() -> App {
        let mut app = create_base_test_app();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<PlayerHandle>();
        app.insert_resource(EnemyAssets {
            mesh: Handle::default(),
            material: Handle::default(),
        });
        app.add_systems(Update, debug_spawn_enemies.run_if(gameplay_running));
        transition_to_ingame(&mut app);

        let player = app
            .world_mut()
            .spawn((Player, Transform::IDENTITY, GlobalTransform::IDENTITY))
            .id();
        app.world_mut().resource_mut::<PlayerHandle>().0 = Some(player);
        app
    }

    #[test]
    fn pressing_e_spawns_debug_enemies() {
        let mut app = create_dev_tools_test_app();

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyE);
        app.update();

        assert_entity_count::<With<Enemy>>(&mut app, ENEMIES_PER_SPAWN);
    }

    #[test]
    fn nothing_spawns_without_the_key() {
        let mut app = create_dev_tools_test_app();

        app.update();

        assert_entity_count::<With<Enemy>>(&mut app, 0);
    }
}
