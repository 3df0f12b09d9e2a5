//! Player agent: movement-intent input seam, steered motion, sprite facing,
//! and the defeated (inert corpse) state.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::gameplay::health::{DamageResolution, Died, Health};
use crate::gameplay::steering::{Steering, smooth_damp};
use crate::gameplay::{Movement, PlayerHandle};
use crate::third_party::CollisionLayer;
use crate::{GameSet, GameState, Z_ACTOR, gameplay_running};

// === Constants ===

/// Player collider radius (world units).
pub const PLAYER_RADIUS: f32 = 0.45;

/// Player sprite color (cyan).
const PLAYER_COLOR: Color = Color::srgb(0.3, 0.85, 0.9);

// === Components ===

/// Marker for the player entity.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Marker inserted when the player dies. A defeated player stops consuming
/// movement intent and stays in the world as an inert obstacle.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Defeated;

// === Character Roster ===

/// Selectable player characters.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum CharacterKind {
    Vanguard,
    Scout,
    Bulwark,
}

impl CharacterKind {
    /// All characters, in roster order (number-key order on the select screen).
    pub const ALL: &[Self] = &[Self::Vanguard, Self::Scout, Self::Bulwark];

    /// Human-readable display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Vanguard => "Vanguard",
            Self::Scout => "Scout",
            Self::Bulwark => "Bulwark",
        }
    }
}

/// Stats for a character. All values are compile-time constants.
#[derive(Debug, Clone, Copy)]
pub struct CharacterStats {
    pub max_health: f32,
    pub move_speed: f32,
    pub smooth_time: f32,
}

/// Look up stats for a character.
#[must_use]
pub const fn character_stats(kind: CharacterKind) -> CharacterStats {
    match kind {
        CharacterKind::Vanguard => CharacterStats {
            max_health: 100.0,
            move_speed: 5.0,
            smooth_time: 0.1,
        },
        CharacterKind::Scout => CharacterStats {
            max_health: 70.0,
            move_speed: 7.0,
            smooth_time: 0.06,
        },
        CharacterKind::Bulwark => CharacterStats {
            max_health: 160.0,
            move_speed: 3.5,
            smooth_time: 0.16,
        },
    }
}

// === Resources ===

/// Current movement intent from the input collaborator: a normalized 2D
/// vector, or zero. The simulation only ever reads this resource; how it is
/// produced (keyboard, gamepad, replay) is not the core's concern.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct MoveIntent(pub Vec2);

// === Spawning ===

/// Spawn the player entity with all required components.
/// Single source of truth for the player archetype.
pub fn spawn_player(commands: &mut Commands, kind: CharacterKind, position: Vec2) -> Entity {
    let stats = character_stats(kind);
    commands
        .spawn((
            Name::new(kind.display_name()),
            Player,
            kind,
            Health::new(stats.max_health),
            Movement {
                speed: stats.move_speed,
            },
            Steering::new(stats.smooth_time),
            Sprite::from_color(PLAYER_COLOR, Vec2::splat(PLAYER_RADIUS * 2.0)),
            Transform::from_xyz(position.x, position.y, Z_ACTOR),
            DespawnOnExit(GameState::InGame),
        ))
        .insert((
            RigidBody::Dynamic,
            Collider::circle(PLAYER_RADIUS),
            CollisionLayers::new(
                [CollisionLayer::Pushbox, CollisionLayer::Hurtbox],
                [CollisionLayer::Pushbox, CollisionLayer::Hitbox],
            ),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::ZERO,
        ))
        .id()
}

// === Helpers ===

/// Resolve the authoritative player handle against a live query.
/// Returns `None` while no (live) player exists; callers skip their tick.
pub fn resolve_player(
    handle: &PlayerHandle,
    players: &Query<&GlobalTransform, With<Player>>,
) -> Option<(Entity, Vec2)> {
    let entity = handle.0?;
    let transform = players.get(entity).ok()?;
    Some((entity, transform.translation().truncate()))
}

// === Systems ===

/// Re-resolves the world's player handle when it is missing or stale.
/// Runs in `GameSet::Input`.
fn refresh_player_handle(mut handle: ResMut<PlayerHandle>, players: Query<Entity, With<Player>>) {
    if handle.0.is_some_and(|entity| players.contains(entity)) {
        return;
    }
    handle.0 = players.iter().next();
}

/// Polls the keyboard into [`MoveIntent`]. Runs in `GameSet::Input`.
fn poll_move_intent(keyboard: Res<ButtonInput<KeyCode>>, mut intent: ResMut<MoveIntent>) {
    let mut raw = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        raw.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        raw.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        raw.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        raw.x += 1.0;
    }
    intent.0 = raw.normalize_or_zero();
}

/// Steers the player's velocity toward `intent * move_speed`.
/// Runs in `GameSet::Movement`; skipped once defeated.
fn player_movement(
    time: Res<Time>,
    intent: Res<MoveIntent>,
    mut players: Query<
        (&Movement, &mut Steering, &mut LinearVelocity),
        (With<Player>, Without<Defeated>),
    >,
) {
    for (movement, mut steering, mut velocity) in &mut players {
        let desired = intent.0 * movement.speed;
        let smooth_time = steering.smooth_time;
        velocity.0 = smooth_damp(
            velocity.0,
            desired,
            &mut steering.damp_velocity,
            smooth_time,
            time.delta_secs(),
        );
    }
}

/// Flips the player sprite to face the horizontal movement direction.
/// Zero horizontal intent leaves the facing unchanged.
/// Runs in `GameSet::Ui`; skipped once defeated.
fn player_facing(
    intent: Res<MoveIntent>,
    mut players: Query<&mut Sprite, (With<Player>, Without<Defeated>)>,
) {
    for mut sprite in &mut players {
        if intent.0.x < 0.0 {
            sprite.flip_x = true;
        } else if intent.0.x > 0.0 {
            sprite.flip_x = false;
        }
    }
}

/// Converts the player's death notification into the inert-corpse state:
/// velocity zeroed, intent cleared, [`Defeated`] inserted. The entity and
/// its collider remain in the world.
fn player_defeated(
    mut commands: Commands,
    mut deaths: MessageReader<Died>,
    mut players: Query<&mut LinearVelocity, With<Player>>,
    mut intent: ResMut<MoveIntent>,
) {
    for death in deaths.read() {
        let Ok(mut velocity) = players.get_mut(death.entity) else {
            continue;
        };
        velocity.0 = Vec2::ZERO;
        intent.0 = Vec2::ZERO;
        commands.entity(death.entity).insert(Defeated);
        info!("player defeated");
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Player>()
        .register_type::<Defeated>()
        .register_type::<CharacterKind>()
        .register_type::<MoveIntent>();

    app.init_resource::<MoveIntent>();

    app.add_systems(
        Update,
        (
            (refresh_player_handle, poll_move_intent).in_set(GameSet::Input),
            player_movement.in_set(GameSet::Movement),
            player_defeated
                .in_set(GameSet::Death)
                .after(DamageResolution),
            player_facing.in_set(GameSet::Ui),
        )
            .run_if(gameplay_running),
    );
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::gameplay::health::Damage;
    use crate::testing::advance_and_update;
    use bevy::input::InputPlugin;
    use std::time::Duration;

    fn create_input_test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, InputPlugin));
        app.init_resource::<MoveIntent>();
        app.add_systems(Update, poll_move_intent);
        app
    }

    #[test]
    fn intent_follows_keyboard() {
        let mut app = create_input_test_app();

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyD);
        app.update();

        assert!((app.world().resource::<MoveIntent>().0 - Vec2::X).length() < 1e-6);
    }

    #[test]
    fn diagonal_intent_is_normalized() {
        let mut app = create_input_test_app();

        {
            let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keyboard.press(KeyCode::KeyW);
            keyboard.press(KeyCode::KeyD);
        }
        app.update();

        let intent = app.world().resource::<MoveIntent>().0;
        assert!((intent.length() - 1.0).abs() < 1e-5);
        assert!(intent.x > 0.0 && intent.y > 0.0);
    }

    #[test]
    fn no_keys_means_zero_intent() {
        let mut app = create_input_test_app();
        app.update();
        assert_eq!(app.world().resource::<MoveIntent>().0, Vec2::ZERO);
    }

    fn create_movement_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<MoveIntent>();
        app.add_systems(Update, player_movement);
        app.update(); // Initialize time
        app
    }

    fn spawn_movable_player(world: &mut World, speed: f32) -> Entity {
        world
            .spawn((
                Player,
                Movement { speed },
                Steering::new(0.1),
                LinearVelocity::ZERO,
            ))
            .id()
    }

    #[test]
    fn velocity_converges_on_intent_times_speed() {
        let mut app = create_movement_test_app();
        let player = spawn_movable_player(app.world_mut(), 5.0);
        app.world_mut().resource_mut::<MoveIntent>().0 = Vec2::X;

        for _ in 0..120 {
            advance_and_update(&mut app, Duration::from_millis(16));
        }

        let velocity = app.world().get::<LinearVelocity>(player).unwrap();
        assert!(
            (velocity.0.x - 5.0).abs() < 0.1,
            "expected ~5.0, got {}",
            velocity.0.x
        );
        assert!(velocity.0.y.abs() < 1e-4);
    }

    #[test]
    fn zero_intent_brakes_to_rest() {
        let mut app = create_movement_test_app();
        let player = spawn_movable_player(app.world_mut(), 5.0);
        app.world_mut().get_mut::<LinearVelocity>(player).unwrap().0 = Vec2::new(5.0, 0.0);

        for _ in 0..120 {
            advance_and_update(&mut app, Duration::from_millis(16));
        }

        let velocity = app.world().get::<LinearVelocity>(player).unwrap();
        assert!(
            velocity.0.length() < 0.05,
            "expected rest, got {:?}",
            velocity.0
        );
    }

    #[test]
    fn stale_player_handle_is_reresolved() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<PlayerHandle>();
        app.add_systems(Update, refresh_player_handle);

        let player = app.world_mut().spawn(Player).id();
        app.update();
        assert_eq!(app.world().resource::<PlayerHandle>().0, Some(player));

        app.world_mut().despawn(player);
        app.update();
        assert_eq!(app.world().resource::<PlayerHandle>().0, None);
    }

    #[test]
    fn sprite_flips_with_horizontal_intent() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<MoveIntent>();
        app.add_systems(Update, player_facing);
        let player = app
            .world_mut()
            .spawn((Player, Sprite::from_color(Color::WHITE, Vec2::ONE)))
            .id();

        app.world_mut().resource_mut::<MoveIntent>().0 = Vec2::NEG_X;
        app.update();
        assert!(app.world().get::<Sprite>(player).unwrap().flip_x);

        // Zero intent keeps the last facing.
        app.world_mut().resource_mut::<MoveIntent>().0 = Vec2::ZERO;
        app.update();
        assert!(app.world().get::<Sprite>(player).unwrap().flip_x);

        app.world_mut().resource_mut::<MoveIntent>().0 = Vec2::X;
        app.update();
        assert!(!app.world().get::<Sprite>(player).unwrap().flip_x);
    }

    fn create_defeat_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<Damage>();
        app.add_message::<Died>();
        app.init_resource::<MoveIntent>();
        app.add_systems(Update, player_defeated);
        app
    }

    #[test]
    fn death_inserts_defeated_and_zeroes_velocity() {
        let mut app = create_defeat_test_app();
        let player = app
            .world_mut()
            .spawn((Player, LinearVelocity(Vec2::new(3.0, -2.0))))
            .id();
        app.world_mut().resource_mut::<MoveIntent>().0 = Vec2::X;

        app.world_mut().write_message(Died { entity: player });
        app.update();
        app.update(); // deferred insert applies

        assert!(app.world().get::<Defeated>(player).is_some());
        assert_eq!(
            app.world().get::<LinearVelocity>(player).unwrap().0,
            Vec2::ZERO
        );
        assert_eq!(app.world().resource::<MoveIntent>().0, Vec2::ZERO);
    }

    #[test]
    fn non_player_death_is_ignored() {
        let mut app = create_defeat_test_app();
        let player = app
            .world_mut()
            .spawn((Player, LinearVelocity(Vec2::new(1.0, 0.0))))
            .id();
        let other = app.world_mut().spawn_empty().id();

        app.world_mut().write_message(Died { entity: other });
        app.update();
        app.update();

        assert!(app.world().get::<Defeated>(player).is_none());
    }
}
