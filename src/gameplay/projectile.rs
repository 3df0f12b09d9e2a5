//! Enemy projectiles: four motion programs, forced lifetime, and hit
//! resolution against the player, walls, and (ignored) fellow enemies.

use std::f32::consts::TAU;

use avian2d::prelude::*;
use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::gameplay::health::{Damage, Health};
use crate::gameplay::player::{Player, resolve_player};
use crate::gameplay::{PlayerHandle, SimRng, aim_rotation, facing};
use crate::third_party::CollisionLayer;
use crate::{GameSet, GameState, Z_PROJECTILE, gameplay_running};

// === Constants ===

/// Projectile collider radius (world units).
pub const PROJECTILE_RADIUS: f32 = 0.15;

/// Speed gained per second by `Accelerating` projectiles.
pub const ACCELERATION_RATE: f32 = 5.0;

/// Max turn rate (radians per second) of `Tracking` projectiles.
pub const TURN_SPEED: f32 = 3.5;

/// Heading-noise scale for `Uncontrolled` projectiles. Each fixed tick
/// perturbs the heading by a uniform draw from ±(`CHAOS_STRENGTH` * 5)°.
pub const CHAOS_STRENGTH: f32 = 5.0;

/// Projectile color (yellow).
const PROJECTILE_COLOR: Color = Color::srgb(1.0, 1.0, 0.3);

// === Components ===

/// Per-tick motion program of a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum MotionProgram {
    /// Velocity frozen at spawn.
    Linear,
    /// Direction frozen, speed ramps by [`ACCELERATION_RATE`].
    Accelerating,
    /// Constant speed, bounded-rate homing rotation toward the player.
    Tracking,
    /// Random spawn heading plus per-tick heading noise, constant speed.
    Uncontrolled,
}

/// Projectile configuration carried by shooters; one spec per enemy kind.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ProjectileSpec {
    pub motion: MotionProgram,
    pub speed: f32,
    pub damage: f32,
    /// Seconds until forced destruction, regardless of motion program.
    pub lifetime: f32,
    /// Fire `pellet_count` pellets with independent angular spread.
    pub shotgun: bool,
    pub pellet_count: u32,
}

/// A projectile in flight. Spawned by [`spawn_projectile`], advanced by
/// `projectile_motion`, resolved by `projectile_hits`.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    pub motion: MotionProgram,
    pub damage: f32,
    pub speed: f32,
    /// Mutable speed used by `Accelerating`; starts at `speed`.
    pub current_speed: f32,
    /// The enemy that fired this projectile; exempt from its own hits.
    pub shooter: Entity,
}

/// Absolute (non-renewable) time-to-live.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Lifetime(pub Timer);

// === Pure Steps ===

/// Speed of an `Accelerating` projectile after one `dt` step.
#[must_use]
pub const fn accelerated_speed(current_speed: f32, dt: f32) -> f32 {
    current_speed + ACCELERATION_RATE * dt
}

/// Signed turn error for `Tracking`: the z component of `desired × facing`.
/// Zero when aligned (and at the unstable directly-behind equilibrium),
/// saturating at ±1 when the target sits perpendicular to the heading.
#[must_use]
pub fn tracking_turn(desired: Vec2, facing: Vec2) -> f32 {
    desired.perp_dot(facing)
}

// === Spawning ===

/// Spawn a projectile entity with all required components.
/// Single source of truth for the projectile archetype.
///
/// `aim` is the unit direction toward the target and `spread` an extra
/// angular offset (radians); `Uncontrolled` projectiles ignore both and
/// launch with a fully random heading. The shooter is recorded so hit
/// resolution can skip contacts with it.
pub fn spawn_projectile(
    commands: &mut Commands,
    rng: &mut ChaCha8Rng,
    shooter: Entity,
    origin: Vec2,
    aim: Vec2,
    spread: f32,
    spec: &ProjectileSpec,
) -> Entity {
    let dir = if spec.motion == MotionProgram::Uncontrolled {
        Vec2::from_angle(rng.random_range(0.0..TAU))
    } else {
        Vec2::from_angle(spread).rotate(aim)
    };

    commands
        .spawn((
            Name::new("Projectile"),
            Projectile {
                motion: spec.motion,
                damage: spec.damage,
                speed: spec.speed,
                current_speed: spec.speed,
                shooter,
            },
            Lifetime(Timer::from_seconds(spec.lifetime, TimerMode::Once)),
            Sprite::from_color(PROJECTILE_COLOR, Vec2::splat(PROJECTILE_RADIUS * 2.0)),
            Transform {
                translation: origin.extend(Z_PROJECTILE),
                rotation: aim_rotation(dir),
                ..default()
            },
            DespawnOnExit(GameState::InGame),
        ))
        .insert((
            RigidBody::Kinematic,
            Collider::circle(PROJECTILE_RADIUS),
            Sensor,
            CollisionLayers::new(
                [CollisionLayer::Hitbox],
                [CollisionLayer::Pushbox, CollisionLayer::Hurtbox],
            ),
            CollisionEventsEnabled,
            CollidingEntities::default(),
            LinearVelocity(dir * spec.speed),
            AngularVelocity(0.0),
        ))
        .id()
}

// === Systems ===

/// Advances every projectile by its motion program. Runs on `FixedUpdate`
/// so acceleration and heading noise integrate with a fixed step.
fn projectile_motion(
    time: Res<Time>,
    player_handle: Res<PlayerHandle>,
    players: Query<&GlobalTransform, With<Player>>,
    mut rng: ResMut<SimRng>,
    mut projectiles: Query<(
        &mut Projectile,
        &mut Transform,
        &mut LinearVelocity,
        &mut AngularVelocity,
    )>,
) {
    let dt = time.delta_secs();
    let player = resolve_player(&player_handle, &players).map(|(_, pos)| pos);

    for (mut projectile, mut transform, mut velocity, mut angular) in &mut projectiles {
        match projectile.motion {
            MotionProgram::Linear => {}
            MotionProgram::Accelerating => {
                projectile.current_speed = accelerated_speed(projectile.current_speed, dt);
                let heading = velocity.0.normalize_or_zero();
                let heading = if heading == Vec2::ZERO {
                    facing(&transform)
                } else {
                    heading
                };
                velocity.0 = heading * projectile.current_speed;
            }
            MotionProgram::Tracking => {
                if let Some(player_pos) = player {
                    let desired =
                        (player_pos - transform.translation.truncate()).normalize_or_zero();
                    angular.0 = -tracking_turn(desired, facing(&transform)) * TURN_SPEED;
                }
                // No player: fly straight at the current heading.
                velocity.0 = facing(&transform) * projectile.speed;
            }
            MotionProgram::Uncontrolled => {
                let bound = CHAOS_STRENGTH * 5.0;
                let noise = rng.0.random_range(-bound..bound).to_radians();
                transform.rotate_z(noise);
                velocity.0 = facing(&transform) * projectile.speed;
            }
        }
    }
}

/// Ticks lifetimes and force-despawns expired projectiles.
/// Runs in `GameSet::Combat`.
fn projectile_lifetime(
    time: Res<Time>,
    mut commands: Commands,
    mut projectiles: Query<(Entity, &mut Lifetime), With<Projectile>>,
) {
    for (entity, mut lifetime) in &mut projectiles {
        lifetime.0.tick(time.delta());
        if lifetime.0.is_finished() {
            commands.entity(entity).despawn();
        }
    }
}

/// Resolves this tick's contact pairs for every projectile:
/// the shooter and other projectiles are skipped, the player takes damage
/// (and stops the projectile), other health bearers are passed through
/// untouched, and anything without health (walls, obstacles) stops the
/// projectile without damage. Runs in `GameSet::Combat`.
fn projectile_hits(
    mut commands: Commands,
    projectiles: Query<(Entity, &Projectile, &CollidingEntities)>,
    other_projectiles: Query<(), With<Projectile>>,
    healths: Query<(), With<Health>>,
    players: Query<(), With<Player>>,
    mut damage: MessageWriter<Damage>,
) {
    for (entity, projectile, colliding) in &projectiles {
        for &hit in &colliding.0 {
            if hit == projectile.shooter || other_projectiles.contains(hit) {
                continue;
            }
            if healths.contains(hit) {
                if players.contains(hit) {
                    damage.write(Damage {
                        target: hit,
                        amount: projectile.damage,
                    });
                    commands.entity(entity).despawn();
                    break;
                }
                // No friendly fire: pass through other enemies.
            } else {
                commands.entity(entity).despawn();
                break;
            }
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Projectile>().register_type::<Lifetime>();

    app.add_systems(FixedUpdate, projectile_motion.run_if(gameplay_running));

    app.add_systems(
        Update,
        (projectile_lifetime, projectile_hits)
            .in_set(GameSet::Combat)
            .run_if(gameplay_running),
    );
}
