//! Enemy agents: distance-based movement styles, cooldown-gated attacks,
//! and contact damage.

use std::time::Duration;

use avian2d::prelude::*;
use bevy::prelude::*;
use rand::Rng;

use crate::audio::AttackSound;
use crate::gameplay::health::{Damage, Health};
use crate::gameplay::player::{Player, resolve_player};
use crate::gameplay::projectile::{MotionProgram, ProjectileSpec, spawn_projectile};
use crate::gameplay::steering::{Steering, smooth_damp};
use crate::gameplay::{Movement, PlayerHandle, SimRng, aim_rotation};
use crate::third_party::CollisionLayer;
use crate::{GameSet, GameState, Z_ACTOR, gameplay_running};

// === Constants ===

/// Enemy collider radius (world units).
pub const ENEMY_RADIUS: f32 = 0.4;

/// Melee attacks require the player within this distance.
pub const MELEE_ATTACK_RANGE: f32 = 1.5;

/// Projectile attacks require the player within this distance.
pub const PROJECTILE_ATTACK_RANGE: f32 = 15.0;

/// Minimum seconds between contact-damage ticks while touching the player.
/// Contact damage is a separate channel from the attack cooldown; this keeps
/// persistent overlap from draining health every physics frame.
pub const CONTACT_DAMAGE_COOLDOWN: f32 = 0.5;

/// Shotgun pellets each get an independent spread in ±30° off the aim line.
const SHOTGUN_SPREAD: f32 = 30.0_f32 * (std::f32::consts::PI / 180.0);

/// Enemy mesh color (crimson).
const ENEMY_COLOR: Color = Color::srgb(0.85, 0.2, 0.25);

// === Behavior Enums ===

/// How an enemy positions itself relative to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AttackStyle {
    /// Hold at `distant_range`, backing off when pressed.
    StaysDistant,
    /// Hold at `close_range`, backing off only when crowded.
    StaysClose,
    /// Always close in.
    Kamikaze,
}

/// How an enemy deals deliberate damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AttackType {
    Melee,
    Projectile,
}

/// Range gate for a deliberate attack.
#[must_use]
pub const fn attack_range(attack_type: AttackType) -> f32 {
    match attack_type {
        AttackType::Melee => MELEE_ATTACK_RANGE,
        AttackType::Projectile => PROJECTILE_ATTACK_RANGE,
    }
}

// === Components ===

/// Marker for enemy entities.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Enemy;

/// Decision-loop parameters: movement style, attack type, and the distance
/// bands the style steers by.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct EnemyAi {
    pub style: AttackStyle,
    pub attack_type: AttackType,
    pub close_range: f32,
    pub distant_range: f32,
    /// Rotate directly (not smoothed) to face the player each tick.
    pub face_player: bool,
}

/// Deliberate-attack stats.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CombatStats {
    pub damage: f32,
    /// Attacks per second.
    pub attack_rate: f32,
}

/// One-shot attack cooldown. `finished()` means eligible — an enemy that
/// comes into range after its cooldown elapsed attacks immediately, and the
/// timer is only re-armed by a successful attack.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AttackTimer(pub Timer);

impl AttackTimer {
    /// Cooldown for `attack_rate` attacks/second, starting eligible.
    #[must_use]
    pub fn ready(attack_rate: f32) -> Self {
        let mut timer = Timer::from_seconds(1.0 / attack_rate, TimerMode::Once);
        let duration = timer.duration();
        timer.set_elapsed(duration);
        timer.tick(Duration::ZERO);
        Self(timer)
    }
}

/// Projectile configuration for `AttackType::Projectile` enemies.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ProjectileAttack(pub ProjectileSpec);

/// Damage applied on physical overlap with the player, on its own cooldown,
/// independent of [`AttackTimer`]. Carried by melee-type and kamikaze-style
/// enemies.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ContactDamage {
    pub damage: f32,
    pub timer: Timer,
}

impl ContactDamage {
    /// Contact damage with the default cooldown, starting eligible.
    #[must_use]
    pub fn new(damage: f32) -> Self {
        let mut timer = Timer::from_seconds(CONTACT_DAMAGE_COOLDOWN, TimerMode::Once);
        let duration = timer.duration();
        timer.set_elapsed(duration);
        timer.tick(Duration::ZERO);
        Self { damage, timer }
    }
}

// === Enemy Kinds ===

/// Types of enemies in the game.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum EnemyKind {
    /// Kamikaze melee: charges straight in.
    Rusher,
    /// Close-range melee bruiser.
    Brute,
    /// Keeps its distance, straight shots.
    Archer,
    /// Keeps far away, slow shells that ramp up speed.
    Mortar,
    /// Keeps its distance, homing bolts.
    Warlock,
    /// Mid-range shotgun of erratic pellets.
    Scattershot,
}

impl EnemyKind {
    /// All enemy kinds, for spawner configs and iteration.
    pub const ALL: &[Self] = &[
        Self::Rusher,
        Self::Brute,
        Self::Archer,
        Self::Mortar,
        Self::Warlock,
        Self::Scattershot,
    ];

    /// Human-readable display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Rusher => "Rusher",
            Self::Brute => "Brute",
            Self::Archer => "Archer",
            Self::Mortar => "Mortar",
            Self::Warlock => "Warlock",
            Self::Scattershot => "Scattershot",
        }
    }
}

/// Stats for an enemy kind. All values are compile-time constants.
#[derive(Debug, Clone)]
pub struct EnemyStats {
    pub max_health: f32,
    pub move_speed: f32,
    pub smooth_time: f32,
    pub damage: f32,
    pub attack_rate: f32,
    pub close_range: f32,
    pub distant_range: f32,
    pub face_player: bool,
    pub style: AttackStyle,
    pub attack_type: AttackType,
    pub projectile: Option<ProjectileSpec>,
}

/// Look up stats for an enemy kind.
#[must_use]
pub const fn enemy_stats(kind: EnemyKind) -> EnemyStats {
    match kind {
        EnemyKind::Rusher => EnemyStats {
            max_health: 40.0,
            move_speed: 4.5,
            smooth_time: 0.08,
            damage: 10.0,
            attack_rate: 1.0,
            close_range: 3.0,
            distant_range: 8.0,
            face_player: true,
            style: AttackStyle::Kamikaze,
            attack_type: AttackType::Melee,
            projectile: None,
        },
        EnemyKind::Brute => EnemyStats {
            max_health: 120.0,
            move_speed: 2.5,
            smooth_time: 0.15,
            damage: 20.0,
            attack_rate: 0.8,
            close_range: 3.0,
            distant_range: 8.0,
            face_player: false,
            style: AttackStyle::StaysClose,
            attack_type: AttackType::Melee,
            projectile: None,
        },
        EnemyKind::Archer => EnemyStats {
            max_health: 50.0,
            move_speed: 3.0,
            smooth_time: 0.1,
            damage: 8.0,
            attack_rate: 1.0,
            close_range: 3.0,
            distant_range: 8.0,
            face_player: true,
            style: AttackStyle::StaysDistant,
            attack_type: AttackType::Projectile,
            projectile: Some(ProjectileSpec {
                motion: MotionProgram::Linear,
                speed: 10.0,
                damage: 8.0,
                lifetime: 5.0,
                shotgun: false,
                pellet_count: 1,
            }),
        },
        EnemyKind::Mortar => EnemyStats {
            max_health: 70.0,
            move_speed: 2.0,
            smooth_time: 0.15,
            damage: 15.0,
            attack_rate: 0.5,
            close_range: 3.0,
            distant_range: 10.0,
            face_player: true,
            style: AttackStyle::StaysDistant,
            attack_type: AttackType::Projectile,
            projectile: Some(ProjectileSpec {
                motion: MotionProgram::Accelerating,
                speed: 4.0,
                damage: 15.0,
                lifetime: 6.0,
                shotgun: false,
                pellet_count: 1,
            }),
        },
        EnemyKind::Warlock => EnemyStats {
            max_health: 60.0,
            move_speed: 2.5,
            smooth_time: 0.12,
            damage: 12.0,
            attack_rate: 0.4,
            close_range: 3.0,
            distant_range: 9.0,
            face_player: true,
            style: AttackStyle::StaysDistant,
            attack_type: AttackType::Projectile,
            projectile: Some(ProjectileSpec {
                motion: MotionProgram::Tracking,
                speed: 6.0,
                damage: 12.0,
                lifetime: 4.0,
                shotgun: false,
                pellet_count: 1,
            }),
        },
        EnemyKind::Scattershot => EnemyStats {
            max_health: 80.0,
            move_speed: 3.0,
            smooth_time: 0.1,
            damage: 5.0,
            attack_rate: 0.6,
            close_range: 4.0,
            distant_range: 8.0,
            face_player: true,
            style: AttackStyle::StaysClose,
            attack_type: AttackType::Projectile,
            projectile: Some(ProjectileSpec {
                motion: MotionProgram::Uncontrolled,
                speed: 8.0,
                damage: 5.0,
                lifetime: 2.5,
                shotgun: true,
                pellet_count: 5,
            }),
        },
    }
}

// === Decision Logic ===

/// Desired movement direction for a style given the player bearing.
///
/// `dir_to_player` must be unit length (or zero when on top of the player).
/// Both banded styles keep a dead zone where the result is zero so enemies
/// settle instead of oscillating across the band edge.
#[must_use]
pub fn desired_direction(
    style: AttackStyle,
    dir_to_player: Vec2,
    distance: f32,
    close_range: f32,
    distant_range: f32,
) -> Vec2 {
    match style {
        AttackStyle::Kamikaze => dir_to_player,
        AttackStyle::StaysClose => {
            if distance > close_range {
                dir_to_player
            } else if distance < close_range * 0.5 {
                -dir_to_player
            } else {
                Vec2::ZERO
            }
        }
        AttackStyle::StaysDistant => {
            if distance > distant_range {
                dir_to_player
            } else if distance < distant_range - 1.0 {
                -dir_to_player
            } else {
                Vec2::ZERO
            }
        }
    }
}

// === Resources ===

/// Shared mesh and material handles for enemy rendering.
#[derive(Resource, Debug)]
pub struct EnemyAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<ColorMaterial>,
}

// === Spawning ===

/// Spawn an enemy entity with all required components.
/// Single source of truth for the enemy archetype.
pub fn spawn_enemy(
    commands: &mut Commands,
    kind: EnemyKind,
    position: Vec2,
    assets: &EnemyAssets,
) -> Entity {
    let stats = enemy_stats(kind);
    let mut entity = commands.spawn((
        Name::new(kind.display_name()),
        Enemy,
        kind,
        EnemyAi {
            style: stats.style,
            attack_type: stats.attack_type,
            close_range: stats.close_range,
            distant_range: stats.distant_range,
            face_player: stats.face_player,
        },
        CombatStats {
            damage: stats.damage,
            attack_rate: stats.attack_rate,
        },
        AttackTimer::ready(stats.attack_rate),
        Health::new(stats.max_health),
        Movement {
            speed: stats.move_speed,
        },
        Steering::new(stats.smooth_time),
        Mesh2d(assets.mesh.clone()),
        MeshMaterial2d(assets.material.clone()),
        Transform::from_xyz(position.x, position.y, Z_ACTOR),
        DespawnOnExit(GameState::InGame),
    ));
    entity.insert((
        RigidBody::Dynamic,
        Collider::circle(ENEMY_RADIUS),
        CollisionLayers::new(
            [CollisionLayer::Pushbox],
            [CollisionLayer::Pushbox, CollisionLayer::Hurtbox],
        ),
        LockedAxes::ROTATION_LOCKED,
        LinearVelocity::ZERO,
        CollisionEventsEnabled,
        CollidingEntities::default(),
    ));
    if let Some(spec) = stats.projectile {
        entity.insert(ProjectileAttack(spec));
    }
    if matches!(stats.attack_type, AttackType::Melee)
        || matches!(stats.style, AttackStyle::Kamikaze)
    {
        entity.insert(ContactDamage::new(stats.damage));
    }
    entity.id()
}

// === Systems ===

fn setup_enemy_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.insert_resource(EnemyAssets {
        mesh: meshes.add(Circle::new(ENEMY_RADIUS)),
        material: materials.add(ENEMY_COLOR),
    });
}

/// Steers each enemy by its movement style and, when enabled, rotates it to
/// face the player directly. Skipped while no player resolves.
/// Runs in `GameSet::Movement`.
fn enemy_movement(
    time: Res<Time>,
    player_handle: Res<PlayerHandle>,
    players: Query<&GlobalTransform, With<Player>>,
    mut enemies: Query<
        (
            &EnemyAi,
            &Movement,
            &mut Steering,
            &mut LinearVelocity,
            &mut Transform,
        ),
        With<Enemy>,
    >,
) {
    let Some((_, player_pos)) = resolve_player(&player_handle, &players) else {
        return;
    };

    for (ai, movement, mut steering, mut velocity, mut transform) in &mut enemies {
        let to_player = player_pos - transform.translation.truncate();
        let distance = to_player.length();
        let dir = to_player.normalize_or_zero();

        let desired = desired_direction(ai.style, dir, distance, ai.close_range, ai.distant_range)
            * movement.speed;
        let smooth_time = steering.smooth_time;
        velocity.0 = smooth_damp(
            velocity.0,
            desired,
            &mut steering.damp_velocity,
            smooth_time,
            time.delta_secs(),
        );

        if ai.face_player && dir != Vec2::ZERO {
            transform.rotation = aim_rotation(dir);
        }
    }
}

/// Cooldown- and range-gated deliberate attacks. Melee enqueues damage on
/// the player directly; projectile spawns one projectile (or a pellet fan
/// when shotgun). The cooldown only re-arms on a successful attack.
/// Runs in `GameSet::Combat`.
fn enemy_attack(
    time: Res<Time>,
    player_handle: Res<PlayerHandle>,
    players: Query<&GlobalTransform, With<Player>>,
    mut enemies: Query<
        (
            Entity,
            &GlobalTransform,
            &EnemyAi,
            &CombatStats,
            &mut AttackTimer,
            Option<&ProjectileAttack>,
        ),
        With<Enemy>,
    >,
    mut rng: ResMut<SimRng>,
    mut damage: MessageWriter<Damage>,
    mut sounds: MessageWriter<AttackSound>,
    mut commands: Commands,
) {
    let player = resolve_player(&player_handle, &players);

    for (entity, transform, ai, stats, mut timer, projectile_attack) in &mut enemies {
        // Cooldowns elapse even while the player is unresolvable or out of
        // range; the enemy then attacks the moment it gets the chance.
        timer.0.tick(time.delta());

        let Some((player_entity, player_pos)) = player else {
            continue;
        };
        if !timer.0.is_finished() {
            continue;
        }

        let to_player = player_pos - transform.translation().truncate();
        if to_player.length() > attack_range(ai.attack_type) {
            continue;
        }

        match ai.attack_type {
            AttackType::Melee => {
                damage.write(Damage {
                    target: player_entity,
                    amount: stats.damage,
                });
            }
            AttackType::Projectile => {
                let Some(ProjectileAttack(spec)) = projectile_attack else {
                    continue;
                };
                let origin = transform.translation().truncate();
                let aim = to_player.normalize_or_zero();
                if spec.shotgun {
                    for _ in 0..spec.pellet_count {
                        let spread = rng.0.random_range(-SHOTGUN_SPREAD..SHOTGUN_SPREAD);
                        spawn_projectile(&mut commands, &mut rng.0, entity, origin, aim, spread, spec);
                    }
                } else {
                    spawn_projectile(&mut commands, &mut rng.0, entity, origin, aim, 0.0, spec);
                }
            }
        }

        sounds.write(AttackSound);
        timer.0.reset();
    }
}

/// Applies contact damage while an enemy physically overlaps the player,
/// rate-limited by the per-enemy contact cooldown (never by the attack
/// cooldown). Runs in `GameSet::Combat`.
fn contact_damage(
    time: Res<Time>,
    player_handle: Res<PlayerHandle>,
    mut enemies: Query<(&mut ContactDamage, &CollidingEntities), With<Enemy>>,
    mut damage: MessageWriter<Damage>,
) {
    for (mut contact, colliding) in &mut enemies {
        contact.timer.tick(time.delta());
        if !contact.timer.is_finished() {
            continue;
        }
        let Some(player) = player_handle.0 else {
            continue;
        };
        if colliding.0.contains(&player) {
            damage.write(Damage {
                target: player,
                amount: contact.damage,
            });
            contact.timer.reset();
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Enemy>()
        .register_type::<EnemyKind>()
        .register_type::<EnemyAi>()
        .register_type::<CombatStats>()
        .register_type::<AttackTimer>()
        .register_type::<ProjectileAttack>()
        .register_type::<ContactDamage>();

    app.add_systems(OnEnter(GameState::InGame), setup_enemy_assets);

    app.add_systems(
        Update,
        (
            enemy_movement.in_set(GameSet::Movement),
            (enemy_attack, contact_damage).in_set(GameSet::Combat),
        )
            .run_if(gameplay_running),
    );
}
