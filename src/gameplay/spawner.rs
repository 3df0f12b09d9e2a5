//! Wave spawner: timed enemy spawning on an off-screen ring around the
//! player.

use std::f32::consts::TAU;

use avian2d::prelude::*;
use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::camera::CameraView;
use crate::gameplay::enemy::{EnemyAssets, EnemyKind, spawn_enemy};
use crate::gameplay::player::{Player, resolve_player};
use crate::gameplay::{PlayerHandle, SimRng};
use crate::third_party::surface_distance;
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Placement attempts per spawn cycle before giving up until next tick.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 30;

/// Radius of the overlap probe at a candidate position (world units).
pub const SPAWN_PROBE_RADIUS: f32 = 0.5;

/// Default seconds between spawns.
pub const DEFAULT_TIME_BETWEEN_SPAWNS: f32 = 2.0;

/// Default spawn ring inner radius (world units from the player).
pub const DEFAULT_SPAWN_RADIUS_MIN: f32 = 10.0;

/// Default spawn ring outer radius.
pub const DEFAULT_SPAWN_RADIUS_MAX: f32 = 15.0;

// === Resources ===

/// One spawnable enemy kind. `weight` is carried in the data but the
/// selection policy is uniform-random over entries and does not consult it.
#[derive(Debug, Clone, Reflect)]
pub struct SpawnEntry {
    pub kind: EnemyKind,
    pub weight: f32,
}

/// Wave spawner configuration and timing.
///
/// The timer is one-shot and only re-armed by a *successful* spawn: a cycle
/// whose 30 placement attempts all fail leaves the timer elapsed, so the
/// spawner retries every tick until a position clears. A permanently
/// obstructed ring therefore starves spawning rather than erroring.
#[derive(Resource, Debug, Reflect)]
#[reflect(Resource)]
pub struct WaveSpawner {
    pub entries: Vec<SpawnEntry>,
    pub time_between_spawns: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub timer: Timer,
}

impl WaveSpawner {
    /// Restart the interval from now. Called after each successful spawn and
    /// when a new player is handed to the spawner.
    pub fn rearm(&mut self) {
        self.timer = Timer::from_seconds(self.time_between_spawns, TimerMode::Once);
    }
}

impl Default for WaveSpawner {
    fn default() -> Self {
        Self {
            entries: EnemyKind::ALL
                .iter()
                .map(|&kind| SpawnEntry { kind, weight: 50.0 })
                .collect(),
            time_between_spawns: DEFAULT_TIME_BETWEEN_SPAWNS,
            radius_min: DEFAULT_SPAWN_RADIUS_MIN,
            radius_max: DEFAULT_SPAWN_RADIUS_MAX,
            timer: Timer::from_seconds(DEFAULT_TIME_BETWEEN_SPAWNS, TimerMode::Once),
        }
    }
}

// === Pure Functions ===

/// Sample one candidate position: a uniformly random direction from the
/// player at a distance uniform in `[radius_min, radius_max]`.
#[must_use]
pub fn sample_spawn_candidate(
    rng: &mut ChaCha8Rng,
    player_pos: Vec2,
    radius_min: f32,
    radius_max: f32,
) -> Vec2 {
    let dir = Vec2::from_angle(rng.random_range(0.0..TAU));
    let distance = rng.random_range(radius_min..=radius_max);
    player_pos + dir * distance
}

// === Systems ===

/// Narrow-phase sweep: does a probe circle at `candidate` overlap any
/// existing collider?
fn placement_blocked(candidate: Vec2, colliders: &Query<(&GlobalTransform, &Collider)>) -> bool {
    let probe = Collider::circle(SPAWN_PROBE_RADIUS);
    colliders.iter().any(|(transform, collider)| {
        surface_distance(&probe, candidate, collider, transform.translation().truncate()) <= 0.0
    })
}

/// Ticks the spawn timer; when elapsed and a player resolves, picks a
/// uniform-random enemy kind and tries up to [`MAX_PLACEMENT_ATTEMPTS`]
/// candidate positions, rejecting any that are on screen or overlap existing
/// geometry. Runs in `GameSet::Spawning`.
fn tick_wave_spawner(
    time: Res<Time>,
    mut spawner: ResMut<WaveSpawner>,
    player_handle: Res<PlayerHandle>,
    players: Query<&GlobalTransform, With<Player>>,
    view: Res<CameraView>,
    colliders: Query<(&GlobalTransform, &Collider)>,
    assets: Res<EnemyAssets>,
    mut rng: ResMut<SimRng>,
    mut commands: Commands,
) {
    spawner.timer.tick(time.delta());
    if !spawner.timer.is_finished() {
        return;
    }
    let Some((_, player_pos)) = resolve_player(&player_handle, &players) else {
        return;
    };
    if spawner.entries.is_empty() {
        return;
    }

    // Uniform pick over the configured kinds; the weight field is not
    // consulted.
    let index = rng.0.random_range(0..spawner.entries.len());
    let kind = spawner.entries[index].kind;

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate =
            sample_spawn_candidate(&mut rng.0, player_pos, spawner.radius_min, spawner.radius_max);
        if view.contains(candidate) {
            continue;
        }
        if placement_blocked(candidate, &colliders) {
            continue;
        }
        spawn_enemy(&mut commands, kind, candidate, &assets);
        debug!("spawned {kind:?} at {candidate}");
        spawner.rearm();
        return;
    }
    // Every attempt failed: leave the timer elapsed and retry next tick.
    debug!("spawn placement exhausted around {player_pos}; retrying");
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<WaveSpawner>();

    app.init_resource::<WaveSpawner>();

    app.add_systems(
        Update,
        tick_wave_spawner
            .in_set(GameSet::Spawning)
            .run_if(gameplay_running),
    );
}
