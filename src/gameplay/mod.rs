//! Gameplay domain: health protocol, steering, player, enemies, projectiles,
//! and wave spawning.

pub mod enemy;
pub mod health;
pub mod player;
pub mod projectile;
pub mod spawner;
pub mod steering;

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// === Components ===

/// Movement capability: top speed in world units per second.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Movement {
    pub speed: f32,
}

// === Resources ===

/// The world's single authoritative player reference.
///
/// Set by the character-select confirm flow; agents validate it against a
/// `With<Player>` query every tick and it is lazily re-resolved when stale.
/// Nothing in the simulation scans the world for the player.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct PlayerHandle(pub Option<Entity>);

/// Seedable simulation RNG. Every random decision (spawn placement, enemy
/// selection, shotgun spread, uncontrolled projectile headings, audio clip
/// choice) draws from this so scenarios are reproducible under a fixed seed.
#[derive(Resource, Debug)]
pub struct SimRng(pub ChaCha8Rng);

impl SimRng {
    /// RNG with a fixed seed, for reproducible runs and tests.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self(ChaCha8Rng::from_os_rng())
    }
}

// === Helpers ===

/// Rotation that points an entity's local "up" (the sprite-forward axis)
/// along `dir`. The 90° offset converts a math angle (0 = +X) to the
/// sprite convention (0 = +Y).
#[must_use]
pub fn aim_rotation(dir: Vec2) -> Quat {
    Quat::from_rotation_z(dir.y.atan2(dir.x) - FRAC_PI_2)
}

/// An entity's current facing: local "up" in world space.
#[must_use]
pub fn facing(transform: &Transform) -> Vec2 {
    (transform.rotation * Vec3::Y).truncate()
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Movement>().register_type::<PlayerHandle>();

    app.init_resource::<SimRng>().init_resource::<PlayerHandle>();

    app.add_plugins((
        health::plugin,
        player::plugin,
        enemy::plugin,
        projectile::plugin,
        spawner::plugin,
    ));
}
