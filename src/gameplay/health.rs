//! Health protocol: clamped damage/heal with change notifications, a
//! one-shot death edge, and the world-level damage queue.

use bevy::prelude::*;

use crate::gameplay::enemy::Enemy;
use crate::{GameSet, gameplay_running};

// === Components ===

/// Hit points for any damageable entity — player and enemies share this one
/// type. Fields are private: every mutation goes through [`Health::take_damage`]
/// or [`Health::heal`], which keep `0 <= current <= max` and make the
/// `Alive -> Dead` transition one-way.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: f32,
    max: f32,
    dead: bool,
}

/// What a mutation did to a [`Health`], so callers can fan out notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthTransition {
    /// Nothing happened (already dead).
    Unchanged,
    /// `current` moved; entity is still alive.
    Changed,
    /// This mutation crossed the death edge. Reported exactly once.
    Died,
}

impl Health {
    /// Full health at `max`.
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.dead
    }

    /// Subtract `amount` (negative amounts clamp to zero) and clamp into
    /// `[0, max]`. Crossing zero from a positive value reports
    /// [`HealthTransition::Died`] exactly once; any damage after that is a
    /// safe no-op.
    pub fn take_damage(&mut self, amount: f32) -> HealthTransition {
        if self.dead {
            return HealthTransition::Unchanged;
        }
        let amount = amount.max(0.0);
        self.current = (self.current - amount).clamp(0.0, self.max);
        if self.current <= 0.0 {
            self.dead = true;
            HealthTransition::Died
        } else {
            HealthTransition::Changed
        }
    }

    /// Add `amount` (negative amounts clamp to zero) and clamp into
    /// `[0, max]`. Dead entities cannot be revived; healing them is a no-op.
    pub fn heal(&mut self, amount: f32) -> HealthTransition {
        if self.dead {
            return HealthTransition::Unchanged;
        }
        let amount = amount.max(0.0);
        self.current = (self.current + amount).clamp(0.0, self.max);
        HealthTransition::Changed
    }
}

// === Messages ===

/// World damage queue. Attack, projectile, and contact systems enqueue these;
/// [`apply_damage`] drains the queue once per tick so the clamp-and-notify
/// sequence happens in exactly one place.
#[derive(Message, Debug, Clone, Copy)]
pub struct Damage {
    pub target: Entity,
    pub amount: f32,
}

/// `current` changed on some entity's [`Health`]. Zero or more listeners.
#[derive(Message, Debug, Clone, Copy)]
pub struct HealthChanged {
    pub entity: Entity,
    pub current: f32,
    pub max: f32,
}

/// An entity crossed the death edge. Emitted at most once per entity.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Died {
    pub entity: Entity,
}

// === Systems ===

/// `SystemSet` for damage resolution. Listeners that must see this tick's
/// `Died`/`HealthChanged` messages order themselves `.after(DamageResolution)`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DamageResolution;

/// Drains the [`Damage`] queue, mutates [`Health`], and fans out
/// [`HealthChanged`]/[`Died`]. Damage against a despawned target is dropped.
fn apply_damage(
    mut damage: MessageReader<Damage>,
    mut healths: Query<&mut Health>,
    mut changed: MessageWriter<HealthChanged>,
    mut died: MessageWriter<Died>,
) {
    for hit in damage.read() {
        let Ok(mut health) = healths.get_mut(hit.target) else {
            continue;
        };
        match health.take_damage(hit.amount) {
            HealthTransition::Unchanged => {}
            HealthTransition::Changed => {
                changed.write(HealthChanged {
                    entity: hit.target,
                    current: health.current(),
                    max: health.max(),
                });
            }
            HealthTransition::Died => {
                changed.write(HealthChanged {
                    entity: hit.target,
                    current: health.current(),
                    max: health.max(),
                });
                died.write(Died { entity: hit.target });
            }
        }
    }
}

/// Despawns enemies that died this tick. The player is handled by the player
/// module instead (it becomes an inert corpse rather than despawning).
fn despawn_dead(
    mut commands: Commands,
    mut deaths: MessageReader<Died>,
    enemies: Query<(), With<Enemy>>,
) {
    for death in deaths.read() {
        if enemies.contains(death.entity) {
            commands.entity(death.entity).despawn();
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Health>();

    app.add_message::<Damage>()
        .add_message::<HealthChanged>()
        .add_message::<Died>();

    app.add_systems(
        Update,
        (apply_damage.in_set(DamageResolution), despawn_dead)
            .chain()
            .in_set(GameSet::Death)
            .run_if(gameplay_running),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_sets_current_to_max() {
        let health = Health::new(100.0);
        assert_eq!(health.current(), 100.0);
        assert_eq!(health.max(), 100.0);
        assert!(!health.is_dead());
    }

    #[test]
    fn damage_and_heal_stay_in_bounds() {
        let mut health = Health::new(50.0);
        for amount in [0.0, 1.0, 10.0, 49.0, 500.0, -5.0, f32::MAX] {
            let mut probe = health.clone();
            probe.take_damage(amount);
            assert!(probe.current() >= 0.0 && probe.current() <= probe.max());

            let mut probe = health.clone();
            probe.heal(amount);
            assert!(probe.current() >= 0.0 && probe.current() <= probe.max());
        }
        health.take_damage(20.0);
        assert_eq!(health.current(), 30.0);
        health.heal(500.0);
        assert_eq!(health.current(), 50.0);
    }

    #[test]
    fn negative_amounts_are_no_ops() {
        let mut health = Health::new(100.0);
        assert_eq!(health.take_damage(-10.0), HealthTransition::Changed);
        assert_eq!(health.current(), 100.0);
        health.take_damage(30.0);
        assert_eq!(health.heal(-10.0), HealthTransition::Changed);
        assert_eq!(health.current(), 70.0);
    }

    #[test]
    fn death_edge_fires_exactly_once() {
        let mut health = Health::new(30.0);
        let mut deaths = 0;
        for _ in 0..10 {
            if health.take_damage(12.0) == HealthTransition::Died {
                deaths += 1;
            }
        }
        assert_eq!(deaths, 1);
        assert_eq!(health.current(), 0.0);
        assert!(health.is_dead());
    }

    #[test]
    fn overkill_clamps_to_zero() {
        let mut health = Health::new(10.0);
        assert_eq!(health.take_damage(9999.0), HealthTransition::Died);
        assert_eq!(health.current(), 0.0);
    }

    #[test]
    fn heal_after_death_is_a_no_op() {
        let mut health = Health::new(10.0);
        health.take_damage(10.0);
        assert_eq!(health.heal(5.0), HealthTransition::Unchanged);
        assert_eq!(health.current(), 0.0);
        assert!(health.is_dead());
    }
}
