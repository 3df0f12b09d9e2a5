//! Critically damped velocity smoothing shared by player, enemy, and camera
//! motion.

use bevy::prelude::*;

/// Per-entity steering state for [`smooth_damp`].
///
/// `damp_velocity` is the spring's derivative term and must persist between
/// ticks; resetting it mid-flight causes a visible hitch.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Steering {
    /// Approximate time (seconds) to settle on the target value.
    pub smooth_time: f32,
    /// Internal spring state. Zero on spawn.
    pub damp_velocity: Vec2,
}

impl Steering {
    #[must_use]
    pub const fn new(smooth_time: f32) -> Self {
        Self {
            smooth_time,
            damp_velocity: Vec2::ZERO,
        }
    }
}

/// Move `current` toward `target` with a critically damped spring.
///
/// Frame-rate independent: the result depends on total elapsed time, not on
/// how that time is sliced into ticks. Never overshoots — once the output
/// would pass the target it is clamped onto it and the spring state is
/// cleared. `smooth_time` is the settle-time constant; smaller is stiffer.
#[must_use]
pub fn smooth_damp(
    current: Vec2,
    target: Vec2,
    damp_velocity: &mut Vec2,
    smooth_time: f32,
    dt: f32,
) -> Vec2 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;

    // Padé-style approximation of e^-x, stable for large steps.
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*damp_velocity + omega * change) * dt;
    *damp_velocity = (*damp_velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Overshoot guard: if we crossed the target this step, snap onto it.
    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *damp_velocity = Vec2::ZERO;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run `ticks` fixed-size steps toward `target` and return the end value.
    fn run_steps(target: Vec2, smooth_time: f32, dt: f32, ticks: usize) -> (Vec2, Vec2) {
        let mut value = Vec2::ZERO;
        let mut damp = Vec2::ZERO;
        for _ in 0..ticks {
            value = smooth_damp(value, target, &mut damp, smooth_time, dt);
        }
        (value, damp)
    }

    #[test]
    fn approach_is_monotonic_and_never_overshoots() {
        let target = Vec2::new(5.0, 0.0);
        let mut value = Vec2::ZERO;
        let mut damp = Vec2::ZERO;
        let mut previous_speed = 0.0;
        for _ in 0..300 {
            value = smooth_damp(value, target, &mut damp, 0.1, 1.0 / 60.0);
            let speed = value.length();
            assert!(
                speed >= previous_speed - 1e-5,
                "speed decreased: {previous_speed} -> {speed}"
            );
            assert!(
                speed <= target.length() + 1e-4,
                "overshot target: {speed} > {}",
                target.length()
            );
            previous_speed = speed;
        }
        assert!(
            (value - target).length() < 1e-2,
            "should have settled on target, got {value:?}"
        );
    }

    #[test]
    fn halved_step_size_reaches_the_same_end_state() {
        let target = Vec2::new(3.0, 4.0);
        let (coarse, _) = run_steps(target, 0.5, 1.0 / 30.0, 30);
        let (fine, _) = run_steps(target, 0.5, 1.0 / 60.0, 60);
        assert!(
            (coarse - fine).length() < 0.05,
            "step-size dependent result: {coarse:?} vs {fine:?}"
        );
    }

    #[test]
    fn settles_within_a_few_time_constants() {
        let target = Vec2::new(-2.0, 1.0);
        // 5 time constants at 60 Hz
        let ticks = (5.0_f32 * 0.2 * 60.0) as usize;
        let (value, _) = run_steps(target, 0.2, 1.0 / 60.0, ticks);
        assert!((value - target).length() < 0.05);
    }

    #[test]
    fn tracks_a_moving_target_without_snapping() {
        let mut value = Vec2::ZERO;
        let mut damp = Vec2::ZERO;
        let mut target = Vec2::new(1.0, 0.0);
        for _ in 0..60 {
            target += Vec2::new(0.05, 0.0);
            value = smooth_damp(value, target, &mut damp, 0.3, 1.0 / 60.0);
        }
        // Still lagging behind a receding target, but moving.
        assert!(value.x > 0.0);
        assert!(value.x < target.x);
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut damp = Vec2::ZERO;
        let out = smooth_damp(Vec2::ONE, Vec2::ZERO, &mut damp, 0.1, 0.0);
        assert!((out - Vec2::ONE).length() < 1e-6);
    }
}
