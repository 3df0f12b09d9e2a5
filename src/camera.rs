//! Camera collaborator: fixed-vertical framing, smooth-damp follow, and the
//! world-space viewport rect the wave spawner queries.

use bevy::camera::ScalingMode;
use bevy::prelude::*;

use crate::GameSet;
use crate::gameplay::PlayerHandle;
use crate::gameplay::steering::smooth_damp;

// === Constants ===

/// Visible world-units height of the camera view (FixedVertical scaling).
pub const VIEW_HEIGHT: f32 = 12.0;

/// Camera follow settle time (seconds).
const CAMERA_SMOOTH_TIME: f32 = 0.125;

// === Resources ===

/// The entity the camera tracks. Handed over once by the character-select
/// confirm flow; lazily re-acquired from the player handle when lost.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct CameraTarget(pub Option<Entity>);

/// World-space rectangle currently visible to the camera. Recomputed every
/// tick from the camera transform and window aspect; consumed by the wave
/// spawner's off-screen placement test.
#[derive(Resource, Debug, Clone, Copy, Reflect)]
#[reflect(Resource)]
pub struct CameraView {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Default for CameraView {
    fn default() -> Self {
        // 16:9 until the first window measurement comes in.
        Self {
            center: Vec2::ZERO,
            half_extents: Vec2::new(VIEW_HEIGHT * (16.0 / 9.0), VIEW_HEIGHT) / 2.0,
        }
    }
}

impl CameraView {
    /// Project a world position into viewport space; on-screen positions
    /// land strictly inside `(0,1) x (0,1)`.
    #[must_use]
    pub fn viewport_point(&self, world: Vec2) -> Vec2 {
        (world - self.center) / (self.half_extents * 2.0) + Vec2::splat(0.5)
    }

    /// Whether a world position is on screen.
    #[must_use]
    pub fn contains(&self, world: Vec2) -> bool {
        let point = self.viewport_point(world);
        point.x > 0.0 && point.x < 1.0 && point.y > 0.0 && point.y < 1.0
    }
}

// === Systems ===

/// Spawns the global 2D camera. Persists across all states.
fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: VIEW_HEIGHT,
            },
            ..OrthographicProjection::default_2d()
        }),
    ));
}

/// Smooth-damps the camera toward its target. A lost target clears the
/// handle; the next tick re-acquires the current player, if any.
fn camera_follow(
    time: Res<Time>,
    mut target: ResMut<CameraTarget>,
    player_handle: Res<PlayerHandle>,
    positions: Query<&GlobalTransform>,
    mut damp: Local<Vec2>,
    mut camera: Single<&mut Transform, With<Camera2d>>,
) {
    if target.0.is_none() {
        target.0 = player_handle.0;
    }
    let Some(entity) = target.0 else {
        return;
    };
    let Ok(target_pos) = positions.get(entity) else {
        target.0 = None;
        return;
    };

    let current = camera.translation.truncate();
    let next = smooth_damp(
        current,
        target_pos.translation().truncate(),
        &mut damp,
        CAMERA_SMOOTH_TIME,
        time.delta_secs(),
    );
    // Z stays locked at the camera's own layer.
    camera.translation.x = next.x;
    camera.translation.y = next.y;
}

/// Publishes the camera's visible world rect for spatial queries.
fn update_camera_view(
    mut view: ResMut<CameraView>,
    camera: Single<&Transform, With<Camera2d>>,
    window: Single<&Window>,
) {
    let aspect = window.width() / window.height();
    view.center = camera.translation.truncate();
    view.half_extents = Vec2::new(VIEW_HEIGHT * aspect, VIEW_HEIGHT) / 2.0;
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<CameraTarget>().register_type::<CameraView>();

    app.init_resource::<CameraTarget>();
    app.init_resource::<CameraView>();

    app.add_systems(Startup, setup_camera);

    // Follow after movement so the frame tracks this tick's positions.
    app.add_systems(
        Update,
        (camera_follow, update_camera_view)
            .chain()
            .in_set(GameSet::Ui),
    );
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::testing::advance_and_update;
    use std::time::Duration;

    fn create_follow_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<CameraTarget>();
        app.init_resource::<PlayerHandle>();
        app.add_systems(Update, camera_follow);
        app.update();
        app
    }

    #[test]
    fn camera_moves_toward_target() {
        let mut app = create_follow_test_app();
        let camera = app
            .world_mut()
            .spawn((Camera2d, Transform::from_xyz(0.0, 0.0, 10.0)))
            .id();
        let target = app
            .world_mut()
            .spawn((
                Transform::from_xyz(10.0, 0.0, 0.0),
                GlobalTransform::from(Transform::from_xyz(10.0, 0.0, 0.0)),
            ))
            .id();
        app.world_mut().resource_mut::<CameraTarget>().0 = Some(target);

        for _ in 0..30 {
            advance_and_update(&mut app, Duration::from_millis(16));
        }

        let transform = app.world().get::<Transform>(camera).unwrap();
        assert!(
            transform.translation.x > 5.0,
            "camera should chase the target, got {}",
            transform.translation.x
        );
        // Z never drifts.
        assert!((transform.translation.z - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn lost_target_reacquires_the_player() {
        let mut app = create_follow_test_app();
        app.world_mut()
            .spawn((Camera2d, Transform::from_xyz(0.0, 0.0, 10.0)));
        let stale = app.world_mut().spawn(GlobalTransform::IDENTITY).id();
        app.world_mut().despawn(stale);
        app.world_mut().resource_mut::<CameraTarget>().0 = Some(stale);

        let player = app
            .world_mut()
            .spawn((
                Transform::from_xyz(4.0, 0.0, 0.0),
                GlobalTransform::from(Transform::from_xyz(4.0, 0.0, 0.0)),
            ))
            .id();
        app.world_mut().resource_mut::<PlayerHandle>().0 = Some(player);

        app.update(); // clears the stale handle
        app.update(); // re-acquires from the player handle

        assert_eq!(app.world().resource::<CameraTarget>().0, Some(player));
    }
}
