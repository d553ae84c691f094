//! Camera rig controller.
//!
//! Per frame and per rig:
//! 1. the zoom keys grow or shrink `zoom` by the frame delta
//! 2. `speed` is clamped to the configured range
//! 3. if the target still exists, the rig moves `speed` of the way toward it
//!    (a vanished target is cleared)
//! 4. `zoom` is clamped so the view never outgrows the world bounds
//! 5. the position is clamped so the view stays inside the bounds
//! 6. the result is pushed into [`Camera2DRes`]
//!
//! World space has Y up and is measured in units; the render camera works in
//! pixels with Y down, hence the flip and the pixels-per-unit scale in
//! [`apply_to_camera`].

use bevy_ecs::prelude::*;
use raylib::prelude::{Camera2D, Vector2};

use crate::components::camerarig::CameraRig;
use crate::components::transform::Transform;
use crate::resources::camera2d::Camera2DRes;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::screensize::ScreenSize;
use crate::resources::worldtime::WorldTime;

/// Move `position` the fraction `speed` of the way to `target`.
pub fn follow(position: Vector2, target: Vector2, speed: f32) -> Vector2 {
    position + (target - position).scale_by(speed)
}

/// Clamp the rig's zoom to `[min_zoom, max_zoom]` and `position` to the
/// bounds shrunk by half the zoomed view.
pub fn clamp_to_bounds(rig: &mut CameraRig, position: Vector2, min_zoom: f32) -> Vector2 {
    rig.zoom = rig.zoom.max(min_zoom).min(rig.max_zoom());
    let half = rig.half_extents();
    let b = rig.bounds;
    Vector2::new(
        position.x.max(b.left + half.x).min(b.right - half.x),
        position.y.max(b.bottom + half.y).min(b.top - half.y),
    )
}

/// Point the render camera at `position` with the rig's zoom.
pub fn apply_to_camera(
    camera: &mut Camera2D,
    rig: &CameraRig,
    position: Vector2,
    screen: ScreenSize,
    pixels_per_unit: f32,
) {
    camera.target = Vector2::new(position.x * pixels_per_unit, -position.y * pixels_per_unit);
    camera.offset = Vector2::new(screen.w as f32 * 0.5, screen.h as f32 * 0.5);
    camera.zoom = screen.h as f32 / (rig.viewport.y * pixels_per_unit * rig.zoom);
}

pub fn camera_rig_system(
    mut rigs: Query<(&mut CameraRig, &mut Transform)>,
    targets: Query<&Transform, Without<CameraRig>>,
    input: Res<InputState>,
    time: Res<WorldTime>,
    mut camera: ResMut<Camera2DRes>,
    screen: Res<ScreenSize>,
    config: Res<GameConfig>,
) {
    let tuning = &config.camera;
    for (mut rig, mut transform) in rigs.iter_mut() {
        if input.zoom_out.active {
            rig.zoom += time.delta;
        }
        if input.zoom_in.active {
            rig.zoom -= time.delta;
        }
        rig.speed = rig.speed.clamp(tuning.min_speed, tuning.max_speed);

        let mut position = transform.position;
        if let Some(target) = rig.target {
            match targets.get(target) {
                Ok(target_transform) => {
                    position = follow(position, target_transform.position, rig.speed);
                }
                Err(_) => {
                    log::debug!("camera target {} is gone", target);
                    rig.target = None;
                }
            }
        }

        position = clamp_to_bounds(&mut rig, position, tuning.min_zoom);
        transform.position = position;
        apply_to_camera(
            &mut camera.0,
            &rig,
            position,
            *screen,
            config.pixels_per_unit,
        );
    }
}
