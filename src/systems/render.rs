//! Rendering.
//!
//! [`render_queue_system`] turns every sprite into a [`DrawCall`] in world
//! units and sorts the queue by layer (stable, so equal layers keep query
//! order). [`render_system`] is the only code that talks to the GPU: it draws
//! the queue through the [`Camera2DRes`] and, in debug mode, the physics
//! outlines and a text overlay.
//!
//! World space is Y-up in units; the screen is Y-down in pixels. Every world
//! coordinate goes through [`to_pixels`] before it reaches raylib.

use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::components::sprite::Sprite;
use crate::components::transform::Transform;
use crate::physics::DebugOutline;
use crate::resources::camera2d::Camera2DRes;
use crate::resources::debugmode::DebugMode;
use crate::resources::gameconfig::GameConfig;
use crate::resources::physicsworld::PhysicsWorld;
use crate::resources::renderqueue::{DrawCall, RenderQueue};
use crate::resources::screensize::ScreenSize;
use crate::resources::texturestore::TextureStore;
use crate::systems::physics::FixedStepper;

/// World point to camera-space pixels.
pub fn to_pixels(v: Vector2, pixels_per_unit: f32) -> Vector2 {
    Vector2::new(v.x * pixels_per_unit, -v.y * pixels_per_unit)
}

pub fn render_queue_system(
    sprites: Query<(Entity, &Sprite, &Transform)>,
    mut queue: ResMut<RenderQueue>,
) {
    queue.calls.clear();
    for (entity, sprite, transform) in sprites.iter() {
        let scale = transform.scale;
        queue.calls.push(DrawCall {
            entity,
            tex_key: sprite.tex_key.clone(),
            region_offset: sprite.offset,
            region_size: sprite.region,
            position: transform.position,
            size: Vector2::new(sprite.width * scale.x, sprite.height * scale.y),
            origin: Vector2::new(sprite.origin.x * scale.x, sprite.origin.y * scale.y),
            rotation: transform.angle,
            flip_x: sprite.flip_x,
            flip_y: sprite.flip_y,
            layer: sprite.layer,
        });
    }
    queue.calls.sort_by_key(|call| call.layer);
}

fn draw_call<D: RaylibDraw>(d: &mut D, texture: &Texture2D, call: &DrawCall, ppu: f32) {
    let mut source = Rectangle::new(
        call.region_offset.x,
        call.region_offset.y,
        call.region_size.x,
        call.region_size.y,
    );
    // negative source size mirrors the frame
    if call.flip_x {
        source.width = -source.width;
    }
    if call.flip_y {
        source.height = -source.height;
    }
    let at = to_pixels(call.position, ppu);
    let dest = Rectangle::new(at.x, at.y, call.size.x * ppu, call.size.y * ppu);
    let origin = Vector2::new(call.origin.x * ppu, (call.size.y - call.origin.y) * ppu);
    d.draw_texture_pro(texture, source, dest, origin, -call.rotation, Color::WHITE);
}

fn draw_outline<D: RaylibDraw>(d: &mut D, outline: &DebugOutline, ppu: f32) {
    let color = if outline.is_sensor {
        Color::YELLOW
    } else if outline.awake {
        Color::RED
    } else {
        Color::GRAY
    };
    let points: Vec<Vector2> = outline.points.iter().map(|p| to_pixels(*p, ppu)).collect();
    for pair in points.windows(2) {
        d.draw_line_v(pair[0], pair[1], color);
    }
    if outline.closed && points.len() > 2 {
        d.draw_line_v(points[points.len() - 1], points[0], color);
    }
}

/// Draw the frame. Registered by the binary, which owns the window.
#[allow(clippy::too_many_arguments)]
pub fn render_system(
    mut rl: NonSendMut<RaylibHandle>,
    thread: NonSend<RaylibThread>,
    camera: Res<Camera2DRes>,
    queue: Res<RenderQueue>,
    textures: Res<TextureStore>,
    physics: Res<PhysicsWorld>,
    config: Res<GameConfig>,
    screen: Res<ScreenSize>,
    stepper: Res<FixedStepper>,
    debug: Option<Res<DebugMode>>,
    entities: Query<Entity>,
) {
    let ppu = config.pixels_per_unit;
    let mut d = rl.begin_drawing(&thread);
    d.clear_background(Color::SKYBLUE);
    {
        let mut d2 = d.begin_mode2D(camera.0);
        for call in queue.calls.iter() {
            match textures.get(&call.tex_key) {
                Some(texture) => draw_call(&mut d2, texture, call, ppu),
                None => log::trace!("no texture '{}'", call.tex_key),
            }
        }
        if debug.is_some() {
            for outline in physics.debug_outlines().iter() {
                draw_outline(&mut d2, outline, ppu);
            }
        }
    }

    if debug.is_some() {
        d.draw_fps(10, 10);
        let cam = camera.0;
        let text = format!(
            "Entities: {} | Camera ({:.1}, {:.1}) zoom {:.2}",
            entities.iter().count(),
            cam.target.x,
            cam.target.y,
            cam.zoom
        );
        d.draw_text(&text, 10, 34, 10, Color::BLACK);
        let text = format!(
            "Physics steps this frame: {} | accumulator {:.4}",
            stepper.frame_steps(),
            stepper.accumulator()
        );
        d.draw_text(&text, 10, screen.h - 20, 10, Color::BLACK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixels_flips_y() {
        assert_eq!(
            to_pixels(Vector2::new(1.5, 2.0), 100.0),
            Vector2::new(150.0, -200.0)
        );
    }

    #[test]
    fn test_queue_is_stable_sorted_by_layer() {
        let mut world = World::new();
        world.init_resource::<RenderQueue>();
        let region = Vector2::new(64.0, 64.0);
        let front = world
            .spawn((
                Sprite::new("a", 1.0, 1.0, region).with_layer(2),
                Transform::new(0.0, 0.0),
            ))
            .id();
        let back_1 = world
            .spawn((
                Sprite::new("b", 1.0, 1.0, region).with_layer(0),
                Transform::new(1.0, 0.0),
            ))
            .id();
        let back_2 = world
            .spawn((
                Sprite::new("c", 1.0, 1.0, region).with_layer(0),
                Transform::new(2.0, 0.0).with_scale(0.5, 2.0),
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(render_queue_system);
        schedule.run(&mut world);

        let queue = world.resource::<RenderQueue>();
        assert_eq!(queue.calls.len(), 3);
        assert_eq!(queue.calls[2].entity, front);
        let backs: Vec<Entity> = queue.calls[..2].iter().map(|c| c.entity).collect();
        assert!(backs.contains(&back_1) && backs.contains(&back_2));
        let scaled = queue.calls.iter().find(|c| c.entity == back_2).unwrap();
        assert_eq!(scaled.size, Vector2::new(0.5, 2.0));
        assert_eq!(scaled.origin, Vector2::new(0.25, 1.0));
    }
}
