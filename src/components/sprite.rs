use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// Sprite is identified by a texture key and its size in world units.
/// `offset` selects the frame from a spritesheet in pixels and is rewritten
/// by the animation system. `origin` is the pivot, in world units from the
/// sprite's bottom-left corner, placed at the entity's transform position.
#[derive(Component, Clone, Debug)]
pub struct Sprite {
    pub tex_key: String,
    pub width: f32,
    pub height: f32,
    pub offset: Vector2,
    /// Size of the source region in pixels.
    pub region: Vector2,
    pub origin: Vector2,
    pub flip_x: bool,
    pub flip_y: bool,
    /// Draw order. Higher layers are drawn later.
    pub layer: i32,
}

impl Sprite {
    /// Sprite centred on the transform, showing a `region` sized frame.
    pub fn new(tex_key: impl Into<String>, width: f32, height: f32, region: Vector2) -> Self {
        Self {
            tex_key: tex_key.into(),
            width,
            height,
            offset: Vector2::zero(),
            region,
            origin: Vector2::new(width * 0.5, height * 0.5),
            flip_x: false,
            flip_y: false,
            layer: 0,
        }
    }

    pub fn with_origin(mut self, origin: Vector2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }
}
