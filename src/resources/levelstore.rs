//! Level geometry storage.
//!
//! A level file lists the static collision outlines of a map, already in
//! world units, plus the map size and the player's spawn point. The data is
//! used once, when the level entity is built, and released when that entity
//! is removed.
//!
//! ```json
//! {
//!   "width": 20.0, "height": 8.0, "spawn": [2.0, 2.0],
//!   "physics": [
//!     { "kind": "polygon", "vertices": [[0, 0], [20, 0], [20, 1], [0, 1]] },
//!     { "kind": "polyline", "vertices": [[4, 3], [7, 3]] }
//!   ]
//! }
//! ```

use std::path::Path;

use bevy_ecs::prelude::Resource;
use raylib::prelude::Vector2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::physics::Shape;

/// One static outline of the collision layer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CollisionShape {
    Polygon { vertices: Vec<[f32; 2]> },
    Polyline { vertices: Vec<[f32; 2]> },
}

fn to_points(vertices: &[[f32; 2]]) -> Vec<Vector2> {
    vertices.iter().map(|[x, y]| Vector2::new(*x, *y)).collect()
}

impl CollisionShape {
    /// Physics shape for this outline.
    ///
    /// A polyline whose last vertex repeats the first becomes a closed chain
    /// without the duplicate.
    pub fn to_shape(&self) -> Result<Shape, String> {
        match self {
            CollisionShape::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(format!("polygon with {} vertices", vertices.len()));
                }
                Ok(Shape::Polygon {
                    vertices: to_points(vertices),
                })
            }
            CollisionShape::Polyline { vertices } => {
                if vertices.len() < 2 {
                    return Err(format!("polyline with {} vertices", vertices.len()));
                }
                let mut points = to_points(vertices);
                let looped = points.len() > 2 && points.first() == points.last();
                if looped {
                    points.pop();
                }
                Ok(Shape::Chain {
                    vertices: points,
                    looped,
                })
            }
        }
    }
}

/// Collision layer and extents of one level.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LevelGeometry {
    pub width: f32,
    pub height: f32,
    pub spawn: [f32; 2],
    pub physics: Vec<CollisionShape>,
}

impl LevelGeometry {
    pub fn spawn_point(&self) -> Vector2 {
        Vector2::new(self.spawn[0], self.spawn[1])
    }

    /// Every outline converted to a physics shape.
    pub fn shapes(&self) -> Result<Vec<Shape>, String> {
        self.physics
            .iter()
            .enumerate()
            .map(|(i, s)| s.to_shape().map_err(|e| format!("physics shape {}: {}", i, e)))
            .collect()
    }

    pub fn from_json(text: &str) -> Result<Self, String> {
        let level: LevelGeometry =
            serde_json::from_str(text).map_err(|e| format!("Bad level file: {}", e))?;
        if level.width <= 0.0 || level.height <= 0.0 {
            return Err(format!(
                "level size must be positive, got {}x{}",
                level.width, level.height
            ));
        }
        if level.physics.is_empty() {
            return Err("level has no physics layer".to_string());
        }
        level.shapes()?;
        Ok(level)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read level {:?}: {}", path, e))?;
        let level = Self::from_json(&text)?;
        log::info!(
            "Loaded level {:?}: {}x{} with {} collision shapes",
            path,
            level.width,
            level.height,
            level.physics.len()
        );
        Ok(level)
    }
}

/// Registry of loaded levels by key.
#[derive(Resource, Debug, Default)]
pub struct LevelStore {
    map: FxHashMap<String, LevelGeometry>,
}

impl LevelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&LevelGeometry> {
        self.map.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, level: LevelGeometry) {
        self.map.insert(key.into(), level);
    }

    pub fn remove(&mut self, key: &str) -> Option<LevelGeometry> {
        self.map.remove(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
