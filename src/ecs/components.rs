//! Common ECS components

use glam::Vec2;

/// Position and facing on the flat play field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec2,
    /// Unit direction the entity looks in, `NEG_Y` by default. A zero
    /// facing means the entity has no direction yet.
    pub facing: Vec2,
}

impl Transform {
    /// Create a transform at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and facing
    pub fn from_position_facing(position: Vec2, facing: Vec2) -> Self {
        Self {
            position,
            facing: facing.normalize_or_zero(),
        }
    }

    /// Translate by a delta
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            facing: Vec2::NEG_Y,
        }
    }
}

/// Velocity component
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub linear: Vec2,
}

impl Velocity {
    /// Advance `transform` by this velocity over `dt` seconds
    pub fn integrate(&self, transform: &mut Transform, dt: f32) {
        transform.translate(self.linear * dt);
    }
}

/// Name component for debugging
#[derive(Debug, Clone)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Marks the entity enemies hunt
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;
