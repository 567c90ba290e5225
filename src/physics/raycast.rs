//! Raycast service consumed by perception

use glam::Vec2;

/// Collision category bits stored in collider user data
pub mod category {
    pub const PLAYER: u32 = 0x0001;
    pub const PLAYER_SHADOW: u32 = 0x0002;
    pub const ENEMY: u32 = 0x0004;
    pub const ENEMY_SHADOW: u32 = 0x0008;
    pub const SHORT_WALL: u32 = 0x0010;
    pub const TALL_WALL: u32 = 0x0020;
    pub const ATTACK: u32 = 0x0040;
    pub const PLAYER_HITBOX: u32 = 0x0080;
    pub const ENEMY_HITBOX: u32 = 0x0100;
    pub const PROJECTILE: u32 = 0x0200;
}

/// What a ray ran into, as far as sight is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitCategory {
    Player,
    Wall,
    Other,
}

impl HitCategory {
    /// Classify raw collision category bits
    #[must_use]
    pub fn from_bits(bits: u32) -> Self {
        if bits & category::PLAYER != 0 {
            Self::Player
        } else if bits & (category::SHORT_WALL | category::TALL_WALL) != 0 {
            Self::Wall
        } else {
            Self::Other
        }
    }
}

/// One collider intersected by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Category of the collider
    pub category: HitCategory,
    /// World-space intersection point
    pub point: Vec2,
    /// Surface normal at the intersection
    pub normal: Vec2,
    /// Position along the ray, `0.0` at the start and `1.0` at the end
    pub fraction: f32,
}

/// A world that can be probed with rays.
///
/// `raycast` invokes `callback` once per collider crossed by the segment
/// `start..end`, in no particular order. Returning `false` from the
/// callback stops the query early.
pub trait RaycastService {
    fn raycast(&self, start: Vec2, end: Vec2, callback: &mut dyn FnMut(RayHit) -> bool);
}

impl<T: RaycastService + ?Sized> RaycastService for &T {
    fn raycast(&self, start: Vec2, end: Vec2, callback: &mut dyn FnMut(RayHit) -> bool) {
        (**self).raycast(start, end, callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_classification() {
        assert_eq!(HitCategory::from_bits(category::PLAYER), HitCategory::Player);
        assert_eq!(HitCategory::from_bits(category::TALL_WALL), HitCategory::Wall);
        assert_eq!(HitCategory::from_bits(category::SHORT_WALL), HitCategory::Wall);
        assert_eq!(HitCategory::from_bits(category::ENEMY), HitCategory::Other);
        assert_eq!(HitCategory::from_bits(category::PROJECTILE), HitCategory::Other);
        assert_eq!(HitCategory::from_bits(0), HitCategory::Other);
    }
}
