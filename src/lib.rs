//! Enemy navigation and tactical decisions for a top-down action game
//!
//! This crate provides:
//! - A staggered isometric navigation grid with world/tile conversion
//! - Breadth-first path planning that hands out one step at a time
//! - Multi-ray line-of-sight probing against a rapier3d world
//! - A per-tick enemy behavior controller over a hecs world

pub mod ai;
pub mod config;
pub mod core;
pub mod ecs;
pub mod physics;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use rapier3d;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{
        Branch, DefaultBehavior, Enemy, EnemyBehaviorController, LevelLayout, LineOfSightProbe,
        NavGrid, Tile,
    };
    pub use crate::config::{AiConfig, ConfigError};
    pub use crate::core::{AiEvent, EventQueue};
    pub use crate::ecs::{Name, Player, Transform, Velocity, World};
    pub use crate::physics::{PhysicsWorld, RaycastService, RigidBodyHandle, category};
    pub use glam::{IVec2, Vec2};
}
