//! AI and navigation module
//!
//! Provides the staggered navigation grid, breadth-first path planning,
//! line-of-sight probing and the per-tick enemy behavior controller.

mod branch;
mod controller;
mod enemy;
mod grid;
mod pathfinding;
mod sight;
mod steering;

pub use branch::{Branch, select};
pub use controller::EnemyBehaviorController;
pub use enemy::{Counter, DefaultBehavior, Enemy};
pub use grid::{BLOCKED, GridError, LevelLayout, NavGrid, Tile, WALKABLE};
pub use pathfinding::{PathResult, find_path, next_step};
pub use sight::{LineOfSightProbe, MIN_STEP_DEGREES};
pub use steering::{Seek, SteeringOutput, face_toward, turn};
