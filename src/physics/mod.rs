//! Physics module
//!
//! Built on top of rapier3d. Perception only needs raycasts, which are
//! exposed through the [`RaycastService`] trait.

mod raycast;
mod world;

pub use raycast::{HitCategory, RayHit, RaycastService, category};
pub use world::{ColliderHandle, PhysicsWorld, RigidBodyHandle};
