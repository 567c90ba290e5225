//! Sensing world built on rapier3d
//!
//! The play field is flat, so everything lives in the XY plane at `z = 0`.
//! Walls are extruded along Z; actors are balls whose slice through the
//! plane is their footprint.

use glam::Vec2;
use rapier3d::prelude::*;

use super::raycast::{HitCategory, RayHit, RaycastService, category};

/// Half-depth of wall boxes along Z
const SLAB_HALF_DEPTH: f32 = 1.0;

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub rapier3d::dynamics::RigidBodyHandle);

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub rapier3d::geometry::ColliderHandle);

/// Physics world manager
pub struct PhysicsWorld {
    /// Physics pipeline
    pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase
    broad_phase: DefaultBroadPhase,
    /// Narrow phase
    narrow_phase: NarrowPhase,
    /// Rigid body set
    rigid_body_set: RigidBodySet,
    /// Collider set
    collider_set: ColliderSet,
    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,
    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,
    /// CCD solver
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasting
    query_pipeline: QueryPipeline,
    /// Integration parameters
    integration_parameters: IntegrationParameters,
}

impl PhysicsWorld {
    /// Create an empty world without gravity
    pub fn new() -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
        }
    }

    /// Step the simulation and refresh the query pipeline
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &vector![0.0, 0.0, 0.0],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Add a static wall box
    pub fn add_wall(&mut self, center: Vec2, half_extents: Vec2) -> ColliderHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y, 0.0])
            .build();
        let body = self.rigid_body_set.insert(body);

        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, SLAB_HALF_DEPTH)
            .user_data(u128::from(category::TALL_WALL))
            .build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body,
            &mut self.rigid_body_set,
        ))
    }

    /// Add a kinematic round actor tagged with collision `category` bits
    pub fn add_actor(&mut self, position: Vec2, radius: f32, category: u32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(vector![position.x, position.y, 0.0])
            .build();
        let body = self.rigid_body_set.insert(body);

        let collider = ColliderBuilder::ball(radius)
            .user_data(u128::from(category))
            .build();
        self.collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set);

        RigidBodyHandle(body)
    }

    /// Move an actor; takes effect on the next `step`
    pub fn set_actor_position(&mut self, body: RigidBodyHandle, position: Vec2) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.set_next_kinematic_translation(vector![position.x, position.y, 0.0]);
        }
    }

    /// Get the position of a rigid body
    pub fn position(&self, body: RigidBodyHandle) -> Option<Vec2> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let pos = rb.translation();
            Vec2::new(pos.x, pos.y)
        })
    }

    /// Remove a rigid body and its colliders
    pub fn remove_body(&mut self, body: RigidBodyHandle) {
        self.rigid_body_set.remove(
            body.0,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl RaycastService for PhysicsWorld {
    fn raycast(&self, start: Vec2, end: Vec2, callback: &mut dyn FnMut(RayHit) -> bool) {
        let delta = end - start;
        // Unnormalized direction: time of impact is the fraction along the segment
        let ray = Ray::new(point![start.x, start.y, 0.0], vector![delta.x, delta.y, 0.0]);

        self.query_pipeline.intersections_with_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            1.0,
            true,
            QueryFilter::default(),
            |handle, intersection| {
                let bits = self
                    .collider_set
                    .get(handle)
                    .map_or(0, |collider| collider.user_data as u32);
                let point = ray.point_at(intersection.time_of_impact);

                callback(RayHit {
                    category: HitCategory::from_bits(bits),
                    point: Vec2::new(point.x, point.y),
                    normal: Vec2::new(intersection.normal.x, intersection.normal.y),
                    fraction: intersection.time_of_impact,
                })
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_hits(world: &PhysicsWorld, start: Vec2, end: Vec2) -> Vec<RayHit> {
        let mut hits = Vec::new();
        world.raycast(start, end, &mut |hit| {
            hits.push(hit);
            true
        });
        hits.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));
        hits
    }

    #[test]
    fn test_raycast_reports_categories_and_fractions() {
        let mut world = PhysicsWorld::new();
        world.add_wall(Vec2::new(4.0, 0.0), Vec2::new(0.5, 2.0));
        world.add_actor(Vec2::new(8.0, 0.0), 0.5, category::PLAYER);
        world.step(1.0 / 60.0);

        let hits = collect_hits(&world, Vec2::ZERO, Vec2::new(10.0, 0.0));

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].category, HitCategory::Wall);
        assert!((hits[0].fraction - 0.35).abs() < 1e-3);
        assert!((hits[0].point - Vec2::new(3.5, 0.0)).length() < 1e-3);
        assert_eq!(hits[1].category, HitCategory::Player);
        assert!((hits[1].fraction - 0.75).abs() < 1e-3);
    }

    #[test]
    fn test_raycast_misses_outside_segment() {
        let mut world = PhysicsWorld::new();
        world.add_actor(Vec2::new(8.0, 0.0), 0.5, category::PLAYER);
        world.step(1.0 / 60.0);

        assert!(collect_hits(&world, Vec2::ZERO, Vec2::new(5.0, 0.0)).is_empty());
    }

    #[test]
    fn test_actor_moves_after_step() {
        let mut world = PhysicsWorld::new();
        let body = world.add_actor(Vec2::ZERO, 0.5, category::ENEMY);

        world.set_actor_position(body, Vec2::new(2.0, 3.0));
        world.step(1.0 / 60.0);

        let pos = world.position(body).unwrap();
        assert!((pos - Vec2::new(2.0, 3.0)).length() < 1e-4);

        world.remove_body(body);
        assert!(world.position(body).is_none());
    }
}
