//! Per-tick enemy decision making
//!
//! Every tick the controller walks all enemies, picks a [`Branch`] for each
//! and carries it out by writing the enemy's goal, facing and velocity.
//! Movement always goes through the path planner one tile at a time, and
//! the planner is only consulted sparsely:
//!
//! - when the enemy has arrived at its previous goal
//! - when a behavior forces it (patrol waypoint switch, grid alignment)
//! - with a small random chance per tick, which unsticks enemies whose
//!   goal has gone stale
//!
//! The random source is injected so runs can be replayed exactly.

use glam::Vec2;
use hecs::Entity;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::branch::{self, Branch};
use super::enemy::{DefaultBehavior, Enemy};
use super::grid::NavGrid;
use super::pathfinding::next_step;
use super::sight::LineOfSightProbe;
use super::steering::{Seek, face_toward, turn};
use crate::config::AiConfig;
use crate::core::{AiEvent, EventQueue};
use crate::ecs::{Transform, Velocity, World};
use crate::physics::RaycastService;

/// Degrees a sentry turns (counter-clockwise) each time its cooldown expires
const SENTRY_TURN_DEGREES: f32 = 45.0;

/// One enemy's components, borrowed for the duration of its decision
struct Agent<'a> {
    entity: Entity,
    transform: &'a mut Transform,
    velocity: &'a mut Velocity,
    enemy: &'a mut Enemy,
}

/// Drives every [`Enemy`] in a [`World`]
pub struct EnemyBehaviorController<R = ChaCha8Rng> {
    grid: NavGrid,
    config: AiConfig,
    probe: LineOfSightProbe,
    rng: R,
    events: EventQueue<AiEvent>,
}

impl EnemyBehaviorController<ChaCha8Rng> {
    /// Create a controller whose random source is seeded from `config.seed`
    #[must_use]
    pub fn new(grid: NavGrid, config: AiConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(grid, config, rng)
    }
}

impl<R: Rng> EnemyBehaviorController<R> {
    /// Create a controller drawing sparse-repath decisions from `rng`
    #[must_use]
    pub fn with_rng(grid: NavGrid, config: AiConfig, rng: R) -> Self {
        let probe =
            LineOfSightProbe::new(config.sight_half_angle_degrees, config.sight_step_degrees);
        Self {
            grid,
            config,
            probe,
            rng,
            events: EventQueue::new(),
        }
    }

    /// Navigation grid enemies path over
    pub fn grid(&self) -> &NavGrid {
        &self.grid
    }

    /// Mutable grid access for terrain that changes at runtime
    pub fn grid_mut(&mut self) -> &mut NavGrid {
        &mut self.grid
    }

    /// Tuning in use
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Line-of-sight probe in use
    pub fn probe(&self) -> &LineOfSightProbe {
        &self.probe
    }

    /// Events produced by the most recent `update`
    pub fn events(&self) -> &EventQueue<AiEvent> {
        &self.events
    }

    /// Mutable event access, for draining
    pub fn events_mut(&mut self) -> &mut EventQueue<AiEvent> {
        &mut self.events
    }

    /// Run one decision tick for every enemy.
    ///
    /// Enemies reacting to a hit are skipped. Events raised during the
    /// tick become readable through [`Self::events`] once this returns.
    pub fn update(&mut self, dt: f32, world: &mut World, physics: &impl RaycastService) {
        let player = world.player_position();

        for (entity, (transform, velocity, enemy)) in
            world.query_mut::<(&mut Transform, &mut Velocity, &mut Enemy)>()
        {
            if enemy.is_reacting_to_hit() {
                continue;
            }

            let position = transform.position;
            let facing = transform.facing;
            let sight_range = enemy.sight_range;
            let mut looked = false;
            let branch = branch::select(
                enemy,
                position,
                player,
                &self.grid,
                self.config.adjacent_radius,
                || {
                    looked = true;
                    let target = player?;
                    self.probe
                        .scan(physics, position, facing, sight_range, target)
                },
            );

            let mut agent = Agent {
                entity,
                transform,
                velocity,
                enemy,
            };
            if looked {
                self.perceive(&mut agent, branch, player);
            }
            self.apply(&mut agent, branch, player, dt);
            self.record(&mut agent, branch);
        }

        self.events.swap();
    }

    /// Update sight flag and memory after a look
    fn perceive(&mut self, agent: &mut Agent<'_>, branch: Branch, player: Option<Vec2>) {
        let enemy = &mut *agent.enemy;
        match branch {
            Branch::Pursuing { sighted_at } => {
                if !enemy.player_in_sight {
                    log::debug!("{:?} spotted player at {sighted_at}", agent.entity);
                    self.events.push(AiEvent::PlayerSpotted {
                        entity: agent.entity,
                        at: sighted_at,
                    });
                }
                enemy.player_in_sight = true;
                enemy.last_seen_player = player.or(Some(sighted_at));
            }
            _ => {
                if enemy.player_in_sight {
                    log::debug!(
                        "{:?} lost sight of player, last seen {:?}",
                        agent.entity,
                        enemy.last_seen_player
                    );
                    self.events.push(AiEvent::PlayerLost {
                        entity: agent.entity,
                        last_seen: enemy.last_seen_player,
                    });
                }
                enemy.player_in_sight = false;
            }
        }
    }

    fn apply(&mut self, agent: &mut Agent<'_>, branch: Branch, player: Option<Vec2>, dt: f32) {
        match branch {
            Branch::Attacking => {
                agent.velocity.linear = Vec2::ZERO;
                if agent.enemy.tracks_during_attack {
                    if let Some(player) = player {
                        agent.transform.facing =
                            face_toward(agent.transform.position, player, agent.transform.facing);
                    }
                }
            }
            Branch::AdjacentHold => {
                agent.enemy.default_mode = false;
                agent.velocity.linear = Vec2::ZERO;
                if let Some(player) = player {
                    agent.transform.facing =
                        face_toward(agent.transform.position, player, agent.transform.facing);
                }
            }
            Branch::Pursuing { .. } | Branch::Proximity => {
                agent.enemy.default_mode = false;
                if let Some(player) = player {
                    self.drive(agent, player, false, dt);
                }
            }
            Branch::Memory { location } => {
                agent.enemy.default_mode = false;
                if self.drive(agent, location, false, dt) && self.stuck(agent, location) {
                    log::debug!("{:?} cannot reach {location}, forgetting it", agent.entity);
                    agent.enemy.last_seen_player = None;
                }
            }
            Branch::Default => {
                if !agent.enemy.default_mode {
                    agent.enemy.default_mode = true;
                    agent.enemy.aligned = false;
                    agent.enemy.last_seen_player = None;
                }
                match agent.enemy.default_behavior {
                    DefaultBehavior::None => self.hold(agent),
                    DefaultBehavior::Sentry => self.sentry(agent),
                    DefaultBehavior::Patrol => self.patrol(agent, dt),
                }
            }
        }
    }

    /// Remember the branch taken and report changes of kind
    fn record(&mut self, agent: &mut Agent<'_>, branch: Branch) {
        let previous = agent.enemy.branch;
        if previous.map(|b| b.name()) != Some(branch.name()) {
            log::debug!(
                "{:?}: {} -> {}",
                agent.entity,
                previous.map_or("none", |b| b.name()),
                branch.name()
            );
            self.events.push(AiEvent::BranchChanged {
                entity: agent.entity,
                from: previous,
                to: branch,
            });
        }
        agent.enemy.branch = Some(branch);
    }

    /// Move toward `target` one tile at a time. Returns `true` once the
    /// enemy stands on its goal.
    fn drive(&mut self, agent: &mut Agent<'_>, target: Vec2, force_repath: bool, dt: f32) -> bool {
        let position = agent.transform.position;
        let enemy = &mut *agent.enemy;
        let epsilon = self.config.arrival_epsilon;

        let (numerator, denominator) = self.config.repath_chance;
        if force_repath
            || position.distance(enemy.goal) <= epsilon
            || self.rng.gen_ratio(numerator, denominator)
        {
            enemy.goal = next_step(&self.grid, position, target);
        }

        let arrival_radius = epsilon.max(enemy.move_speed * dt);
        let steering = Seek::new(enemy.goal, enemy.move_speed, arrival_radius).calculate(position);
        if steering.arrived {
            agent.transform.position = enemy.goal;
            agent.velocity.linear = Vec2::ZERO;
            return true;
        }

        agent.velocity.linear = steering.linear;
        agent.transform.facing = steering.linear.normalize_or_zero();
        false
    }

    /// Whether the planner offers no step from the current tile toward a
    /// different `target` tile
    fn stuck(&self, agent: &Agent<'_>, target: Vec2) -> bool {
        let position = agent.transform.position;
        self.grid.world_to_tile(position) != self.grid.world_to_tile(target)
            && next_step(&self.grid, position, target) == position
    }

    /// Stand still unless knockback is still playing out
    fn hold(&mut self, agent: &mut Agent<'_>) {
        if agent.enemy.knockback.is_zero() {
            agent.velocity.linear = Vec2::ZERO;
        }
    }

    fn sentry(&mut self, agent: &mut Agent<'_>) {
        self.hold(agent);

        let enemy = &mut *agent.enemy;
        enemy.sentry.decrement(false);
        if enemy.sentry.is_zero() {
            agent.transform.facing = turn(agent.transform.facing, SENTRY_TURN_DEGREES);
            enemy.sentry.reset();
            log::debug!("{:?} turned to {}", agent.entity, agent.transform.facing);
            self.events.push(AiEvent::SentryTurned {
                entity: agent.entity,
                facing: agent.transform.facing,
            });
        }
    }

    fn patrol(&mut self, agent: &mut Agent<'_>, dt: f32) {
        if !agent.enemy.knockback.is_zero() {
            return;
        }
        if agent.enemy.route.is_empty() {
            log::warn!("{:?} patrols an empty route, holding", agent.entity);
            agent.velocity.linear = Vec2::ZERO;
            return;
        }

        if !agent.enemy.aligned {
            let position = agent.transform.position;
            if self.drive(agent, position, true, dt) {
                let enemy = &mut *agent.enemy;
                enemy.aligned = true;
                enemy.route_index = 0;
                enemy.goal = next_step(&self.grid, agent.transform.position, enemy.route[0]);
                log::debug!("{:?} aligned at {}", agent.entity, agent.transform.position);
            }
            return;
        }

        let position = agent.transform.position;
        let enemy = &mut *agent.enemy;
        let waypoint = enemy.route[enemy.route_index];
        let on_waypoint = self.grid.world_to_tile(position) == self.grid.world_to_tile(waypoint)
            && position.distance(enemy.goal) <= self.config.arrival_epsilon;

        if on_waypoint {
            log::debug!("{:?} reached waypoint {}", agent.entity, enemy.route_index);
            self.events.push(AiEvent::WaypointReached {
                entity: agent.entity,
                index: enemy.route_index,
            });
            enemy.route_index = (enemy.route_index + 1) % enemy.route.len();
        }

        let target = enemy.route[enemy.route_index];
        self.drive(agent, target, on_waypoint, dt);
    }
}
