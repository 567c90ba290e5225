//! Enemy AI state
//!
//! The [`Enemy`] component holds everything the behavior controller reads
//! and writes for one non-player combatant, apart from its transform and
//! velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::branch::Branch;
use crate::config::AiConfig;

// ============================================================================
// Counter
// ============================================================================

/// A frame counter that counts down to zero.
///
/// `reset()` arms the counter at its maximum, `decrement()` ticks it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    count: u32,
    max: u32,
}

impl Counter {
    /// Create a counter at 0 with the given maximum
    #[must_use]
    pub fn new(max: u32) -> Self {
        assert!(max > 0, "counter maximum must be positive");
        Self { count: 0, max }
    }

    /// Current remaining count
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Counter length
    #[must_use]
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Whether the counter has run out
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.count == 0
    }

    /// Whether the counter is fully armed
    #[must_use]
    pub fn is_maximum(&self) -> bool {
        self.count == self.max
    }

    /// Set the remaining count
    pub fn set_count(&mut self, count: u32) {
        assert!(count <= self.max, "count {count} exceeds maximum {}", self.max);
        self.count = count;
    }

    /// Change the counter length. The remaining count is either cleared or
    /// clamped to the new maximum.
    pub fn set_max(&mut self, max: u32, reset: bool) {
        assert!(max > 0, "counter maximum must be positive");
        self.max = max;
        self.count = if reset { 0 } else { self.count.min(max) };
    }

    /// Arm the counter at its maximum
    pub fn reset(&mut self) {
        self.count = self.max;
    }

    /// Tick down, stopping at 0. With `cycle`, a counter already at 0
    /// re-arms instead.
    pub fn decrement(&mut self, cycle: bool) {
        if cycle && self.count == 0 {
            self.count = self.max;
            return;
        }
        self.count = self.count.saturating_sub(1);
    }

    /// Tick up, stopping at the maximum
    pub fn increment(&mut self) {
        self.count = (self.count + 1).min(self.max);
    }
}

// ============================================================================
// Enemy
// ============================================================================

/// Idle behavior when nothing has the enemy's attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DefaultBehavior {
    /// Stand still
    #[default]
    None,
    /// Stand guard and periodically turn
    Sentry,
    /// Walk a route of waypoints
    Patrol,
}

/// AI state of one enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    /// Where the enemy is currently heading (a tile center)
    pub goal: Vec2,
    /// Patrol waypoints
    pub route: Vec<Vec2>,
    /// Index of the waypoint being walked to
    pub route_index: usize,
    /// Whether the enemy has snapped onto a tile center since going idle
    pub aligned: bool,
    /// Idle behavior
    pub default_behavior: DefaultBehavior,
    /// Length of sight rays
    pub sight_range: f32,
    /// Radius in which the player is sensed without sight
    pub proximity_range: f32,
    /// Reach of the enemy's attack
    pub attack_range: f32,
    /// Travel speed in world units per second
    pub move_speed: f32,
    /// Where the player was last seen
    pub last_seen_player: Option<Vec2>,
    /// Whether the player was visible on the last look
    pub player_in_sight: bool,
    /// Whether the enemy is idling rather than engaging
    pub default_mode: bool,
    /// Set by the combat system while an attack plays out
    pub attacking: bool,
    /// Whether the enemy keeps turning toward the player mid-attack
    pub tracks_during_attack: bool,
    /// Hit reaction; the controller leaves the enemy alone while armed
    pub hit: Counter,
    /// Knockback grace window; idle behaviors keep their hands off the
    /// velocity while armed
    pub knockback: Counter,
    /// Ticks until a sentry turns
    pub sentry: Counter,
    /// Branch taken on the most recent tick
    pub branch: Option<Branch>,
}

impl Enemy {
    /// Create an enemy standing at `position` with ranges and timings
    /// taken from `config`
    #[must_use]
    pub fn new(config: &AiConfig, position: Vec2, default_behavior: DefaultBehavior) -> Self {
        let mut sentry = Counter::new(config.sentry_cooldown);
        sentry.reset();

        Self {
            goal: position,
            route: Vec::new(),
            route_index: 0,
            aligned: false,
            default_behavior,
            sight_range: config.sight_range,
            proximity_range: config.proximity_range,
            attack_range: config.attack_range,
            move_speed: config.move_speed,
            last_seen_player: None,
            player_in_sight: false,
            default_mode: true,
            attacking: false,
            tracks_during_attack: false,
            hit: Counter::new(config.hit_frames),
            knockback: Counter::new(config.knockback_frames),
            sentry,
            branch: None,
        }
    }

    /// A sentry guarding `position`
    #[must_use]
    pub fn sentry(config: &AiConfig, position: Vec2) -> Self {
        Self::new(config, position, DefaultBehavior::Sentry)
    }

    /// A patroller walking `route`, starting at `position`
    ///
    /// # Panics
    ///
    /// Panics if `route` is empty.
    #[must_use]
    pub fn patrol(config: &AiConfig, position: Vec2, route: Vec<Vec2>) -> Self {
        assert!(!route.is_empty(), "patrol route must have at least one waypoint");
        Self {
            route,
            ..Self::new(config, position, DefaultBehavior::Patrol)
        }
    }

    /// Builder-style toggle for turning toward the player mid-attack
    #[must_use]
    pub fn with_attack_tracking(mut self, tracks: bool) -> Self {
        self.tracks_during_attack = tracks;
        self
    }

    /// Whether a target at `distance` is within attack reach
    #[must_use]
    pub fn within_attack_range(&self, distance: f32) -> bool {
        distance <= self.attack_range
    }

    /// Whether the enemy is reeling from a hit
    #[must_use]
    pub fn is_reacting_to_hit(&self) -> bool {
        !self.hit.is_zero()
    }

    /// Register a hit: start the hit reaction and the knockback grace
    /// window, unless already reacting
    pub fn on_hit(&mut self) {
        if self.hit.is_zero() {
            self.hit.reset();
            self.knockback.reset();
        }
    }

    /// Tick the hit and knockback counters; call once per simulation tick
    pub fn update_counters(&mut self) {
        self.hit.decrement(false);
        self.knockback.decrement(false);
    }
}
