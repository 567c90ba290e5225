//! Behavior branch selection
//!
//! Each tick an enemy takes exactly one branch. Selection is a pure
//! function of the enemy's state and what it can perceive, checked in
//! priority order; the controller then carries the chosen branch out.

use glam::Vec2;

use super::enemy::Enemy;
use super::grid::NavGrid;

/// What an enemy does this tick, highest priority first
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Branch {
    /// Mid-attack: stand still, maybe track the player
    Attacking,
    /// Right next to the player: hold position
    AdjacentHold,
    /// Chase the player, who is in sight
    Pursuing {
        /// Where the sight ray hit the player
        sighted_at: Vec2,
    },
    /// Chase the player, who is close but unseen
    Proximity,
    /// Walk to where the player was last seen
    Memory {
        /// Remembered player location
        location: Vec2,
    },
    /// Idle behavior: stand, guard or patrol
    Default,
}

impl Branch {
    /// Short name for logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Attacking => "attacking",
            Self::AdjacentHold => "adjacent-hold",
            Self::Pursuing { .. } => "pursuing",
            Self::Proximity => "proximity",
            Self::Memory { .. } => "memory",
            Self::Default => "default",
        }
    }

    /// Whether the branch counts as engaging rather than idling
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        !matches!(self, Self::Default)
    }
}

/// Pick the branch for one enemy.
///
/// `player` is the player's position if there is one. `look` runs the
/// line-of-sight probe and is only called when neither attacking nor the
/// adjacent hold applies.
pub fn select(
    enemy: &Enemy,
    position: Vec2,
    player: Option<Vec2>,
    grid: &NavGrid,
    adjacent_radius: f32,
    look: impl FnOnce() -> Option<Vec2>,
) -> Branch {
    if enemy.attacking {
        return Branch::Attacking;
    }

    let Some(player) = player else {
        return remembered(enemy, position, grid);
    };

    let distance = position.distance(player);
    if distance <= adjacent_radius {
        return Branch::AdjacentHold;
    }

    if let Some(sighted_at) = look() {
        return Branch::Pursuing { sighted_at };
    }

    if distance <= enemy.proximity_range {
        return Branch::Proximity;
    }

    remembered(enemy, position, grid)
}

/// Memory pursuit while the remembered tile is not yet reached
fn remembered(enemy: &Enemy, position: Vec2, grid: &NavGrid) -> Branch {
    match enemy.last_seen_player {
        Some(location) if grid.world_to_tile(location) != grid.world_to_tile(position) => {
            Branch::Memory { location }
        }
        _ => Branch::Default,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::ai::grid::WALKABLE;
    use crate::config::AiConfig;

    fn setup() -> (Enemy, NavGrid) {
        let config = AiConfig::default();
        let enemy = Enemy::sentry(&config, Vec2::ZERO);
        let grid = NavGrid::filled(10, 20, Vec2::ZERO, WALKABLE);
        (enemy, grid)
    }

    #[test]
    fn test_attacking_wins() {
        let (mut enemy, grid) = setup();
        enemy.attacking = true;
        let looked = Cell::new(false);

        let branch = select(&enemy, Vec2::ZERO, Some(Vec2::new(0.5, 0.0)), &grid, 1.0, || {
            looked.set(true);
            Some(Vec2::ONE)
        });

        assert_eq!(branch, Branch::Attacking);
        assert!(!looked.get());
    }

    #[test]
    fn test_adjacent_does_not_look() {
        let (enemy, grid) = setup();
        let looked = Cell::new(false);

        let branch = select(&enemy, Vec2::ZERO, Some(Vec2::new(1.0, 0.0)), &grid, 1.0, || {
            looked.set(true);
            None
        });

        assert_eq!(branch, Branch::AdjacentHold);
        assert!(!looked.get());
    }

    #[test]
    fn test_sight_before_proximity() {
        let (enemy, grid) = setup();
        let player = Vec2::new(2.0, 0.0);

        let seen = select(&enemy, Vec2::ZERO, Some(player), &grid, 1.0, || Some(player));
        let unseen = select(&enemy, Vec2::ZERO, Some(player), &grid, 1.0, || None);

        assert_eq!(seen, Branch::Pursuing { sighted_at: player });
        assert_eq!(unseen, Branch::Proximity);
    }

    #[test]
    fn test_memory_until_tile_reached() {
        let (mut enemy, grid) = setup();
        let far_player = Some(Vec2::new(15.0, 9.0));
        let location = grid.tile_to_world(glam::IVec2::new(4, 4));
        enemy.last_seen_player = Some(location);

        let away = select(&enemy, Vec2::new(0.0, 0.5), far_player, &grid, 1.0, || None);
        assert_eq!(away, Branch::Memory { location });

        // Off-center but inside the remembered tile counts as reached
        let there = select(
            &enemy,
            location + Vec2::new(0.1, 0.05),
            far_player,
            &grid,
            1.0,
            || None,
        );
        assert_eq!(there, Branch::Default);
    }

    #[test]
    fn test_no_player() {
        let (mut enemy, grid) = setup();
        let looked = Cell::new(false);
        let look = || {
            looked.set(true);
            None
        };

        assert_eq!(select(&enemy, Vec2::ZERO, None, &grid, 1.0, look), Branch::Default);
        assert!(!looked.get());

        let location = Vec2::new(6.0, 3.5);
        enemy.last_seen_player = Some(location);
        assert_eq!(
            select(&enemy, Vec2::ZERO, None, &grid, 1.0, || None),
            Branch::Memory { location }
        );

        enemy.attacking = true;
        assert_eq!(
            select(&enemy, Vec2::ZERO, None, &grid, 1.0, || None),
            Branch::Attacking
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(Branch::AdjacentHold.name(), "adjacent-hold");
        assert_eq!(
            Branch::Memory {
                location: Vec2::ZERO
            }
            .name(),
            "memory"
        );
        assert!(!Branch::Default.is_engaged());
        assert!(Branch::Proximity.is_engaged());
    }
}
