//! Breadth-first pathfinding on the staggered navigation grid
//!
//! Agents only ever ask for the next step toward a goal. Re-running the
//! search on demand keeps the agent's state tiny and lets it react to
//! terrain that changed since the last query.

use std::collections::VecDeque;

use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};

use super::grid::{NavGrid, Tile};

/// Result of a full path query
#[derive(Debug, Clone, Default)]
pub struct PathResult {
    /// Tiles from start to goal, both included
    pub tiles: Vec<Tile>,
    /// Tile centers in world coordinates
    pub waypoints: Vec<Vec2>,
}

impl PathResult {
    /// Check if path was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of moves along the path
    #[must_use]
    pub fn steps(&self) -> usize {
        self.tiles.len().saturating_sub(1)
    }
}

/// Run BFS from `start` until `goal` is dequeued. Returns the parent map
/// on success.
fn search(grid: &NavGrid, start: Tile, goal: Tile) -> Option<FxHashMap<Tile, Tile>> {
    let mut frontier = VecDeque::from([start]);
    let mut visited: FxHashSet<Tile> = FxHashSet::default();
    let mut came_from: FxHashMap<Tile, Tile> = FxHashMap::default();
    visited.insert(start);

    while let Some(current) = frontier.pop_front() {
        if current == goal {
            return Some(came_from);
        }

        for next in grid.neighbors(current) {
            if visited.insert(next) {
                came_from.insert(next, current);
                frontier.push_back(next);
            }
        }
    }

    None
}

/// World center of the first tile on a shortest path from `start` to `goal`.
///
/// Returns the goal tile's center when both points share a tile, and the
/// start tile's center when the goal cannot be reached.
#[must_use]
pub fn next_step(grid: &NavGrid, start: Vec2, goal: Vec2) -> Vec2 {
    let start_tile = grid.world_to_tile(start);
    let goal_tile = grid.world_to_tile(goal);

    if start_tile == goal_tile {
        return grid.tile_to_world(goal_tile);
    }

    let Some(came_from) = search(grid, start_tile, goal_tile) else {
        log::trace!("no path from {start_tile} to {goal_tile}, holding");
        return grid.tile_to_world(start_tile);
    };

    let mut step = goal_tile;
    while let Some(&parent) = came_from.get(&step) {
        if parent == start_tile {
            break;
        }
        step = parent;
    }

    log::trace!("repath {start_tile} -> {goal_tile}: next {step}");
    grid.tile_to_world(step)
}

/// Find the full shortest path between two world points
#[must_use]
pub fn find_path(grid: &NavGrid, start: Vec2, goal: Vec2) -> PathResult {
    let start_tile = grid.world_to_tile(start);
    let goal_tile = grid.world_to_tile(goal);

    let tiles = if start_tile == goal_tile {
        vec![start_tile]
    } else {
        let Some(came_from) = search(grid, start_tile, goal_tile) else {
            return PathResult::default();
        };

        let mut path = vec![goal_tile];
        let mut curr = goal_tile;
        while let Some(&prev) = came_from.get(&curr) {
            path.push(prev);
            curr = prev;
        }
        path.reverse();
        path
    };

    let waypoints = tiles.iter().map(|&t| grid.tile_to_world(t)).collect();
    PathResult { tiles, waypoints }
}
