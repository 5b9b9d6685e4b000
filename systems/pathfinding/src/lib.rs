#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first grid pathfinder used to route enemies around walls.
//!
//! The search floods outwards from the start tile one ring of neighbours per
//! round, recording for every discovered tile the tile it was reached from.
//! A fixed round budget bounds the work done within a single tick, so distant
//! goals may be reported as unreachable even when a route exists.

use std::{collections::HashMap, mem};

use gridfire_core::{CellCoord, Vector2};
use serde::{Deserialize, Serialize};

/// Orthogonal neighbours first, then diagonals. The order decides ties
/// between equally short routes.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const DEFAULT_MAX_ROUNDS: u32 = 100;

/// Tunable limits applied to every search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfinderConfig {
    /// Maximum number of frontier expansions before the search gives up.
    pub max_rounds: u32,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

/// Outcome of a pathfinding query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathResult {
    path: Vec<CellCoord>,
}

impl PathResult {
    fn not_found() -> Self {
        Self { path: Vec::new() }
    }

    /// Whether a route between the start and the goal was discovered.
    #[must_use]
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Tiles of the route ordered from the goal back to the start.
    ///
    /// Consumers walk the slice in reverse to travel from start to goal.
    #[must_use]
    pub fn path(&self) -> &[CellCoord] {
        &self.path
    }

    /// Tiles of the route ordered from the start to the goal.
    pub fn traversal_order(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.path.iter().rev().copied()
    }

    /// Consumes the result, yielding the goal-to-start route.
    #[must_use]
    pub fn into_path(self) -> Vec<CellCoord> {
        self.path
    }
}

/// Breadth-first pathfinder that reuses its scratch buffers between queries.
#[derive(Debug, Default)]
pub struct Pathfinder {
    config: PathfinderConfig,
    came_from: HashMap<CellCoord, CellCoord>,
    frontier: Vec<CellCoord>,
    next_frontier: Vec<CellCoord>,
}

impl Pathfinder {
    /// Creates a pathfinder with the provided limits and empty scratch buffers.
    #[must_use]
    pub fn new(config: PathfinderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Limits applied to every search.
    #[must_use]
    pub const fn config(&self) -> PathfinderConfig {
        self.config
    }

    /// Searches for a route between the tiles containing `start` and `goal`.
    pub fn find_path<F>(&mut self, start: Vector2, goal: Vector2, is_solid: F) -> PathResult
    where
        F: Fn(CellCoord) -> bool,
    {
        self.find_cell_path(
            CellCoord::containing(start),
            CellCoord::containing(goal),
            is_solid,
        )
    }

    /// Searches for a route of empty tiles from `start` to `goal`.
    ///
    /// Diagonal steps are only taken when both tiles flanking the step are
    /// empty, so routes never squeeze between two diagonally touching walls.
    pub fn find_cell_path<F>(&mut self, start: CellCoord, goal: CellCoord, is_solid: F) -> PathResult
    where
        F: Fn(CellCoord) -> bool,
    {
        if start == goal {
            return PathResult { path: vec![start] };
        }

        self.came_from.clear();
        self.frontier.clear();
        self.next_frontier.clear();

        let _ = self.came_from.insert(start, start);
        self.frontier.push(start);

        let mut rounds = 0;
        loop {
            if rounds == self.config.max_rounds {
                log::debug!(
                    "pathfinding from {start:?} to {goal:?} exhausted its budget of {rounds} rounds"
                );
                return PathResult::not_found();
            }
            rounds += 1;

            let mut reached = false;
            for &origin in &self.frontier {
                for (columns, rows) in NEIGHBOR_OFFSETS {
                    let cell = origin.offset(columns, rows);
                    if self.came_from.contains_key(&cell) || !can_step(origin, cell, &is_solid) {
                        continue;
                    }

                    let _ = self.came_from.insert(cell, origin);
                    self.next_frontier.push(cell);
                    reached |= cell == goal;
                }
            }

            if reached {
                return PathResult {
                    path: self.backtrack(start, goal),
                };
            }

            if self.next_frontier.is_empty() {
                log::debug!("no route from {start:?} to {goal:?}");
                return PathResult::not_found();
            }

            mem::swap(&mut self.frontier, &mut self.next_frontier);
            self.next_frontier.clear();
        }
    }

    fn backtrack(&self, start: CellCoord, goal: CellCoord) -> Vec<CellCoord> {
        let mut path = vec![goal];
        let mut cursor = goal;
        while cursor != start {
            let Some(&previous) = self.came_from.get(&cursor) else {
                break;
            };
            path.push(previous);
            cursor = previous;
        }
        path
    }
}

/// Whether a single step from `origin` into the neighbouring `cell` is allowed.
fn can_step<F>(origin: CellCoord, cell: CellCoord, is_solid: &F) -> bool
where
    F: Fn(CellCoord) -> bool,
{
    if is_solid(cell) {
        return false;
    }

    let diagonal = origin.column() != cell.column() && origin.row() != cell.row();
    if !diagonal {
        return true;
    }

    !is_solid(CellCoord::new(cell.column(), origin.row()))
        && !is_solid(CellCoord::new(origin.column(), cell.row()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orthogonal_step_only_checks_destination() {
        let wall = CellCoord::new(1, 1);
        let solid = |cell: CellCoord| cell == wall;
        assert!(can_step(CellCoord::new(0, 0), CellCoord::new(1, 0), &solid));
        assert!(!can_step(CellCoord::new(1, 0), wall, &solid));
    }

    #[test]
    fn diagonal_step_requires_both_corners_open() {
        let corner = CellCoord::new(1, 0);
        let solid = |cell: CellCoord| cell == corner;
        assert!(!can_step(CellCoord::new(0, 0), CellCoord::new(1, 1), &solid));
        assert!(can_step(CellCoord::new(0, 0), CellCoord::new(-1, 1), &solid));
    }

    #[test]
    fn default_budget_is_one_hundred_rounds() {
        assert_eq!(PathfinderConfig::default().max_rounds, 100);
    }
}
