#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy decision making: aiming, line of sight, firing and route following.
//!
//! Every enemy turns towards the player each tick and fires its weapon when
//! nothing solid stands between the two. Enemies that follow routes chase an
//! out-of-sight player along paths computed by the pathfinder and halt as soon
//! as the player comes into view.

use std::collections::BTreeMap;

use gridfire_core::{ActorSnapshot, ActorView, CellCoord, Command, EntityId, Event, Vector2};
use gridfire_system_pathfinding::{Pathfinder, PathfinderConfig};
use gridfire_system_raycast::find_block_between;

/// Ticks between two route computations for the same enemy.
const ROUTE_REFRESH_TICKS: u32 = 25;
/// Distance travelled per tick while following a route.
const ROUTE_SPEED: f64 = 0.1;
/// Distance at which a waypoint counts as reached.
const WAYPOINT_RADIUS: f64 = 0.1;

#[derive(Debug, Default)]
struct Route {
    /// Goal-to-start tiles, consumed from the back.
    cells: Vec<CellCoord>,
    refresh_in: u32,
}

impl Route {
    /// Next waypoint still ahead of `position`, dropping the ones already reached.
    fn next_waypoint(&mut self, position: Vector2) -> Option<Vector2> {
        while let Some(cell) = self.cells.last() {
            let waypoint = cell.center();
            if position.distance(waypoint) >= WAYPOINT_RADIUS {
                return Some(waypoint);
            }
            let _ = self.cells.pop();
        }
        None
    }
}

/// Pure system that turns actor snapshots into enemy commands.
#[derive(Debug)]
pub struct EnemyBehavior {
    pathfinder: Pathfinder,
    routes: BTreeMap<EntityId, Route>,
}

impl EnemyBehavior {
    /// Creates the system with the provided pathfinding limits.
    #[must_use]
    pub fn new(config: PathfinderConfig) -> Self {
        Self {
            pathfinder: Pathfinder::new(config),
            routes: BTreeMap::new(),
        }
    }

    /// Remaining goal-to-start route of a route-following enemy.
    #[must_use]
    pub fn planned_route(&self, actor: EntityId) -> Option<&[CellCoord]> {
        self.routes.get(&actor).map(|route| route.cells.as_slice())
    }

    /// Consumes world events and the actor view to emit enemy commands.
    ///
    /// Decisions are only made once per simulated tick, in response to a
    /// [`Event::TimeAdvanced`] event.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        actors: &ActorView,
        is_solid: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        self.routes.retain(|id, _| actors.get(*id).is_some());

        let Some(player) = actors.player() else {
            return;
        };

        for enemy in actors.iter().filter(|actor| actor.faction != player.faction) {
            out.push(Command::FaceToward {
                actor: enemy.id,
                target: player.position,
            });

            let in_sight = !find_block_between(enemy.position, player.position, &is_solid).is_hit();
            if in_sight {
                if enemy.kind.follows_routes() && enemy.momentum != Vector2::ZERO {
                    out.push(Command::SetMomentum {
                        actor: enemy.id,
                        momentum: Vector2::ZERO,
                    });
                }
                if enemy.ready_to_fire() {
                    out.push(Command::FireProjectile {
                        shooter: enemy.id,
                        direction: enemy.position.towards(player.position),
                    });
                }
            }

            if enemy.kind.follows_routes() {
                self.steer(enemy, player, in_sight, &is_solid, out);
            }
        }
    }

    fn steer<F>(
        &mut self,
        enemy: &ActorSnapshot,
        player: &ActorSnapshot,
        in_sight: bool,
        is_solid: &F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        let route = self.routes.entry(enemy.id).or_default();
        route.refresh_in = route.refresh_in.saturating_sub(1);
        if in_sight {
            return;
        }

        if route.refresh_in == 0 || route.cells.is_empty() {
            let result = self
                .pathfinder
                .find_path(enemy.position, player.position, is_solid);
            if result.found() {
                route.cells = result.into_path();
                route.refresh_in = ROUTE_REFRESH_TICKS;
            } else {
                log::debug!("{:?} found no route to the player", enemy.id);
            }
            return;
        }

        let momentum = match route.next_waypoint(enemy.position) {
            Some(waypoint) => enemy.position.towards(waypoint).normalize().scale(ROUTE_SPEED),
            None => Vector2::ZERO,
        };
        if momentum != enemy.momentum {
            out.push(Command::SetMomentum {
                actor: enemy.id,
                momentum,
            });
        }
    }
}

impl Default for EnemyBehavior {
    fn default() -> Self {
        Self::new(PathfinderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reached_waypoints_are_skipped() {
        let mut route = Route {
            cells: vec![CellCoord::new(3, 1), CellCoord::new(2, 1), CellCoord::new(1, 1)],
            refresh_in: ROUTE_REFRESH_TICKS,
        };

        let waypoint = route.next_waypoint(Vector2::new(1.55, 1.5));
        assert_eq!(waypoint, Some(Vector2::new(2.5, 1.5)));
        assert_eq!(route.cells.len(), 2);
    }

    #[test]
    fn exhausted_route_has_no_waypoint() {
        let mut route = Route {
            cells: vec![CellCoord::new(1, 1)],
            refresh_in: 1,
        };

        assert_eq!(route.next_waypoint(Vector2::new(1.5, 1.5)), None);
        assert!(route.cells.is_empty());
    }
}
