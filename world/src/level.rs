//! Built-in level layouts expressed as command batches.

use gridfire_core::{ActorKind, CellCoord, Command, Event, TileId, Vector2};

use crate::{apply, World};

/// Where the player spawns in the arena.
pub const ARENA_PLAYER_SPAWN: Vector2 = Vector2::new(20.2, 21.99);

fn fill(x1: i32, y1: i32, x2: i32, y2: i32, tile: Option<TileId>) -> Command {
    Command::FillTiles {
        from: CellCoord::new(x1, y1),
        to: CellCoord::new(x2, y2),
        tile,
    }
}

fn wall(x1: i32, y1: i32, x2: i32, y2: i32) -> Command {
    fill(x1, y1, x2, y2, Some(TileId::WALL))
}

fn clear(x1: i32, y1: i32, x2: i32, y2: i32) -> Command {
    fill(x1, y1, x2, y2, None)
}

fn spawn(kind: ActorKind, x: f64, y: f64) -> Command {
    Command::SpawnActor {
        kind,
        position: Vector2::new(x, y),
    }
}

/// Commands that carve the arena and populate it with enemies and the player.
///
/// The arena is a walled 20×20 courtyard holding three buildings, joined
/// through a doorway at (30, 20) to a second hall split by an inner wall.
#[must_use]
pub fn arena_commands() -> Vec<Command> {
    vec![
        // Courtyard walls.
        wall(10, 10, 30, 10),
        wall(10, 30, 30, 30),
        wall(10, 10, 10, 30),
        wall(30, 10, 30, 30),
        // Building with a door at the bottom and a pillar inside.
        wall(12, 12, 22, 12),
        wall(12, 18, 22, 18),
        wall(12, 12, 12, 18),
        wall(22, 12, 22, 18),
        clear(17, 18, 17, 18),
        wall(14, 14, 14, 14),
        // Hollow building with a door at the top.
        wall(15, 23, 28, 28),
        clear(16, 24, 27, 27),
        clear(21, 23, 21, 23),
        // Split building open at both ends.
        wall(24, 13, 28, 20),
        clear(26, 13, 26, 20),
        // Second hall.
        wall(30, 10, 50, 30),
        clear(31, 11, 49, 29),
        clear(30, 20, 30, 20),
        wall(37, 22, 47, 22),
        spawn(ActorKind::Sentry, 12.0, 28.0),
        spawn(ActorKind::Sentry, 26.8, 25.0),
        spawn(ActorKind::HeavySentry, 21.2, 13.6),
        spawn(ActorKind::HeavySentry, 47.2, 14.1),
        spawn(ActorKind::ClusterSentry, 47.0, 27.0),
        spawn(ActorKind::Stalker, 37.0, 12.0),
        Command::SpawnActor {
            kind: ActorKind::Player,
            position: ARENA_PLAYER_SPAWN,
        },
    ]
}

/// Builds the arena inside `world`, forwarding every resulting event.
pub fn build_arena(world: &mut World, out_events: &mut Vec<Event>) {
    for command in arena_commands() {
        apply(world, command, out_events);
    }
}
