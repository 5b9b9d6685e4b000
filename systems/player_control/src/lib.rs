#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translates the state of the player's controls into world commands.

use gridfire_core::{ActorView, Command, Vector2};
use serde::{Deserialize, Serialize};

/// Distance the player covers per tick along each held direction.
const PLAYER_SPEED: f64 = 0.2;

/// Controls held by the user during a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerInput {
    /// Moving towards negative rows.
    pub up: bool,
    /// Moving towards positive rows.
    pub down: bool,
    /// Moving towards negative columns.
    pub left: bool,
    /// Moving towards positive columns.
    pub right: bool,
    /// World position the player aims at.
    pub aim: Vector2,
    /// Whether the primary weapon trigger is held.
    pub fire: bool,
    /// Whether the laser trigger is held.
    pub laser: bool,
}

impl PlayerInput {
    /// Velocity produced by the held direction keys.
    ///
    /// Opposite keys cancel out and diagonals are not normalized.
    #[must_use]
    pub fn momentum(&self) -> Vector2 {
        let axis = |negative: bool, positive: bool| {
            (f64::from(u8::from(positive)) - f64::from(u8::from(negative))) * PLAYER_SPEED
        };
        Vector2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Pure system that maps player input onto the player actor.
#[derive(Debug, Default)]
pub struct PlayerControl;

impl PlayerControl {
    /// Emits the commands that apply `input` to the player, if one is alive.
    ///
    /// Triggers are only pulled while the corresponding weapon is loaded, so
    /// holding fire does not flood the world with rejected requests.
    pub fn handle(&mut self, actors: &ActorView, input: &PlayerInput, out: &mut Vec<Command>) {
        let Some(player) = actors.player() else {
            return;
        };

        let momentum = input.momentum();
        if momentum != player.momentum {
            out.push(Command::SetMomentum {
                actor: player.id,
                momentum,
            });
        }

        out.push(Command::FaceToward {
            actor: player.id,
            target: input.aim,
        });

        if input.fire && player.ready_to_fire() {
            out.push(Command::FireProjectile {
                shooter: player.id,
                direction: player.position.towards(input.aim),
            });
        }

        if input.laser && player.laser_reload_remaining == 0 {
            out.push(Command::FireLaser {
                shooter: player.id,
                toward: input.aim,
            });
        }
    }
}
