#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Gridfire.
//!
//! The world owns the tile grid together with every actor, projectile, beam
//! and marker. It is mutated exclusively through [`apply`], which executes a
//! single [`Command`] and reports what happened as [`Event`] values. Read-only
//! access goes through the [`query`] module.

mod actor;
mod grid;
pub mod level;
mod projectile;

pub use grid::Grid;

use gridfire_core::{
    Command, Damageable, EntityId, Event, FireError, Movable, Positioned, ProjectileKind, Vector2,
};
use gridfire_system_collision::advance;
use gridfire_system_raycast::{find_block_from_ray, find_entity_from_ray};

use actor::{Actor, LASER_RELOAD_TICKS};
use projectile::{Beam, Projectile, SHARD_SPEED};

const LASER_RANGE: f64 = 100.0;
const LASER_DAMAGE: i32 = 3;

/// Passive point used to visualise pathfinding queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    id: EntityId,
    position: Vector2,
}

impl Marker {
    /// Identifier assigned to the marker.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Centre of the marker.
    #[must_use]
    pub const fn position(&self) -> Vector2 {
        self.position
    }
}

/// Represents the authoritative Gridfire world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    actors: Vec<Actor>,
    projectiles: Vec<Projectile>,
    beams: Vec<Beam>,
    markers: Vec<Marker>,
    paused: bool,
    tick_index: u64,
    next_entity_id: u32,
}

impl World {
    /// Creates an empty, running world with no tiles and no entities.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: Grid::new(),
            actors: Vec::new(),
            projectiles: Vec::new(),
            beams: Vec::new(),
            markers: Vec::new(),
            paused: false,
            tick_index: 0,
            next_entity_id: 0,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.wrapping_add(1);
        id
    }

    fn actor_index(&self, id: EntityId) -> Option<usize> {
        self.actors.iter().position(|actor| actor.id() == id)
    }

    fn actor_mut(&mut self, id: EntityId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|actor| actor.id() == id)
    }

    fn ready_shooter(
        &self,
        shooter: EntityId,
        reload: impl Fn(&Actor) -> u32,
        out_events: &mut Vec<Event>,
    ) -> Option<usize> {
        let rejection = match self.actor_index(shooter) {
            Some(index) if reload(&self.actors[index]) == 0 => return Some(index),
            Some(_) => FireError::Reloading,
            None => FireError::UnknownShooter,
        };

        log::debug!("fire request from {shooter:?} rejected: {rejection:?}");
        out_events.push(Event::FireRejected {
            shooter,
            reason: rejection,
        });
        None
    }

    fn fire_projectile(&mut self, shooter: EntityId, direction: Vector2, out_events: &mut Vec<Event>) {
        let Some(index) = self.ready_shooter(shooter, |actor| actor.reload_remaining, out_events)
        else {
            return;
        };

        let actor = &mut self.actors[index];
        let weapon = actor.kind().weapon();
        actor.reload_remaining = weapon.reload;
        let origin = actor.position();
        let target = actor.faction().opponent();

        let id = self.allocate_id();
        self.projectiles.push(Projectile::new(
            id,
            weapon.projectile,
            origin,
            direction,
            weapon.speed,
            target,
        ));
        out_events.push(Event::ProjectileFired {
            projectile: id,
            shooter: Some(shooter),
            kind: weapon.projectile,
        });
    }

    fn fire_laser(&mut self, shooter: EntityId, toward: Vector2, out_events: &mut Vec<Event>) {
        let Some(index) =
            self.ready_shooter(shooter, |actor| actor.laser_reload_remaining, out_events)
        else {
            return;
        };

        let actor = &mut self.actors[index];
        actor.laser_reload_remaining = LASER_RELOAD_TICKS;
        let from = actor.position();
        let target = actor.faction().opponent();

        let ray = from.towards(toward).normalize().scale(LASER_RANGE);
        let grid = &self.grid;
        let block = find_block_from_ray(from, ray, |cell| grid.is_solid(cell));
        let struck = find_entity_from_ray(from, block.hit_position, target, self.actors.iter());

        if let Some(victim) = struck.entity.and_then(|id| self.actor_mut(id)) {
            victim.damage(LASER_DAMAGE);
            out_events.push(Event::ActorDamaged {
                actor: victim.id(),
                amount: LASER_DAMAGE,
                health: victim.health(),
            });
        }

        self.beams.push(Beam::new(from, struck.hit_position));
        out_events.push(Event::LaserFired {
            shooter,
            from,
            to: struck.hit_position,
            hit: struck.entity,
        });
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.paused {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        let grid = &self.grid;
        for actor in self.actors.iter_mut().rev() {
            if actor.is_removed() {
                continue;
            }
            actor.tick_timers();
            if let Some(side) = advance(actor, |cell| grid.is_solid(cell)) {
                out_events.push(Event::ActorCollided {
                    actor: actor.id(),
                    side,
                });
            }
        }

        let mut bursts = Vec::new();
        for projectile in self.projectiles.iter_mut().rev() {
            projectile.advance(|cell| grid.is_solid(cell), &mut self.actors, out_events);
            if projectile.is_removed() && projectile.kind() == ProjectileKind::Cluster {
                bursts.push((
                    projectile.position(),
                    projectile.target(),
                    projectile.burst_directions().collect::<Vec<_>>(),
                ));
            }
        }

        for (origin, target, directions) in bursts {
            for direction in directions {
                let id = self.allocate_id();
                self.projectiles.push(Projectile::new(
                    id,
                    ProjectileKind::Shard,
                    origin,
                    direction,
                    SHARD_SPEED,
                    target,
                ));
                out_events.push(Event::ProjectileFired {
                    projectile: id,
                    shooter: None,
                    kind: ProjectileKind::Shard,
                });
            }
        }

        for beam in self.beams.iter_mut().rev() {
            beam.fade();
        }

        self.compact(out_events);
        log::trace!(
            "tick {}: {} actors, {} projectiles, {} beams",
            self.tick_index,
            self.actors.len(),
            self.projectiles.len(),
            self.beams.len()
        );
    }

    fn compact(&mut self, out_events: &mut Vec<Event>) {
        self.actors.retain(|actor| {
            if !actor.is_removed() {
                return true;
            }
            log::debug!("actor {:?} ({:?}) removed", actor.id(), actor.kind());
            out_events.push(Event::ActorRemoved {
                actor: actor.id(),
                kind: actor.kind(),
            });
            false
        });

        self.projectiles.retain(|projectile| {
            if !projectile.is_removed() {
                return true;
            }
            out_events.push(Event::ProjectileRemoved {
                projectile: projectile.id(),
            });
            false
        });

        self.beams.retain(|beam| !beam.is_removed());
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceTile { cell, tile } => {
            if world.grid.place(cell, tile) != tile {
                out_events.push(Event::TileChanged { cell, tile });
            }
        }
        Command::FillTiles { from, to, tile } => {
            for cell in world.grid.place_box(from, to, tile) {
                out_events.push(Event::TileChanged { cell, tile });
            }
        }
        Command::SpawnActor { kind, position } => {
            let id = world.allocate_id();
            world.actors.push(Actor::new(id, kind, position));
            log::debug!("spawned {kind:?} {id:?} at {position:?}");
            out_events.push(Event::ActorSpawned {
                actor: id,
                kind,
                position,
            });
        }
        Command::SpawnMarker { position } => {
            let id = world.allocate_id();
            world.markers.push(Marker { id, position });
            out_events.push(Event::MarkerSpawned {
                marker: id,
                position,
            });
        }
        Command::ClearMarkers => world.markers.clear(),
        Command::SetPaused { paused } => {
            if world.paused != paused {
                world.paused = paused;
                out_events.push(Event::PauseChanged { paused });
            }
        }
        Command::SetMomentum { actor, momentum } => match world.actor_mut(actor) {
            Some(actor) => actor.set_momentum(momentum),
            None => log::debug!("ignoring momentum for unknown actor {actor:?}"),
        },
        Command::FaceToward { actor, target } => {
            if let Some(actor) = world.actor_mut(actor) {
                actor.face_toward(target);
            }
        }
        Command::FireProjectile { shooter, direction } => {
            world.fire_projectile(shooter, direction, out_events);
        }
        Command::FireLaser { shooter, toward } => world.fire_laser(shooter, toward, out_events),
        Command::Tick => world.tick(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use gridfire_core::{ActorView, BeamSnapshot, CellCoord, ProjectileView};

    use super::{Grid, Marker, World};

    /// Provides read-only access to the tile grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Whether the tile blocks movement, rays and routes.
    #[must_use]
    pub fn is_solid(world: &World, cell: CellCoord) -> bool {
        world.grid.is_solid(cell)
    }

    /// Captures a read-only view of every living actor.
    #[must_use]
    pub fn actor_view(world: &World) -> ActorView {
        ActorView::from_snapshots(world.actors.iter().map(|actor| actor.snapshot()).collect())
    }

    /// Captures a read-only view of every projectile in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Snapshots of the laser beams that are still fading out.
    #[must_use]
    pub fn beams(world: &World) -> Vec<BeamSnapshot> {
        world.beams.iter().map(|beam| beam.snapshot()).collect()
    }

    /// Markers currently placed in the world.
    #[must_use]
    pub fn markers(world: &World) -> &[Marker] {
        &world.markers
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Whether ticks are currently ignored.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }
}
