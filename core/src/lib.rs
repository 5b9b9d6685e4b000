#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gridfire engine.
//!
//! This crate defines the spatial model and the message surface that connects
//! adapters, the authoritative world, and pure systems. Adapters and systems
//! submit [`Command`] values describing desired mutations, the world executes
//! them via its `apply` entry point and broadcasts [`Event`] values. Systems
//! query immutable snapshots and respond exclusively with new command batches.
//!
//! Every spatial system uses the same conventions: tiles are unit squares
//! addressed by floored coordinates, so the tile `(x, y)` covers the half-open
//! region `[x, x + 1) × [y, y + 1)`.

mod vector;

pub use vector::{find_angle, round_to_precision, Vector2};

use serde::{Deserialize, Serialize};

/// Location of a single tile expressed as signed column and row coordinates.
///
/// The grid is unbounded, so both axes extend into negative values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Returns the tile containing the provided point.
    #[must_use]
    pub fn containing(point: Vector2) -> Self {
        Self::new(point.x.floor() as i32, point.y.floor() as i32)
    }

    /// Column index of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the tile displaced by the provided column and row deltas.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self::new(self.column + columns, self.row + rows)
    }

    /// Point at the centre of the tile.
    #[must_use]
    pub fn center(self) -> Vector2 {
        Vector2::new(f64::from(self.column) + 0.5, f64::from(self.row) + 0.5)
    }

    /// Number of king moves separating two tiles.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }
}

/// Identifier of the content stored in a grid tile.
///
/// Absence of an identifier means the tile is empty. Any stored identifier
/// marks the tile as solid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileId(u16);

impl TileId {
    /// Plain impassable wall.
    pub const WALL: Self = Self(1);

    /// Creates a tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Face of an axis-aligned box that a ray or moving body struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// A top or bottom face, reached while travelling vertically.
    Horizontal,
    /// A left or right face, reached while travelling horizontally.
    Vertical,
}

/// Coarse allegiance that gates which entities a ray or attack can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The player and their allies.
    Friendly,
    /// Enemies opposing the player.
    Hostile,
}

impl Faction {
    /// Faction that attacks launched by this faction are aimed at.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Friendly => Self::Hostile,
            Self::Hostile => Self::Friendly,
        }
    }
}

/// Unique identifier assigned to actors, projectiles and markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Anything occupying an axis-aligned box in the world.
pub trait Positioned {
    /// Identifier of the entity.
    fn id(&self) -> EntityId;

    /// Centre of the entity's bounding box.
    fn position(&self) -> Vector2;

    /// Half of the bounding box's width and height.
    fn half_extents(&self) -> Vector2;

    /// Upper-left corner of the bounding box.
    fn top_left(&self) -> Vector2 {
        self.position() - self.half_extents()
    }

    /// Lower-right corner of the bounding box.
    fn bottom_right(&self) -> Vector2 {
        self.position() + self.half_extents()
    }
}

/// Entity with momentum that participates in collision resolution.
pub trait Movable: Positioned {
    /// Velocity in grid units per tick.
    fn momentum(&self) -> Vector2;

    /// Replaces the velocity applied on the next tick.
    fn set_momentum(&mut self, momentum: Vector2);

    /// Moves the centre of the bounding box.
    fn set_position(&mut self, position: Vector2);
}

/// Entity with health, allegiance and a post-hit immunity window.
pub trait Damageable: Positioned {
    /// Allegiance of the entity.
    fn faction(&self) -> Faction;

    /// Whether the entity recently took damage and cannot be targeted.
    fn is_immune(&self) -> bool;

    /// Remaining health.
    fn health(&self) -> i32;

    /// Applies damage, opening the immunity window.
    fn damage(&mut self, amount: i32);
}

/// Types of projectiles that can travel through the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Straight shot that disappears on the first hit.
    Bolt,
    /// Heavy shot that ricochets off walls and targets.
    Bouncer,
    /// Short-lived shell that bursts into shards when it expires.
    Cluster,
    /// Small ricocheting fragment released by a cluster shell.
    Shard,
}

impl ProjectileKind {
    /// Full width and height of the projectile's hitbox.
    #[must_use]
    pub const fn hitbox(self) -> f64 {
        match self {
            Self::Bolt | Self::Bouncer | Self::Shard => 0.2,
            Self::Cluster => 0.3,
        }
    }

    /// Number of ticks the projectile survives.
    #[must_use]
    pub const fn lifetime(self) -> u32 {
        match self {
            Self::Bolt => 125,
            Self::Bouncer => 200,
            Self::Cluster => 25,
            Self::Shard => 50,
        }
    }

    /// Damage dealt to the entity struck by the projectile.
    #[must_use]
    pub const fn damage(self) -> i32 {
        match self {
            Self::Bolt | Self::Shard => 1,
            Self::Bouncer | Self::Cluster => 2,
        }
    }

    /// Number of times the projectile may ricochet before being removed.
    #[must_use]
    pub const fn bounces(self) -> u32 {
        match self {
            Self::Bolt => 0,
            Self::Bouncer => 5,
            Self::Cluster => 10,
            Self::Shard => 3,
        }
    }
}

/// Ranged attack carried by an actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weapon {
    /// Projectile launched on each shot.
    pub projectile: ProjectileKind,
    /// Distance travelled by the projectile per tick.
    pub speed: f64,
    /// Ticks that must elapse between two shots.
    pub reload: u32,
}

/// Archetypes of living actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// The character steered by the user.
    Player,
    /// Stationary enemy firing bolts.
    Sentry,
    /// Large stationary enemy firing bouncing shots.
    HeavySentry,
    /// Stationary enemy firing cluster shells.
    ClusterSentry,
    /// Enemy that hunts the player along computed routes.
    Stalker,
}

impl ActorKind {
    /// Health the actor spawns with.
    #[must_use]
    pub const fn max_health(self) -> i32 {
        match self {
            Self::Player | Self::HeavySentry => 10,
            Self::Sentry | Self::ClusterSentry | Self::Stalker => 5,
        }
    }

    /// Full width and height of the actor's hitbox.
    #[must_use]
    pub const fn hitbox(self) -> f64 {
        match self {
            Self::HeavySentry => 1.0,
            Self::Player | Self::Sentry | Self::ClusterSentry | Self::Stalker => 0.75,
        }
    }

    /// Allegiance of the actor.
    #[must_use]
    pub const fn faction(self) -> Faction {
        match self {
            Self::Player => Faction::Friendly,
            Self::Sentry | Self::HeavySentry | Self::ClusterSentry | Self::Stalker => {
                Faction::Hostile
            }
        }
    }

    /// Ticks the actor waits after spawning before its first shot.
    #[must_use]
    pub const fn initial_reload(self) -> u32 {
        match self {
            Self::Player => 0,
            Self::ClusterSentry => 30,
            Self::Sentry | Self::HeavySentry | Self::Stalker => 50,
        }
    }

    /// Ranged attack fired by the actor.
    #[must_use]
    pub const fn weapon(self) -> Weapon {
        match self {
            Self::Player => Weapon {
                projectile: ProjectileKind::Bolt,
                speed: 0.5,
                reload: 5,
            },
            Self::Sentry | Self::Stalker => Weapon {
                projectile: ProjectileKind::Bolt,
                speed: 1.2,
                reload: 25,
            },
            Self::HeavySentry => Weapon {
                projectile: ProjectileKind::Bouncer,
                speed: 2.0,
                reload: 50,
            },
            Self::ClusterSentry => Weapon {
                projectile: ProjectileKind::Cluster,
                speed: 1.0,
                reload: 50,
            },
        }
    }

    /// Whether the actor moves along computed routes when it loses sight of the player.
    #[must_use]
    pub const fn follows_routes(self) -> bool {
        matches!(self, Self::Stalker)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Writes or clears a single grid tile.
    PlaceTile {
        /// Tile being written.
        cell: CellCoord,
        /// Content to store, `None` clears the tile.
        tile: Option<TileId>,
    },
    /// Writes the same content into every tile of an inclusive rectangle.
    FillTiles {
        /// One corner of the rectangle.
        from: CellCoord,
        /// The opposite corner of the rectangle.
        to: CellCoord,
        /// Content to store, `None` clears the tiles.
        tile: Option<TileId>,
    },
    /// Creates a new actor centred on the provided position.
    SpawnActor {
        /// Archetype of the actor.
        kind: ActorKind,
        /// Centre of the actor's bounding box.
        position: Vector2,
    },
    /// Creates a passive marker used to visualise queries.
    SpawnMarker {
        /// Centre of the marker.
        position: Vector2,
    },
    /// Removes every marker from the world.
    ClearMarkers,
    /// Suspends or resumes the simulation clock.
    SetPaused {
        /// Whether ticks should be ignored.
        paused: bool,
    },
    /// Replaces an actor's momentum.
    SetMomentum {
        /// Actor being steered.
        actor: EntityId,
        /// Velocity in grid units per tick.
        momentum: Vector2,
    },
    /// Turns an actor towards a point.
    FaceToward {
        /// Actor being turned.
        actor: EntityId,
        /// Point the actor should face.
        target: Vector2,
    },
    /// Requests that an actor launch its weapon's projectile.
    FireProjectile {
        /// Actor pulling the trigger.
        shooter: EntityId,
        /// Direction of travel, normalized by the world.
        direction: Vector2,
    },
    /// Requests that an actor fire its instant-hit laser.
    FireLaser {
        /// Actor pulling the trigger.
        shooter: EntityId,
        /// Point the laser is aimed at.
        toward: Vector2,
    },
    /// Advances the simulation by exactly one tick.
    Tick,
}

/// Reasons a fire request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireError {
    /// No living actor with the provided identifier exists.
    UnknownShooter,
    /// The shooter's weapon has not finished reloading.
    Reloading,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Number of ticks processed since the world was created.
        tick: u64,
    },
    /// Announces that the simulation was paused or resumed.
    PauseChanged {
        /// Whether the simulation is now paused.
        paused: bool,
    },
    /// Confirms that a grid tile changed content.
    TileChanged {
        /// Tile that was written.
        cell: CellCoord,
        /// New content of the tile.
        tile: Option<TileId>,
    },
    /// Confirms that an actor was created.
    ActorSpawned {
        /// Identifier assigned to the actor.
        actor: EntityId,
        /// Archetype of the actor.
        kind: ActorKind,
        /// Centre of the actor's bounding box.
        position: Vector2,
    },
    /// Confirms that a marker was created.
    MarkerSpawned {
        /// Identifier assigned to the marker.
        marker: EntityId,
        /// Centre of the marker.
        position: Vector2,
    },
    /// Reports that an actor was stopped by a solid tile.
    ActorCollided {
        /// Actor that collided.
        actor: EntityId,
        /// Face of the tile that stopped the actor.
        side: Side,
    },
    /// Reports that an actor lost health.
    ActorDamaged {
        /// Actor that was struck.
        actor: EntityId,
        /// Damage dealt.
        amount: i32,
        /// Health remaining after the hit.
        health: i32,
    },
    /// Reports that an actor left the world.
    ActorRemoved {
        /// Actor that was removed.
        actor: EntityId,
        /// Archetype of the removed actor.
        kind: ActorKind,
    },
    /// Confirms that a projectile entered the world.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: EntityId,
        /// Actor that fired it, `None` for shards released by a cluster shell.
        shooter: Option<EntityId>,
        /// Type of projectile.
        kind: ProjectileKind,
    },
    /// Reports that a projectile ricocheted.
    ProjectileBounced {
        /// Projectile that changed direction.
        projectile: EntityId,
        /// Face that reflected the projectile.
        side: Side,
    },
    /// Reports that a projectile left the world.
    ProjectileRemoved {
        /// Projectile that was removed.
        projectile: EntityId,
    },
    /// Confirms that a laser was fired.
    LaserFired {
        /// Actor that fired the laser.
        shooter: EntityId,
        /// Start of the beam.
        from: Vector2,
        /// End of the beam.
        to: Vector2,
        /// Actor struck by the beam, if any.
        hit: Option<EntityId>,
    },
    /// Reports that a fire request was rejected.
    FireRejected {
        /// Actor named by the request.
        shooter: EntityId,
        /// Specific reason the request failed.
        reason: FireError,
    },
}

/// Immutable representation of a single actor's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Unique identifier assigned to the actor.
    pub id: EntityId,
    /// Archetype of the actor.
    pub kind: ActorKind,
    /// Centre of the actor's bounding box.
    pub position: Vector2,
    /// Half of the bounding box's width and height.
    pub half_extents: Vector2,
    /// Velocity applied on the next tick.
    pub momentum: Vector2,
    /// Facing in radians.
    pub angle: f64,
    /// Allegiance of the actor.
    pub faction: Faction,
    /// Remaining health.
    pub health: i32,
    /// Health the actor spawned with.
    pub max_health: i32,
    /// Whether the actor is inside its post-hit immunity window.
    pub immune: bool,
    /// Ticks until the weapon may fire again.
    pub reload_remaining: u32,
    /// Ticks until the laser may fire again.
    pub laser_reload_remaining: u32,
    /// Whether the healthbar should currently be presented.
    pub healthbar_visible: bool,
}

impl ActorSnapshot {
    /// Whether the actor's weapon is ready to fire.
    #[must_use]
    pub const fn ready_to_fire(&self) -> bool {
        self.reload_remaining == 0
    }
}

/// Read-only snapshot describing all actors within the world.
#[derive(Clone, Debug, Default)]
pub struct ActorView {
    snapshots: Vec<ActorSnapshot>,
}

impl ActorView {
    /// Creates a new actor view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ActorSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured actor snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single actor.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&ActorSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Snapshot of the oldest living player, if any.
    #[must_use]
    pub fn player(&self) -> Option<&ActorSnapshot> {
        self.iter().find(|snapshot| snapshot.kind == ActorKind::Player)
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the view contains no actors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ActorSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: EntityId,
    /// Type of projectile.
    pub kind: ProjectileKind,
    /// Current position.
    pub position: Vector2,
    /// Position at the start of the last tick, used to draw trails.
    pub previous_position: Vector2,
    /// Unit vector of travel.
    pub direction: Vector2,
    /// Heading in radians.
    pub angle: f64,
    /// Faction the projectile damages.
    pub target: Faction,
    /// Ticks before the projectile expires.
    pub lifetime_remaining: u32,
    /// Ricochets left before a hit removes the projectile.
    pub bounces_remaining: u32,
}

/// Read-only snapshot describing all projectiles within the world.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the view contains no projectiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a fading laser beam.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamSnapshot {
    /// Start of the beam.
    pub from: Vector2,
    /// End of the beam.
    pub to: Vector2,
    /// Stroke width in pixels at the default zoom.
    pub width: f64,
    /// Opacity in the range 0.0..=1.0.
    pub opacity: f64,
    /// Ticks before the beam disappears.
    pub lifetime_remaining: u32,
}

#[cfg(test)]
mod tests {
    use super::{ActorKind, CellCoord, EntityId, Faction, ProjectileKind, Side, TileId, Vector2};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn containing_floors_negative_coordinates() {
        let cell = CellCoord::containing(Vector2::new(-0.25, 3.99));
        assert_eq!(cell, CellCoord::new(-1, 3));
    }

    #[test]
    fn chebyshev_distance_counts_diagonal_steps() {
        let origin = CellCoord::new(-2, 1);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(1, 3)), 3);
        assert_eq!(origin.chebyshev_distance(origin), 0);
    }

    #[test]
    fn factions_oppose_each_other() {
        assert_eq!(Faction::Friendly.opponent(), Faction::Hostile);
        assert_eq!(Faction::Hostile.opponent(), Faction::Friendly);
    }

    #[test]
    fn only_the_player_is_friendly() {
        assert_eq!(ActorKind::Player.faction(), Faction::Friendly);
        for kind in [
            ActorKind::Sentry,
            ActorKind::HeavySentry,
            ActorKind::ClusterSentry,
            ActorKind::Stalker,
        ] {
            assert_eq!(kind.faction(), Faction::Hostile);
        }
    }

    #[test]
    fn only_stalkers_follow_routes() {
        assert!(ActorKind::Stalker.follows_routes());
        assert!(!ActorKind::Sentry.follows_routes());
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(-7, 12));
    }

    #[test]
    fn tile_id_round_trips_through_bincode() {
        assert_round_trip(&TileId::WALL);
    }

    #[test]
    fn entity_id_round_trips_through_bincode() {
        assert_round_trip(&EntityId::new(42));
    }

    #[test]
    fn enums_round_trip_through_bincode() {
        assert_round_trip(&Side::Horizontal);
        assert_round_trip(&ActorKind::Stalker);
        assert_round_trip(&ProjectileKind::Cluster);
    }

    #[test]
    fn vector_round_trips_through_bincode() {
        assert_round_trip(&Vector2::new(20.2, 21.99));
    }
}
