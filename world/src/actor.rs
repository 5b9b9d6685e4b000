//! Living actors: the player and every enemy archetype.

use gridfire_core::{
    find_angle, ActorKind, ActorSnapshot, Damageable, EntityId, Faction, Movable, Positioned,
    Vector2,
};

const IMMUNITY_TICKS: u32 = 4;
const HEALTHBAR_TICKS: u32 = 75;
pub(crate) const LASER_RELOAD_TICKS: u32 = 50;

/// Mutable state of a single actor owned by the world.
#[derive(Clone, Debug)]
pub(crate) struct Actor {
    id: EntityId,
    kind: ActorKind,
    position: Vector2,
    momentum: Vector2,
    angle: f64,
    health: i32,
    immunity_remaining: u32,
    healthbar_remaining: u32,
    pub(crate) reload_remaining: u32,
    pub(crate) laser_reload_remaining: u32,
}

impl Actor {
    pub(crate) fn new(id: EntityId, kind: ActorKind, position: Vector2) -> Self {
        Self {
            id,
            kind,
            position,
            momentum: Vector2::ZERO,
            angle: 0.0,
            health: kind.max_health(),
            immunity_remaining: 0,
            healthbar_remaining: 0,
            reload_remaining: kind.initial_reload(),
            laser_reload_remaining: 0,
        }
    }

    pub(crate) const fn kind(&self) -> ActorKind {
        self.kind
    }

    pub(crate) fn face_toward(&mut self, target: Vector2) {
        self.angle = find_angle(self.position, target);
    }

    /// Counts down every timer by one tick.
    pub(crate) fn tick_timers(&mut self) {
        self.immunity_remaining = self.immunity_remaining.saturating_sub(1);
        self.healthbar_remaining = self.healthbar_remaining.saturating_sub(1);
        self.reload_remaining = self.reload_remaining.saturating_sub(1);
        self.laser_reload_remaining = self.laser_reload_remaining.saturating_sub(1);
    }

    pub(crate) const fn is_removed(&self) -> bool {
        self.health <= 0
    }

    pub(crate) fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            half_extents: self.half_extents(),
            momentum: self.momentum,
            angle: self.angle,
            faction: self.kind.faction(),
            health: self.health,
            max_health: self.kind.max_health(),
            immune: self.is_immune(),
            reload_remaining: self.reload_remaining,
            laser_reload_remaining: self.laser_reload_remaining,
            healthbar_visible: self.healthbar_remaining > 0,
        }
    }
}

impl Positioned for Actor {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vector2 {
        self.position
    }

    fn half_extents(&self) -> Vector2 {
        let half = self.kind.hitbox() / 2.0;
        Vector2::new(half, half)
    }
}

impl Movable for Actor {
    fn momentum(&self) -> Vector2 {
        self.momentum
    }

    fn set_momentum(&mut self, momentum: Vector2) {
        self.momentum = momentum;
    }

    fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }
}

impl Damageable for Actor {
    fn faction(&self) -> Faction {
        self.kind.faction()
    }

    fn is_immune(&self) -> bool {
        self.immunity_remaining > 0
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn damage(&mut self, amount: i32) {
        self.immunity_remaining = IMMUNITY_TICKS;
        self.health -= amount;
        if self.health > 0 {
            self.healthbar_remaining = HEALTHBAR_TICKS;
        }
    }
}
