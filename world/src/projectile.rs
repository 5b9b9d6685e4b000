//! Projectiles and fading laser beams.

use gridfire_core::{
    BeamSnapshot, CellCoord, Damageable, EntityId, Event, Faction, Positioned, ProjectileKind,
    ProjectileSnapshot, Side, Vector2,
};
use gridfire_system_raycast::{find_block_from_ray, find_entity_from_ray};

use crate::actor::Actor;

pub(crate) const SHARD_SPEED: f64 = 0.4;
const SHARD_SPREAD: [f64; 5] = [0.4, 0.2, 0.0, -0.2, -0.4];

const BEAM_LIFETIME: u32 = 20;
const BEAM_WIDTH: f64 = 4.0;
const BEAM_SHRINK: f64 = 0.2;
const BEAM_FADE: f64 = 0.05;

/// Projectile travelling through the world.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    id: EntityId,
    kind: ProjectileKind,
    position: Vector2,
    previous_position: Vector2,
    direction: Vector2,
    speed: f64,
    target: Faction,
    lifetime_remaining: u32,
    bounces_remaining: u32,
    removed: bool,
}

impl Projectile {
    pub(crate) fn new(
        id: EntityId,
        kind: ProjectileKind,
        origin: Vector2,
        direction: Vector2,
        speed: f64,
        target: Faction,
    ) -> Self {
        Self {
            id,
            kind,
            position: origin,
            previous_position: origin,
            direction: direction.normalize(),
            speed,
            target,
            lifetime_remaining: kind.lifetime(),
            bounces_remaining: kind.bounces(),
            removed: false,
        }
    }

    pub(crate) const fn kind(&self) -> ProjectileKind {
        self.kind
    }

    pub(crate) const fn target(&self) -> Faction {
        self.target
    }

    pub(crate) const fn is_removed(&self) -> bool {
        self.removed
    }

    /// Moves the projectile one tick along its heading.
    ///
    /// The block ray bounds the entity ray, so a target standing behind a
    /// wall cannot be struck. A hit on either removes the projectile unless
    /// it still has bounces left, in which case it is reflected instead.
    /// Running out of lifetime always removes it.
    pub(crate) fn advance<F>(&mut self, is_solid: F, actors: &mut [Actor], out_events: &mut Vec<Event>)
    where
        F: Fn(CellCoord) -> bool,
    {
        self.previous_position = self.position;
        self.lifetime_remaining = self.lifetime_remaining.saturating_sub(1);
        let expired = self.lifetime_remaining == 0;

        let ray = self.direction.scale(self.speed);
        let block = find_block_from_ray(self.position, ray, is_solid);
        let struck = find_entity_from_ray(self.position, block.hit_position, self.target, actors.iter());
        self.position = struck.hit_position;

        let side = match struck.entity {
            Some(victim) => {
                if let Some(actor) = actors.iter_mut().find(|actor| actor.id() == victim) {
                    let amount = self.kind.damage();
                    actor.damage(amount);
                    log::debug!("projectile {:?} struck actor {victim:?}", self.id);
                    out_events.push(Event::ActorDamaged {
                        actor: victim,
                        amount,
                        health: actor.health(),
                    });
                }
                struck.side
            }
            None => block.side,
        };

        match side {
            Some(side) if !expired && self.bounces_remaining > 0 => {
                self.bounces_remaining -= 1;
                self.reflect(side);
                out_events.push(Event::ProjectileBounced {
                    projectile: self.id,
                    side,
                });
            }
            Some(_) => self.removed = true,
            None => self.removed = expired,
        }
    }

    fn reflect(&mut self, side: Side) {
        match side {
            Side::Horizontal => self.direction.y = -self.direction.y,
            Side::Vertical => self.direction.x = -self.direction.x,
        }
    }

    /// Headings of the shards released when a cluster shell bursts.
    pub(crate) fn burst_directions(&self) -> impl Iterator<Item = Vector2> {
        let angle = self.direction.angle();
        SHARD_SPREAD
            .into_iter()
            .map(move |offset| Vector2::from_angle(angle + offset))
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            previous_position: self.previous_position,
            direction: self.direction,
            angle: self.direction.angle(),
            target: self.target,
            lifetime_remaining: self.lifetime_remaining,
            bounces_remaining: self.bounces_remaining,
        }
    }
}

impl Positioned for Projectile {
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

/// Short-lived laser beam that narrows and fades every tick.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Beam {
    from: Vector2,
    to: Vector2,
    width: f64,
    opacity: f64,
    lifetime_remaining: u32,
}

impl Beam {
    pub(crate) const fn new(from: Vector2, to: Vector2) -> Self {
        Self {
            from,
            to,
            width: BEAM_WIDTH,
            opacity: 1.0,
            lifetime_remaining: BEAM_LIFETIME,
        }
    }

    pub(crate) fn fade(&mut self) {
        self.width -= BEAM_SHRINK;
        self.opacity -= BEAM_FADE;
        self.lifetime_remaining = self.lifetime_remaining.saturating_sub(1);
    }

    pub(crate) const fn is_removed(&self) -> bool {
        self.lifetime_remaining == 0
    }

    pub(crate) fn snapshot(&self) -> BeamSnapshot {
        BeamSnapshot {
            from: self.from,
            to: self.to,
            width: self.width.max(0.0),
            opacity: self.opacity.clamp(0.0, 1.0),
            lifetime_remaining: self.lifetime_remaining,
        }
    }
}
