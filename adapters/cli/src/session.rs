//! Headless game loop wiring the world to its systems.

use gridfire_core::{Command, Event};
use gridfire_system_enemy_behavior::EnemyBehavior;
use gridfire_system_pathfinding::PathfinderConfig;
use gridfire_system_player_control::{PlayerControl, PlayerInput};
use gridfire_world::{self as world, level, query, World};

use crate::{
    config::LevelChoice,
    layout::{self, LayoutError},
};

/// Loads `choice` into `world`, forwarding the construction events.
pub(crate) fn build_level(
    world: &mut World,
    choice: LevelChoice,
    out_events: &mut Vec<Event>,
) -> Result<(), LayoutError> {
    match choice {
        LevelChoice::Arena => level::build_arena(world, out_events),
        LevelChoice::Labyrinth => {
            for command in layout::labyrinth_commands()? {
                world::apply(world, command, out_events);
            }
        }
    }
    Ok(())
}

/// Running totals of notable events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub(crate) shots: usize,
    pub(crate) lasers: usize,
    pub(crate) hits: usize,
    pub(crate) removals: usize,
}

impl Tally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::ProjectileFired { shooter: Some(_), .. } => self.shots += 1,
                Event::LaserFired { .. } => self.lasers += 1,
                Event::ActorDamaged { .. } => self.hits += 1,
                Event::ActorRemoved { actor, kind } => {
                    log::info!("{kind:?} {actor:?} was destroyed");
                    self.removals += 1;
                }
                _ => {}
            }
        }
    }
}

/// World plus the systems that drive it, advanced one tick at a time.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    enemies: EnemyBehavior,
    control: PlayerControl,
    events: Vec<Event>,
    tally: Tally,
}

impl Session {
    /// Builds `choice` and prepares the systems for the first tick.
    pub(crate) fn new(
        choice: LevelChoice,
        pathfinding: PathfinderConfig,
    ) -> Result<Self, LayoutError> {
        let mut world = World::new();
        let mut events = Vec::new();
        build_level(&mut world, choice, &mut events)?;
        log::debug!("{choice:?} built with {} events", events.len());

        Ok(Self {
            world,
            enemies: EnemyBehavior::new(pathfinding),
            control: PlayerControl,
            events,
            tally: Tally::default(),
        })
    }

    /// World being simulated.
    #[must_use]
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Totals accumulated since the session started.
    #[must_use]
    pub(crate) fn tally(&self) -> Tally {
        self.tally
    }

    /// Runs the systems against the previous tick's events, applies their
    /// commands and advances the clock, returning the events produced.
    pub(crate) fn step(&mut self, input: &PlayerInput) -> &[Event] {
        let actors = query::actor_view(&self.world);
        let mut commands = Vec::new();
        let world = &self.world;
        self.enemies.handle(
            &self.events,
            &actors,
            |cell| query::is_solid(world, cell),
            &mut commands,
        );
        self.control.handle(&actors, input, &mut commands);

        let mut events = Vec::new();
        for command in commands.into_iter().chain([Command::Tick]) {
            world::apply(&mut self.world, command, &mut events);
        }
        self.tally.record(&events);
        self.events = events;
        &self.events
    }
}
