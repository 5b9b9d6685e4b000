#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the gridfire simulation headlessly.

mod config;
mod layout;
mod render;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gridfire_core::{Command, Faction, Vector2};
use gridfire_system_pathfinding::{Pathfinder, PathfinderConfig};
use gridfire_world::{self as world, query, World};

use crate::{
    config::{Config, LevelChoice},
    render::render_frame,
    session::{build_level, Session},
};

#[derive(Debug, Parser)]
#[command(name = "gridfire")]
#[command(about = "Headless driver for the gridfire simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Simulate a level with scripted player input
    Run(RunArgs),
    /// Plan a route between two points of a level and draw it
    Pathfind(PathfindArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// TOML file describing the session
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,
    /// Level to load
    #[arg(long, value_enum)]
    level: Option<LevelChoice>,
    /// Frontier expansions allowed per route query
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_rounds: Option<u32>,
    /// Print an ASCII frame every N ticks
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    frame_every: Option<u64>,
}

#[derive(Debug, Args)]
struct PathfindArgs {
    /// Level to search
    #[arg(long, value_enum)]
    level: Option<LevelChoice>,
    /// Start position as `x,y`
    #[arg(long, value_parser = parse_point)]
    from: Vector2,
    /// Goal position as `x,y`
    #[arg(long, value_parser = parse_point)]
    to: Vector2,
    /// Frontier expansions allowed before giving up
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_rounds: Option<u32>,
}

fn parse_point(value: &str) -> Result<Vector2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{value}`"))?;
    let coordinate = |text: &str| {
        text.trim()
            .parse::<f64>()
            .map_err(|error| format!("invalid coordinate `{text}`: {error}"))
    };
    Ok(Vector2::new(coordinate(x)?, coordinate(y)?))
}

/// Entry point for the gridfire command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Pathfind(args) => pathfind(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(ticks) = args.ticks {
        config.ticks = ticks;
    }
    if let Some(level) = args.level {
        config.level = level;
    }
    if let Some(max_rounds) = args.max_rounds {
        config.pathfinding.max_rounds = max_rounds;
    }

    let mut session = Session::new(config.level, config.pathfinding)
        .with_context(|| format!("failed to build {:?}", config.level))?;
    log::info!("simulating {:?} for {} ticks", config.level, config.ticks);

    for tick in 0..config.ticks {
        let _ = session.step(&config.input_at(tick));
        let elapsed = tick + 1;
        if args.frame_every.is_some_and(|every| elapsed % every == 0) {
            println!("tick {elapsed}\n{}", render_frame(session.world()));
        }
        if query::actor_view(session.world()).player().is_none() {
            log::info!("player destroyed on tick {elapsed}");
            break;
        }
    }

    let world = session.world();
    let actors = query::actor_view(world);
    let hostiles = actors
        .iter()
        .filter(|actor| actor.faction == Faction::Hostile)
        .count();
    let tally = session.tally();
    println!("ticks simulated: {}", query::tick_index(world));
    match actors.player() {
        Some(player) => println!("player health: {}/{}", player.health, player.max_health),
        None => println!("player health: destroyed"),
    }
    println!("hostiles remaining: {hostiles}");
    println!(
        "shots: {}, lasers: {}, hits: {}, destroyed: {}",
        tally.shots, tally.lasers, tally.hits, tally.removals
    );
    Ok(())
}

fn pathfind(args: PathfindArgs) -> Result<()> {
    let level = args.level.unwrap_or_default();
    let mut world = World::new();
    let mut events = Vec::new();
    build_level(&mut world, level, &mut events)
        .with_context(|| format!("failed to build {level:?}"))?;

    let config = PathfinderConfig {
        max_rounds: args
            .max_rounds
            .unwrap_or(PathfinderConfig::default().max_rounds),
    };
    let mut pathfinder = Pathfinder::new(config);
    let result = pathfinder.find_path(args.from, args.to, |cell| query::is_solid(&world, cell));
    if !result.found() {
        log::warn!(
            "no route from {:?} to {:?} within {} rounds",
            args.from,
            args.to,
            config.max_rounds
        );
        return Ok(());
    }

    let route: Vec<_> = result.traversal_order().collect();
    for cell in &route {
        world::apply(
            &mut world,
            Command::SpawnMarker {
                position: cell.center(),
            },
            &mut events,
        );
    }
    println!("route of {} tiles", route.len());
    print!("{}", render_frame(&world));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_parse_with_optional_spaces() {
        assert_eq!(parse_point("2.5, 3"), Ok(Vector2::new(2.5, 3.0)));
    }

    #[test]
    fn malformed_points_are_rejected() {
        assert!(parse_point("2.5").is_err());
        assert!(parse_point("a,1").is_err());
    }

    #[test]
    fn command_line_overrides_parse() {
        let cli = Cli::try_parse_from([
            "gridfire",
            "run",
            "--level",
            "labyrinth",
            "--ticks",
            "30",
            "--frame-every",
            "10",
        ])
        .expect("arguments parse");

        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.level, Some(LevelChoice::Labyrinth));
        assert_eq!(args.ticks, Some(30));
        assert_eq!(args.frame_every, Some(10));
    }

    #[test]
    fn zero_frame_interval_is_rejected() {
        assert!(Cli::try_parse_from(["gridfire", "run", "--frame-every", "0"]).is_err());
    }
}
