//! Session configuration read from an optional TOML file.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use gridfire_system_pathfinding::PathfinderConfig;
use gridfire_system_player_control::PlayerInput;
use serde::Deserialize;

const DEFAULT_TICKS: u64 = 600;

/// Built-in levels the adapter can load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum LevelChoice {
    /// Walled courtyard with buildings, sentries and a stalker.
    #[default]
    Arena,
    /// Empty 40×40 maze.
    Labyrinth,
}

/// Player controls held during a half-open range of ticks.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct InputWindow {
    /// First tick the controls are held on.
    pub(crate) from_tick: u64,
    /// Tick on which the controls are released.
    pub(crate) to_tick: u64,
    /// Controls held while the window is active.
    #[serde(flatten)]
    pub(crate) controls: PlayerInput,
}

impl InputWindow {
    fn covers(&self, tick: u64) -> bool {
        (self.from_tick..self.to_tick).contains(&tick)
    }
}

/// Everything needed to drive a headless session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Number of ticks to simulate.
    pub(crate) ticks: u64,
    /// Level loaded before the first tick.
    pub(crate) level: LevelChoice,
    /// Limits applied to enemy route planning.
    pub(crate) pathfinding: PathfinderConfig,
    /// Scripted player input, later windows taking precedence.
    pub(crate) input: Vec<InputWindow>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_TICKS,
            level: LevelChoice::default(),
            pathfinding: PathfinderConfig::default(),
            input: Vec::new(),
        }
    }
}

impl Config {
    /// Reads and validates the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse config toml")?;
        for window in &config.input {
            if window.to_tick <= window.from_tick {
                bail!(
                    "input window {}..{} covers no ticks",
                    window.from_tick,
                    window.to_tick
                );
            }
        }
        if config.pathfinding.max_rounds == 0 {
            bail!("pathfinding.max_rounds must be positive");
        }
        Ok(config)
    }

    /// Controls held on `tick`; idle when no window covers it.
    #[must_use]
    pub(crate) fn input_at(&self, tick: u64) -> PlayerInput {
        self.input
            .iter()
            .rev()
            .find(|window| window.covers(tick))
            .map(|window| window.controls)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use gridfire_core::Vector2;

    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").expect("empty config is valid");
        assert_eq!(config, Config::default());
        assert_eq!(config.pathfinding.max_rounds, 100);
    }

    #[test]
    fn full_file_is_read() {
        let config = Config::parse(
            r#"
            ticks = 120
            level = "labyrinth"

            [pathfinding]
            max_rounds = 40

            [[input]]
            from_tick = 0
            to_tick = 30
            right = true
            fire = true
            aim = { x = 10.0, y = 2.5 }

            [[input]]
            from_tick = 20
            to_tick = 40
            down = true
            "#,
        )
        .expect("config parses");

        assert_eq!(config.ticks, 120);
        assert_eq!(config.level, LevelChoice::Labyrinth);
        assert_eq!(config.pathfinding.max_rounds, 40);

        let early = config.input_at(5);
        assert!(early.right && early.fire && !early.down);
        assert_eq!(early.aim, Vector2::new(10.0, 2.5));

        let overlap = config.input_at(25);
        assert!(overlap.down && !overlap.right);

        assert_eq!(config.input_at(40), PlayerInput::default());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let error = Config::parse(
            r#"
            [[input]]
            from_tick = 10
            to_tick = 10
            "#,
        )
        .expect_err("empty window");
        assert!(error.to_string().contains("covers no ticks"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("tick = 5").is_err());
    }

    #[test]
    fn bundled_session_parses() {
        let config = Config::parse(include_str!("../sessions/arena.toml")).expect("bundled config");
        assert_eq!(config.level, LevelChoice::Arena);
        assert!(config.input_at(150).laser);
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(Config::parse("level = \"moon\"").is_err());
    }
}
