use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Args;
use maze_chase_level::LevelConfig;

/// Command-line values that take precedence over the configuration file.
#[derive(Args, Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    /// Maze width in cells.
    #[arg(long, global = true)]
    pub(crate) width: Option<u32>,
    /// Maze height in cells.
    #[arg(long, global = true)]
    pub(crate) height: Option<u32>,
    /// Growth complexity in (0, 1].
    #[arg(long, global = true)]
    pub(crate) complexity: Option<f64>,
    /// Seed density in (0, 1].
    #[arg(long, global = true)]
    pub(crate) density: Option<f64>,
    /// Level number driving the enemy count.
    #[arg(long, global = true)]
    pub(crate) level: Option<u32>,
}

impl Overrides {
    /// Returns `config` with every provided override applied.
    #[must_use]
    pub(crate) fn apply(self, mut config: LevelConfig) -> LevelConfig {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(complexity) = self.complexity {
            config.complexity = complexity;
        }
        if let Some(density) = self.density {
            config.density = density;
        }
        if let Some(level) = self.level {
            config.level = level;
        }
        config
    }
}

/// Loads the level configuration, falling back to defaults when no file is named.
pub(crate) fn load(path: Option<&Path>) -> Result<LevelConfig> {
    let Some(path) = path else {
        return Ok(LevelConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    parse(&text).with_context(|| format!("failed to parse configuration {}", path.display()))
}

fn parse(text: &str) -> Result<LevelConfig, toml::de::Error> {
    toml::from_str(text)
}
