use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use glam::{Vec2, vec2};

use crate::maze::{Algorithm, Layout, Maze, MazeError};
use crate::time::ANIMATION_DELAY_MICROS;

// An 800 x 600 canvas with a 20-pixel border around a 16 x 12 grid.
pub const DEFAULT_COLS: usize = 16;
pub const DEFAULT_ROWS: usize = 12;
pub const DEFAULT_BORDER: f32 = 20.0;
pub const DEFAULT_CELL_WIDTH: f32 = (800.0 - 2.0 * DEFAULT_BORDER) / DEFAULT_COLS as f32;
pub const DEFAULT_CELL_HEIGHT: f32 = (600.0 - 2.0 * DEFAULT_BORDER) / DEFAULT_ROWS as f32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "Invalid value for {}: '{}'.", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct MazeConfig {
    pub origin: Vec2,
    pub cols: usize,
    pub rows: usize,
    pub cell_size: Vec2,
    pub seed: Option<u64>,
    pub algorithm: Algorithm,
    pub delay: Duration,
}

impl Default for MazeConfig {
    fn default() -> Self {
        MazeConfig {
            origin: vec2(DEFAULT_BORDER, DEFAULT_BORDER),
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            cell_size: vec2(DEFAULT_CELL_WIDTH, DEFAULT_CELL_HEIGHT),
            seed: None,
            algorithm: Algorithm::default(),
            delay: Duration::from_micros(ANIMATION_DELAY_MICROS),
        }
    }
}

impl MazeConfig {
    /// Reads `MAZE_*` variables, after loading a `.env` file if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Missing or blank keys fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = MazeConfig::default();
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let origin = vec2(
            parse(&read, "MAZE_ORIGIN_X")?.unwrap_or(defaults.origin.x),
            parse(&read, "MAZE_ORIGIN_Y")?.unwrap_or(defaults.origin.y),
        );
        let cell_size = vec2(
            parse(&read, "MAZE_CELL_WIDTH")?.unwrap_or(defaults.cell_size.x),
            parse(&read, "MAZE_CELL_HEIGHT")?.unwrap_or(defaults.cell_size.y),
        );
        let delay = parse(&read, "MAZE_DELAY_MICROS")?
            .map(Duration::from_micros)
            .unwrap_or(defaults.delay);

        Ok(MazeConfig {
            origin,
            cols: parse(&read, "MAZE_COLS")?.unwrap_or(defaults.cols),
            rows: parse(&read, "MAZE_ROWS")?.unwrap_or(defaults.rows),
            cell_size,
            seed: parse(&read, "MAZE_SEED")?,
            algorithm: parse(&read, "MAZE_ALGORITHM")?.unwrap_or(defaults.algorithm),
            delay,
        })
    }

    pub fn layout(&self) -> Layout {
        Layout {
            origin: self.origin,
            cell_size: self.cell_size,
        }
    }

    /// A fresh, uncarved maze with these dimensions.
    pub fn build(&self) -> Result<Maze, MazeError> {
        Maze::new(self.cols, self.rows, self.layout())
    }
}

fn parse<T: FromStr>(
    read: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match read(key) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
