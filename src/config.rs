//! Startup configuration: command-line flags and their validated form.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::entities::{Player, Position};
use crate::error::{GameError, Result};

#[derive(Parser, Debug, Clone)]
#[command(name = "invaders")]
#[command(about = "Shoot down a grid of invaders from the terminal")]
pub struct Cli {
    /// Canvas width in logical pixels
    #[arg(long, default_value_t = 800.0)]
    pub width: f32,

    /// Canvas height in logical pixels
    #[arg(long, default_value_t = 600.0)]
    pub height: f32,

    /// Milliseconds between ticks
    #[arg(long, default_value_t = 33)]
    pub frame_ms: u64,

    /// Horizontal ship movement per tick
    #[arg(long, default_value_t = 5.0)]
    pub player_speed: f32,

    /// Text sprite used for every enemy
    #[arg(long, default_value = "assets/type_a.txt")]
    pub enemy_image: PathBuf,

    /// Where tracing output goes (never the terminal)
    #[arg(long, default_value = "invaders.log")]
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,
    pub frame: Duration,
    pub player_speed: f32,
    pub enemy_image: PathBuf,
    pub log_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            frame: Duration::from_millis(33), // ≈30 FPS
            player_speed: 5.0,
            enemy_image: PathBuf::from("assets/type_a.txt"),
            log_file: PathBuf::from("invaders.log"),
        }
    }
}

impl GameConfig {
    /// The ship starts centred, near the bottom of the canvas.
    pub fn player_start(&self) -> Position {
        Position::new(self.width / 2.0, self.height * 14.0 / 15.0)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 2.0 * Player::HALF_WIDTH) {
            return Err(GameError::InvalidConfig(format!(
                "width {} must exceed the ship width {}",
                self.width,
                2.0 * Player::HALF_WIDTH
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "height {} must be positive",
                self.height
            )));
        }
        if self.frame.is_zero() {
            return Err(GameError::InvalidConfig(
                "frame interval must be at least 1 ms".to_string(),
            ));
        }
        if !(self.player_speed.is_finite() && self.player_speed >= 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "player speed {} must be a non-negative number",
                self.player_speed
            )));
        }
        Ok(())
    }
}

impl TryFrom<Cli> for GameConfig {
    type Error = GameError;

    fn try_from(cli: Cli) -> Result<Self> {
        let config = GameConfig {
            width: cli.width,
            height: cli.height,
            frame: Duration::from_millis(cli.frame_ms),
            player_speed: cli.player_speed,
            enemy_image: cli.enemy_image,
            log_file: cli.log_file,
        };
        config.validate()?;
        Ok(config)
    }
}
