//! All game entity types: mostly data, with their tuning constants.
//!
//! Behaviour lives in `compute` (simulation) and `display` (drawing).

use std::path::{Path, PathBuf};
use std::rc::Rc;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// A point in canvas space (logical pixels, y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// ── Sprite image ──────────────────────────────────────────────────────────────

/// A sprite loaded by path.
///
/// Terminal sprites are plain text files, one line per glyph row.  A sprite
/// that failed to load keeps its path but has no rows, and draws nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub path: PathBuf,
    pub rows: Option<Vec<String>>,
}

impl Image {
    pub fn unloaded(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            rows: None,
        }
    }

    pub fn from_rows(path: impl AsRef<Path>, rows: Vec<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            rows: Some(rows),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.rows.is_some()
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub pos: Position,
    /// Set once the bullet has hit an enemy; never cleared.
    pub collided: bool,
}

impl Bullet {
    /// Upward travel per tick.
    pub const SPEED: f32 = 15.0;
    pub const HALF_WIDTH: f32 = 1.5;
    pub const HALF_HEIGHT: f32 = 5.0;
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Position,
    pub speed: f32,
    pub canvas_width: f32,
    /// The single bullet slot.  A new shot is only possible while empty.
    pub bullet: Option<Bullet>,
    /// The bullet that died during the current tick, still drawn once at its
    /// final position.
    pub spent: Option<Bullet>,
}

impl Player {
    pub const HALF_WIDTH: f32 = 20.0;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub pos: Position,
    pub image: Rc<Image>,
}

impl Enemy {
    pub const SIZE: f32 = 64.0;
    pub const HALF_SIZE: f32 = Self::SIZE / 2.0;
}

/// The enemy grid, in insertion (row-major) order.  Never grows after
/// `populate`.
#[derive(Clone, Debug, Default)]
pub struct EnemyField {
    pub enemies: Vec<Enemy>,
    pub populated: bool,
}

impl EnemyField {
    pub const COLUMNS: usize = 10;
    pub const ROWS: usize = 5;
    pub const ORIGIN: Position = Position::new(50.0, 50.0);
    pub const SPACING: f32 = Enemy::SIZE;
}
