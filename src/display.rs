//! Rendering layer: translates entities into surface commands.
//!
//! No game logic happens here.  Every draw is wrapped in save/translate/
//! restore so shapes are described around their own centre.

use std::path::Path;

use tracing::{info, warn};

use crate::entities::{Bullet, Enemy, EnemyField, Image, Player, Position};
use crate::surface::{Rgb, Surface};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLAYER: Rgb = Rgb::WHITE;
const C_BULLET: Rgb = Rgb::WHITE;

const BULLET_LINE_WIDTH: f32 = 3.0;

/// Ship outline around its centre: a flat hull with a small nose cone.
const SHIP_OUTLINE: [Position; 8] = [
    Position::new(0.0, 10.0),
    Position::new(-20.0, 10.0),
    Position::new(-20.0, -7.0),
    Position::new(-3.0, -7.0),
    Position::new(0.0, -10.0),
    Position::new(3.0, -7.0),
    Position::new(20.0, -7.0),
    Position::new(20.0, 10.0),
];

// ── Assets ────────────────────────────────────────────────────────────────────

/// Load a text sprite.  Failure is not an error: the sprite simply draws
/// nothing.
pub fn load_image(path: impl AsRef<Path>) -> Image {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let rows: Vec<String> = text.lines().map(str::to_string).collect();
            info!(path = %path.display(), rows = rows.len(), "sprite loaded");
            Image::from_rows(path, rows)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "sprite failed to load");
            Image::unloaded(path)
        }
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

pub fn draw_player<S: Surface>(out: &mut S, player: &Player) -> std::io::Result<()> {
    if let Some(bullet) = player.visible_bullet() {
        draw_bullet(out, bullet)?;
    }

    out.save()?;
    out.translate(player.pos.x, player.pos.y)?;
    out.set_stroke(C_PLAYER)?;
    out.set_fill(C_PLAYER)?;
    out.stroke_polygon(&SHIP_OUTLINE)?;
    out.fill_polygon(&SHIP_OUTLINE)?;
    out.restore()
}

pub fn draw_bullet<S: Surface>(out: &mut S, bullet: &Bullet) -> std::io::Result<()> {
    out.save()?;
    out.translate(bullet.pos.x, bullet.pos.y)?;
    out.set_stroke(C_BULLET)?;
    out.set_line_width(BULLET_LINE_WIDTH)?;
    out.stroke_line(
        Position::new(0.0, -Bullet::HALF_HEIGHT),
        Position::new(0.0, Bullet::HALF_HEIGHT),
    )?;
    out.restore()
}

/// The sprite is anchored at its top-left corner, so it is shifted by half
/// its size to sit centred on the enemy.
pub fn draw_enemy<S: Surface>(out: &mut S, enemy: &Enemy) -> std::io::Result<()> {
    out.save()?;
    out.translate(enemy.pos.x, enemy.pos.y)?;
    out.draw_image(
        &enemy.image,
        -Enemy::HALF_SIZE,
        -Enemy::HALF_SIZE,
        Enemy::SIZE,
        Enemy::SIZE,
    )?;
    out.restore()
}

pub fn draw_field<S: Surface>(out: &mut S, field: &EnemyField) -> std::io::Result<()> {
    for enemy in field.iter() {
        draw_enemy(out, enemy)?;
    }
    Ok(())
}

// ── Per-entity entry points ───────────────────────────────────────────────────

impl Player {
    pub fn render<S: Surface>(&self, out: &mut S) -> std::io::Result<()> {
        draw_player(out, self)
    }
}

impl Bullet {
    pub fn render<S: Surface>(&self, out: &mut S) -> std::io::Result<()> {
        draw_bullet(out, self)
    }
}

impl Enemy {
    pub fn render<S: Surface>(&self, out: &mut S) -> std::io::Result<()> {
        draw_enemy(out, self)
    }
}

impl EnemyField {
    pub fn render<S: Surface>(&self, out: &mut S) -> std::io::Result<()> {
        draw_field(out, self)
    }
}
