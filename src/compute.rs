//! Game-logic functions.
//!
//! Everything here is deterministic and free of I/O: movement and clamping,
//! the single-bullet lifecycle, and bounding-box collision against the enemy
//! grid.  Drawing lives in `display`.

use std::rc::Rc;

use tracing::debug;

use crate::entities::{Bullet, Enemy, EnemyField, Image, Player, Position};
use crate::input::InputState;

// ── Bullet ────────────────────────────────────────────────────────────────────

impl Bullet {
    pub fn new(pos: Position) -> Self {
        Self {
            pos,
            collided: false,
        }
    }

    pub fn advance(&mut self) {
        self.pos.y -= Bullet::SPEED;
    }

    /// Alive until it hits something or its tail clears the top edge.
    pub fn is_alive(&self) -> bool {
        !self.collided && self.pos.y >= -Bullet::HALF_HEIGHT
    }

    pub fn mark_collided(&mut self) {
        self.collided = true;
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

impl Player {
    pub fn new(pos: Position, speed: f32, canvas_width: f32) -> Self {
        Self {
            pos,
            speed,
            canvas_width,
            bullet: None,
            spent: None,
        }
    }

    /// Horizontal movement followed by an unconditional clamp.
    pub fn update(&mut self, input: &InputState) {
        let dx = match (input.move_left, input.move_right) {
            (true, true) => 0.0,
            (true, false) => -self.speed,
            (false, true) => self.speed,
            (false, false) => 0.0,
        };
        self.pos.x += dx;

        // Right bound wins: a canvas narrower than the ship pins it there.
        self.pos.x = self
            .pos
            .x
            .max(Player::HALF_WIDTH)
            .min(self.canvas_width - Player::HALF_WIDTH);
    }

    /// Fire if the slot is empty, then advance the held bullet and drop it
    /// once it is dead.  A dropped bullet moves to `spent` until the next
    /// call.
    pub fn update_bullet(&mut self, input: &InputState) {
        self.spent = None;
        if input.fire && self.bullet.is_none() {
            debug!(x = self.pos.x, y = self.pos.y, "bullet fired");
            self.bullet = Some(Bullet::new(self.pos));
        }

        if let Some(bullet) = self.bullet.as_mut() {
            bullet.advance();
            if !bullet.is_alive() {
                debug!(y = bullet.pos.y, collided = bullet.collided, "bullet expired");
                self.spent = self.bullet.take();
            }
        }
    }

    /// One tick of player simulation.
    pub fn simulate(&mut self, input: &InputState) {
        self.update(input);
        self.update_bullet(input);
    }

    pub fn bullet(&self) -> Option<&Bullet> {
        self.bullet.as_ref()
    }

    pub fn bullet_mut(&mut self) -> Option<&mut Bullet> {
        self.bullet.as_mut()
    }

    /// What to draw this tick: the live bullet, or the one that just died.
    pub fn visible_bullet(&self) -> Option<&Bullet> {
        self.bullet.as_ref().or(self.spent.as_ref())
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

impl Enemy {
    pub fn new(image: Rc<Image>, pos: Position) -> Self {
        Self { pos, image }
    }

    /// Strict axis-aligned overlap: boxes that only touch do not intersect.
    pub fn intersects(&self, bullet_pos: Position, half_width: f32, half_height: f32) -> bool {
        let dx = (self.pos.x - bullet_pos.x).abs();
        let dy = (self.pos.y - bullet_pos.y).abs();
        dx < Enemy::HALF_SIZE + half_width && dy < Enemy::HALF_SIZE + half_height
    }
}

// ── Enemy field ───────────────────────────────────────────────────────────────

impl EnemyField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the 10x5 grid, row by row.  Only the first call has an effect.
    pub fn populate(&mut self, image: Rc<Image>) {
        if self.populated {
            debug!("enemy field already populated");
            return;
        }
        for row in 0..EnemyField::ROWS {
            for col in 0..EnemyField::COLUMNS {
                let pos = Position::new(
                    EnemyField::ORIGIN.x + EnemyField::SPACING * col as f32,
                    EnemyField::ORIGIN.y + EnemyField::SPACING * row as f32,
                );
                self.enemies.push(Enemy::new(Rc::clone(&image), pos));
            }
        }
        self.populated = true;
    }

    /// Destroy the first enemy (in insertion order) the bullet overlaps.
    ///
    /// At most one enemy per call.  The bullet is marked collided only when
    /// something was hit.  Returns the destroyed enemy.
    pub fn resolve_collision(&mut self, bullet: Option<&mut Bullet>) -> Option<Enemy> {
        let bullet = bullet?;
        let index = self.enemies.iter().position(|enemy| {
            enemy.intersects(bullet.pos, Bullet::HALF_WIDTH, Bullet::HALF_HEIGHT)
        })?;

        let enemy = self.enemies.remove(index);
        bullet.mark_collided();
        debug!(
            x = enemy.pos.x,
            y = enemy.pos.y,
            remaining = self.enemies.len(),
            "enemy destroyed"
        );
        Some(enemy)
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Enemy> {
        self.enemies.iter()
    }
}
