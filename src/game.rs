//! The game aggregate and its fixed-interval loop.

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::entities::{EnemyField, Image, Player};
use crate::error::Result;
use crate::input::{InputState, KeyDisposition};
use crate::surface::Surface;

/// Everything one session owns.  Built once, then driven by `tick`.
#[derive(Debug)]
pub struct Game {
    pub input: InputState,
    pub player: Player,
    pub enemies: EnemyField,
    pub width: f32,
    pub height: f32,
    ticks: u64,
    cleared: bool,
}

impl Game {
    pub fn new(config: &GameConfig, enemy_image: Rc<Image>) -> Self {
        let mut enemies = EnemyField::new();
        enemies.populate(enemy_image);
        Self {
            input: InputState::new(),
            player: Player::new(config.player_start(), config.player_speed, config.width),
            enemies,
            width: config.width,
            height: config.height,
            ticks: 0,
            cleared: false,
        }
    }

    pub fn set_key(&mut self, code: &str, pressed: bool) -> KeyDisposition {
        self.input.set_key(code, pressed)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// One frame, always in this order: clear, player (simulate then draw),
    /// collision, enemies.
    pub fn tick<S: Surface>(&mut self, out: &mut S) -> std::io::Result<()> {
        self.ticks += 1;

        out.clear_rect(0.0, 0.0, self.width, self.height)?;

        self.player.simulate(&self.input);
        self.player.render(out)?;

        self.enemies.resolve_collision(self.player.bullet_mut());
        if self.enemies.is_empty() && !self.cleared {
            self.cleared = true;
            info!(tick = self.ticks, "field cleared");
        }

        self.enemies.render(out)?;
        out.present()
    }
}

// ── Loop ──────────────────────────────────────────────────────────────────────

/// Cancellation flag shared between the loop and whoever wants it stopped.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Tick until `stop` is raised.  Returns the number of ticks run.
///
/// `before_tick` is the host's chance to deliver pending input (and to raise
/// `stop`).  The wait between ticks is always `interval`, however long the
/// tick itself took.
pub fn run_loop<S, F>(
    game: &mut Game,
    out: &mut S,
    interval: Duration,
    stop: &StopHandle,
    mut before_tick: F,
) -> Result<u64>
where
    S: Surface,
    F: FnMut(&mut Game, &StopHandle),
{
    let mut ran = 0;
    info!(interval_ms = interval.as_millis() as u64, "loop started");
    loop {
        if stop.is_stopped() {
            break;
        }
        before_tick(game, stop);
        if stop.is_stopped() {
            break;
        }

        game.tick(out)?;
        ran += 1;

        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }
    debug!(ticks = ran, "loop stopped");
    Ok(ran)
}
