use std::rc::Rc;
use std::time::Duration;

use invaders::config::{Cli, GameConfig};
use invaders::entities::*;
use invaders::error::GameError;
use invaders::game::*;
use invaders::surface::{DrawCommand, Recorder};

use clap::Parser;

fn make_game() -> Game {
    Game::new(&GameConfig::default(), Rc::new(Image::unloaded("type_a.txt")))
}

fn position_of(commands: &[DrawCommand], pred: impl Fn(&DrawCommand) -> bool) -> usize {
    commands.iter().position(pred).expect("command drawn")
}

// ── Game::new ─────────────────────────────────────────────────────────────────

#[test]
fn new_game_layout() {
    let game = make_game();
    assert_eq!(game.player.pos, Position::new(400.0, 560.0));
    assert_eq!(game.player.speed, 5.0);
    assert!(game.player.bullet().is_none());
    assert_eq!(game.enemies.len(), 50);
    assert_eq!(game.ticks(), 0);
}

// ── Game::tick ────────────────────────────────────────────────────────────────

#[test]
fn tick_draws_in_fixed_order() {
    let mut game = make_game();
    game.set_key("Space", true);
    let mut rec = Recorder::new();
    game.tick(&mut rec).unwrap();
    let commands = rec.take();

    assert_eq!(
        commands.first(),
        Some(&DrawCommand::ClearRect { x: 0.0, y: 0.0, width: 800.0, height: 600.0 })
    );
    let bullet = position_of(&commands, |c| matches!(c, DrawCommand::StrokeLine { .. }));
    let ship = position_of(&commands, |c| matches!(c, DrawCommand::FillPolygon(_)));
    let first_enemy = position_of(&commands, |c| matches!(c, DrawCommand::DrawImage { .. }));
    assert!(bullet < ship);
    assert!(ship < first_enemy);
    assert_eq!(commands.last(), Some(&DrawCommand::Present));

    let enemies = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::DrawImage { .. }))
        .count();
    assert_eq!(enemies, 50);
}

#[test]
fn tick_moves_player_from_input() {
    let mut game = make_game();
    let mut rec = Recorder::new();
    game.set_key("ArrowRight", true);
    game.tick(&mut rec).unwrap();
    game.tick(&mut rec).unwrap();
    assert_eq!(game.player.pos.x, 410.0);

    game.set_key("ArrowLeft", true);
    game.tick(&mut rec).unwrap();
    assert_eq!(game.player.pos.x, 410.0);
    assert_eq!(game.ticks(), 3);
}

#[test]
fn held_fire_destroys_bottom_enemy_of_column() {
    let mut game = make_game();
    game.player.pos.x = 50.0;
    game.set_key("Space", true);
    let mut rec = Recorder::new();

    // From y = 560 the bullet reaches the bottom row (y = 306) on tick 15.
    for _ in 0..14 {
        game.tick(&mut rec).unwrap();
    }
    assert_eq!(game.enemies.len(), 50);

    game.tick(&mut rec).unwrap();
    assert_eq!(game.enemies.len(), 49);
    assert!(game.enemies.iter().all(|e| e.pos != Position::new(50.0, 306.0)));
    assert!(game.player.bullet().map(|b| b.collided).unwrap_or(false));

    game.tick(&mut rec).unwrap();
    assert!(game.player.bullet().is_none());

    game.tick(&mut rec).unwrap();
    assert!(game.player.bullet().is_some());
    assert_eq!(game.enemies.len(), 49);
}

#[test]
fn bullet_is_drawn_once_more_after_a_hit() {
    let mut game = make_game();
    game.player.pos.x = 50.0;
    game.set_key("Space", true);
    let mut rec = Recorder::new();
    for _ in 0..15 {
        game.tick(&mut rec).unwrap();
    }
    assert_eq!(game.enemies.len(), 49);
    rec.take();

    // The hit bullet is released this tick but still drawn 15 px higher.
    game.tick(&mut rec).unwrap();
    assert!(game.player.bullet().is_none());
    let commands = rec.take();
    let lines = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::StrokeLine { .. }))
        .count();
    assert_eq!(lines, 1);
    assert!(commands.contains(&DrawCommand::Translate { dx: 50.0, dy: 320.0 }));

    // Next tick a fresh bullet is the only one drawn.
    game.tick(&mut rec).unwrap();
    let commands = rec.take();
    let lines = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::StrokeLine { .. }))
        .count();
    assert_eq!(lines, 1);
    assert!(commands.contains(&DrawCommand::Translate { dx: 50.0, dy: 545.0 }));
}

#[test]
fn destroyed_enemy_is_not_drawn() {
    let mut game = make_game();
    game.player.pos.x = 50.0;
    game.set_key("Space", true);
    let mut rec = Recorder::new();
    for _ in 0..15 {
        game.tick(&mut rec).unwrap();
    }
    rec.take();

    game.set_key("Space", false);
    game.tick(&mut rec).unwrap();
    let drawn = rec
        .take()
        .iter()
        .filter(|c| matches!(c, DrawCommand::DrawImage { .. }))
        .count();
    assert_eq!(drawn, 49);
}

// ── run_loop ──────────────────────────────────────────────────────────────────

#[test]
fn run_loop_stops_on_request() {
    let mut game = make_game();
    let mut rec = Recorder::new();
    let stop = StopHandle::new();

    let ran = run_loop(&mut game, &mut rec, Duration::ZERO, &stop, |game, stop| {
        if game.ticks() == 3 {
            stop.stop();
        }
    })
    .unwrap();

    assert_eq!(ran, 3);
    assert_eq!(game.ticks(), 3);
    assert!(stop.is_stopped());
}

#[test]
fn run_loop_with_stopped_handle_never_ticks() {
    let mut game = make_game();
    let mut rec = Recorder::new();
    let stop = StopHandle::new();
    stop.stop();

    let ran = run_loop(&mut game, &mut rec, Duration::ZERO, &stop, |_, _| {}).unwrap();
    assert_eq!(ran, 0);
    assert!(rec.commands.is_empty());
}

#[test]
fn run_loop_delivers_input_before_each_tick() {
    let mut game = make_game();
    let mut rec = Recorder::new();
    let stop = StopHandle::new();

    run_loop(&mut game, &mut rec, Duration::from_millis(1), &stop, |game, stop| {
        match game.ticks() {
            0 => {
                game.set_key("ArrowLeft", true);
            }
            2 => stop.stop(),
            _ => {}
        }
    })
    .unwrap();

    assert_eq!(game.player.pos.x, 390.0);
}

#[test]
fn stop_handle_clones_share_state() {
    let stop = StopHandle::new();
    let remote = stop.clone();
    assert!(!stop.is_stopped());
    remote.stop();
    assert!(stop.is_stopped());
}

// ── Config ────────────────────────────────────────────────────────────────────

#[test]
fn default_config_is_valid() {
    let config = GameConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.frame, Duration::from_millis(33));
    assert_eq!(config.player_start(), Position::new(400.0, 560.0));
}

#[test]
fn cli_defaults_match_config_defaults() {
    let cli = Cli::try_parse_from(["invaders"]).unwrap();
    assert_eq!(GameConfig::try_from(cli).unwrap(), GameConfig::default());
}

#[test]
fn cli_flags_override_defaults() {
    let cli = Cli::try_parse_from([
        "invaders",
        "--width",
        "1024",
        "--frame-ms",
        "16",
        "--enemy-image",
        "sprites/b.txt",
    ])
    .unwrap();
    let config = GameConfig::try_from(cli).unwrap();
    assert_eq!(config.width, 1024.0);
    assert_eq!(config.frame, Duration::from_millis(16));
    assert_eq!(config.enemy_image.to_str(), Some("sprites/b.txt"));
}

#[test]
fn invalid_configs_are_rejected() {
    let narrow = GameConfig { width: 40.0, ..GameConfig::default() };
    assert!(matches!(narrow.validate(), Err(GameError::InvalidConfig(_))));

    let flat = GameConfig { height: 0.0, ..GameConfig::default() };
    assert!(matches!(flat.validate(), Err(GameError::InvalidConfig(_))));

    let frozen = GameConfig { frame: Duration::ZERO, ..GameConfig::default() };
    assert!(matches!(frozen.validate(), Err(GameError::InvalidConfig(_))));

    let nan = GameConfig { player_speed: f32::NAN, ..GameConfig::default() };
    assert!(matches!(nan.validate(), Err(GameError::InvalidConfig(_))));

    let cli = Cli::try_parse_from(["invaders", "--frame-ms", "0"]).unwrap();
    assert!(GameConfig::try_from(cli).is_err());
}
