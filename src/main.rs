use std::io::{stdout, BufWriter, Write};
use std::rc::Rc;
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, terminal, ExecutableCommand,
};
use tracing::info;

use invaders::config::{Cli, GameConfig};
use invaders::display::load_image;
use invaders::game::{run_loop, Game, StopHandle};
use invaders::input::{code_name, HeldKeys, Key, KeyDisposition};
use invaders::terminal::TerminalSurface;

/// Restore terminal state; also called from the panic hook.
fn restore_terminal(keyboard_enhanced: bool) {
    let mut out = stdout();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = execute!(out, cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

fn init_logging(config: &GameConfig) -> Result<()> {
    let log_file = std::fs::File::create(&config.log_file)
        .with_context(|| format!("cannot create log file {}", config.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let config = GameConfig::try_from(Cli::parse())?;
    init_logging(&config)?;
    info!(?config, "starting");

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;

    // Key-release events need the keyboard enhancement protocol (kitty,
    // Ghostty, ...).  Elsewhere releases are inferred by `HeldKeys`.  The
    // query reads from stdin, so it runs before the reader thread starts.
    let held = HeldKeys::for_terminal(terminal::supports_keyboard_enhancement());
    let keyboard_enhanced = held.reports_release();
    info!(keyboard_enhanced, "terminal capabilities");

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal(keyboard_enhanced);
        original_hook(panic_info);
    }));

    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    if keyboard_enhanced {
        out.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }

    // Blocking reads live on their own thread so the loop never waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &config, &rx, held);

    restore_terminal(keyboard_enhanced);
    let ticks = result?;
    info!(ticks, "exited");
    Ok(())
}

fn run<W: Write>(
    out: &mut W,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
    mut held: HeldKeys,
) -> Result<u64> {
    let (cols, rows) = terminal::size()?;
    let mut surface = TerminalSurface::new(out, config.width, config.height, cols, rows);
    let mut game = Game::new(config, Rc::new(load_image(&config.enemy_image)));
    let stop = StopHandle::new();

    let ticks = run_loop(&mut game, &mut surface, config.frame, &stop, |game, stop| {
        let tick = game.ticks();
        while let Ok(event) = rx.try_recv() {
            if let Event::Key(key) = event {
                deliver_key(game, &mut held, key, tick, stop);
            }
        }
        for key in held.expire(tick) {
            game.set_key(key.code(), false);
        }
    })?;
    Ok(ticks)
}

/// Hand one key event to the game; keys the game ignores get the host's
/// default handling (quitting).
fn deliver_key(game: &mut Game, held: &mut HeldKeys, key: KeyEvent, tick: u64, stop: &StopHandle) {
    let code = code_name(&key.code);
    let pressed = key.kind != KeyEventKind::Release;

    if game.set_key(&code, pressed) == KeyDisposition::Consumed {
        if let Some(k) = Key::from_code(&code) {
            if pressed {
                held.pressed(k, tick);
            } else {
                held.released(k);
            }
        }
        return;
    }

    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => stop.stop(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => stop.stop(),
        _ => {}
    }
}
