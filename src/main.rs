mod display;

use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal,
    ExecutableCommand,
};
use rand::thread_rng;

use swarm_defense::compute::{
    init_game, pointer_down, pointer_moved, pointer_up, resize, start_game, tick,
};
use swarm_defense::entities::{AudioCue, Game};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// A terminal has no mixer; the bell stands in for the session-level cues
/// and the rest stay visual-only (the sprites already show boom/slide).
fn play_cue<W: Write>(out: &mut W, cue: AudioCue) -> std::io::Result<()> {
    match cue {
        AudioCue::NewGame | AudioCue::Win | AudioCue::Lose => out.write_all(b"\x07"),
        _ => Ok(()),
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the user quits. One iteration per frame: drain input events,
/// advance the session by the measured elapsed time, render, play cues.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let mut last_time = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. })
                    if kind == KeyEventKind::Press =>
                {
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c')
                            if modifiers.contains(KeyModifiers::CONTROL) =>
                        {
                            return Ok(());
                        }
                        KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => {
                            start_game(game, &mut rng);
                        }
                        KeyCode::Char('d') | KeyCode::Char('D') => {
                            game.debug = !game.debug;
                        }
                        _ => {}
                    }
                }
                Event::Mouse(MouseEvent { kind, column, row, .. }) => match kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        pointer_down(game, column as f32, row as f32);
                    }
                    MouseEventKind::Up(MouseButton::Left) => {
                        pointer_up(game, column as f32, row as f32);
                    }
                    MouseEventKind::Drag(MouseButton::Left) => {
                        pointer_moved(game, column as f32, row as f32);
                    }
                    _ => {}
                },
                Event::Resize(width, height) => {
                    resize(game, width as f32, height as f32);
                }
                _ => {}
            }
        }

        // ── Advance the session by the real elapsed time ──────────────────────
        let now = Instant::now();
        let delta_ms = now.duration_since(last_time).as_secs_f32() * 1000.0;
        last_time = now;
        tick(game, delta_ms, &mut rng);

        display::render(out, game)?;

        for cue in game.sounds.drain(..) {
            play_cue(out, cue)?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let (width, height) = terminal::size()?;
    let mut game = init_game(width as f32, height as f32, &mut rng);
    game_loop(out, &mut game, rx)
}
