//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use swarm_defense::entities::{Enemy, EnemyKind, Game};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_CREW: Color = Color::Red;
const C_BEETLE: Color = Color::Green;
const C_LOBSTER: Color = Color::Red;
const C_PHANTOM: Color = Color::Magenta;
const C_PHASING: Color = Color::DarkGrey;
const C_IMPLODING: Color = Color::Yellow;
const C_POINTER: Color = Color::Cyan;
const C_DEBUG: Color = Color::DarkGreen;
const C_HINT: Color = Color::DarkGrey;

/// Glyph variants for the crew icons; a member's random frame picks one.
const CREW_GLYPHS: [&str; 5] = ["☺", "☻", "♠", "♣", "♦"];

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, game: &Game) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, game)?;
    draw_hud(out, game)?;

    for enemy in &game.enemy_pool {
        if !enemy.free {
            draw_enemy(out, enemy, game)?;
        }
    }

    draw_pointer(out, game)?;
    draw_controls_hint(out, game)?;

    if game.game_over {
        draw_messages(out, game)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, (game.height as u16).saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, game: &Game) -> std::io::Result<()> {
    let w = game.width as usize;
    let h = game.height as u16;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo((game.width as u16).saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, game: &Game) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>4}", game.score)))?;

    // One crew icon per remaining life — right of the score
    out.queue(style::SetForegroundColor(C_HUD_CREW))?;
    for (i, member) in game.crew.iter().take(game.lives as usize).enumerate() {
        let glyph = CREW_GLYPHS[(member.frame_x + member.frame_y) as usize % CREW_GLYPHS.len()];
        out.queue(cursor::MoveTo(13 + 2 * i as u16, 0))?;
        out.queue(Print(glyph))?;
    }

    if game.debug {
        let tag = "[debug]";
        out.queue(cursor::MoveTo(game.width as u16 - tag.len() as u16 - 1, 0))?;
        out.queue(style::SetForegroundColor(C_DEBUG))?;
        out.queue(Print(tag))?;
    }

    Ok(())
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Two-row glyph sprite for the current animation cell.
fn sprite_rows(enemy: &Enemy) -> ([&'static str; 2], Color) {
    match enemy.kind {
        EnemyKind::Beetle => match enemy.frame_x {
            0 => (["/ö\\", "\\_/"], C_BEETLE),
            1 => (["/o\\", "\\./"], C_IMPLODING),
            2 => ([".o.", " . "], C_IMPLODING),
            _ => ([" . ", "   "], C_HINT),
        },
        EnemyKind::Lobster => match enemy.frame_x {
            0 => (["\\Ö/", "}═{"], C_LOBSTER),
            1..=3 => (["\\Ö/", "}-{"], C_LOBSTER),
            4..=7 => (["\\ö/", "]-["], C_LOBSTER),
            8..=11 => (["*o*", "*.*"], C_IMPLODING),
            _ => ([" * ", " . "], C_HINT),
        },
        EnemyKind::Phantom => match enemy.frame_x {
            // Flying: wings flap with the frame
            0 | 2 => (["~Ö~", "^^^"], C_PHANTOM),
            1 => (["-Ö-", "vvv"], C_PHANTOM),
            // Phasing: faded, half-there
            3 | 5 => (["·ö·", "···"], C_PHASING),
            4 => ([" ö ", " · "], C_PHASING),
            // Imploding: expanding burst that fades out
            6..=9 => (["\\*/", "/*\\"], C_IMPLODING),
            10..=13 => ([" * ", "* *"], C_IMPLODING),
            _ => ([" · ", "   "], C_HINT),
        },
    }
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, game: &Game) -> std::io::Result<()> {
    let (rows, color) = sprite_rows(enemy);
    // Centre the 3-wide sprite inside the enemy's logical box
    let cx = enemy.x + enemy.width / 2.0 - 1.5;
    let cy = enemy.y + enemy.height / 2.0 - 1.0;

    out.queue(style::SetForegroundColor(color))?;
    for (i, row) in rows.iter().enumerate() {
        let ry = cy as i32 + i as i32;
        if in_play_area(game, cx as i32, ry) {
            out.queue(cursor::MoveTo(cx as u16, ry as u16))?;
            out.queue(Print(*row))?;
        }
    }

    if game.debug {
        draw_debug_box(out, enemy, game)?;
    }
    Ok(())
}

/// Debug overlay: the logical bounding box plus remaining lives.
fn draw_debug_box<W: Write>(out: &mut W, enemy: &Enemy, game: &Game) -> std::io::Result<()> {
    let left = enemy.x as i32;
    let top = enemy.y as i32;
    let right = (enemy.x + enemy.width) as i32;
    let bottom = (enemy.y + enemy.height) as i32;

    out.queue(style::SetForegroundColor(C_DEBUG))?;
    for (col, row, glyph) in [
        (left, top, "┌"),
        (right, top, "┐"),
        (left, bottom, "└"),
        (right, bottom, "┘"),
    ] {
        if in_play_area(game, col, row) {
            out.queue(cursor::MoveTo(col as u16, row as u16))?;
            out.queue(Print(glyph))?;
        }
    }

    let mx = (enemy.x + enemy.width / 2.0) as i32;
    let my = (enemy.y + enemy.height / 2.0) as i32;
    if in_play_area(game, mx, my) {
        out.queue(cursor::MoveTo(mx as u16, my as u16))?;
        out.queue(Print(format!("{}", enemy.lives)))?;
    }
    Ok(())
}

/// Rows 2 .. height-3 between the side walls are drawable.
fn in_play_area(game: &Game, col: i32, row: i32) -> bool {
    col >= 1 && col < game.width as i32 - 1 && row >= 2 && row < game.height as i32 - 2
}

// ── Pointer ───────────────────────────────────────────────────────────────────

fn draw_pointer<W: Write>(out: &mut W, game: &Game) -> std::io::Result<()> {
    let p = &game.pointer;
    if p.pressed && in_play_area(game, p.x as i32, p.y as i32) {
        out.queue(cursor::MoveTo(p.x as u16, p.y as u16))?;
        out.queue(style::SetForegroundColor(C_POINTER))?;
        out.queue(Print("✛"))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, game: &Game) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, (game.height as u16).saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("CLICK : Shoot   ENTER/R : New game   D : Debug   Q : Quit"))?;
    Ok(())
}

// ── Start / game-over overlay ─────────────────────────────────────────────────

fn draw_messages<W: Write>(out: &mut W, game: &Game) -> std::io::Result<()> {
    let cx = game.width as u16 / 2;
    let cy = game.height as u16 / 2;

    let headline = game.message1;
    out.queue(cursor::MoveTo(
        cx.saturating_sub(headline.chars().count() as u16 / 2),
        cy.saturating_sub(2),
    ))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(headline))?;

    let subline = game.message2;
    out.queue(cursor::MoveTo(
        cx.saturating_sub(subline.chars().count() as u16 / 2),
        cy,
    ))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(subline))?;

    let hint = "Press ENTER or R to start!";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(hint.chars().count() as u16 / 2),
        cy + 2,
    ))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;

    Ok(())
}
