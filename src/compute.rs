//! Pure game-logic functions.
//!
//! Every function operates on the plain data in `entities` plus an injected
//! RNG handle, so callers control determinism (tests use a seeded `StdRng`).
//! Per-enemy updates receive an explicit `FrameCtx` snapshot instead of
//! reading session state directly, and report their session-level effects
//! back through `UpdateEffects`.

use rand::Rng;

use crate::entities::{
    AudioCue, CrewIcon, Enemy, EnemyKind, Game, PhantomMode, Pointer, Rect,
};

// ── Session constants ────────────────────────────────────────────────────────

pub const POOL_SIZE: usize = 50;
pub const STARTING_LIVES: u32 = 15;
pub const WINNING_SCORE: u32 = 20;
/// Enemies spawned immediately on restart so the board is never empty.
pub const INITIAL_SPAWNS: usize = 2;
/// Milliseconds between spawn attempts.
pub const ENEMY_INTERVAL: f32 = 1000.0;
/// Milliseconds between animation ticks; gates every frame advance.
pub const SPRITE_INTERVAL: f32 = 150.0;

// ── Enemy constants ──────────────────────────────────────────────────────────

const BASE_WIDTH: f32 = 8.0;
const BASE_HEIGHT: f32 = 4.0;
/// While above this row, a fresh spawn is nudged down each frame so it
/// floats in instead of teleporting.
const FLOAT_IN_LIMIT: f32 = 2.0;
const FLOAT_IN_STEP: f32 = 2.0;
/// Phasing dive: the jump forward and the snapped-to downward speed.
const DIVE_OFFSET: f32 = 6.0;
const DIVE_SPEED: f32 = 2.0;

// ── Per-kind behavior tables ─────────────────────────────────────────────────

fn initial_lives(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::Beetle => 1,
        EnemyKind::Lobster => 3,
        EnemyKind::Phantom => 1,
    }
}

/// Final column of the kind's death animation.
fn last_frame(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::Beetle => 3,
        EnemyKind::Lobster => 14,
        EnemyKind::Phantom => 14,
    }
}

fn roll_speed_x(kind: EnemyKind, rng: &mut impl Rng) -> f32 {
    match kind {
        EnemyKind::Beetle | EnemyKind::Lobster => 0.0,
        EnemyKind::Phantom => rng.gen_range(-1.0..1.0),
    }
}

fn roll_speed_y(kind: EnemyKind, rng: &mut impl Rng) -> f32 {
    match kind {
        EnemyKind::Beetle => rng.gen_range(0.2..2.2),
        EnemyKind::Lobster | EnemyKind::Phantom => rng.gen_range(0.2..0.7),
    }
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Axis-aligned overlap test. Pure and symmetric; touching edges do not
/// count as an overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width
        && a.x + a.width > b.x
        && a.y < b.y + b.height
        && a.y + a.height > b.y
}

pub fn enemy_bounds(enemy: &Enemy) -> Rect {
    Rect {
        x: enemy.x,
        y: enemy.y,
        width: enemy.width,
        height: enemy.height,
    }
}

/// The pointer collides as a degenerate 1×1 box at its position.
pub fn pointer_bounds(pointer: &Pointer) -> Rect {
    Rect {
        x: pointer.x,
        y: pointer.y,
        width: 1.0,
        height: 1.0,
    }
}

// ── Per-frame context & effects ──────────────────────────────────────────────

/// Immutable snapshot of the session state an enemy update may read.
#[derive(Clone, Copy, Debug)]
pub struct FrameCtx {
    pub width: f32,
    pub height: f32,
    pub delta_ms: f32,
    pub sprite_update: bool,
    pub game_over: bool,
    pub pointer: Pointer,
}

/// Session-level effects produced by one enemy update, applied by the
/// caller before the next slot is updated (so `fired` is visible to the
/// rest of the pool within the same frame).
#[derive(Debug, Default)]
pub struct UpdateEffects {
    /// This enemy consumed the current press.
    pub fired: bool,
    /// Reached the bottom edge alive: costs a life, never scores.
    pub escaped: bool,
    /// Death animation completed: scores, never costs a life.
    pub defeated: bool,
    pub sounds: Vec<AudioCue>,
}

// ── Enemy lifecycle ──────────────────────────────────────────────────────────

/// Construct an idle pool slot. Size is rolled once here and kept for the
/// life of the slot; everything else is reinitialized by `start_enemy`.
pub fn new_enemy(kind: EnemyKind, rng: &mut impl Rng) -> Enemy {
    let size_modifier = rng.gen_range(0.8..1.4);
    Enemy {
        kind,
        width: BASE_WIDTH * size_modifier,
        height: BASE_HEIGHT * size_modifier,
        x: 0.0,
        y: 0.0,
        speed_x: 0.0,
        speed_y: 0.0,
        frame_x: 0,
        frame_y: 0,
        min_frame: 0,
        max_frame: 0,
        last_frame: last_frame(kind),
        lives: 0,
        free: true,
        mode: PhantomMode::Flying,
        switch_timer: 0.0,
        switch_interval: 0.0,
    }
}

/// Activate a slot: random column at the top edge (fully off-screen),
/// random sprite row, kind-specific speeds and lives. Phantoms additionally
/// re-roll their mode-switch interval and open in a random non-terminal
/// mode, which may return an entry cue.
pub fn start_enemy(enemy: &mut Enemy, width: f32, rng: &mut impl Rng) -> Option<AudioCue> {
    enemy.x = rng.gen_range(0.0..width);
    enemy.y = -enemy.height;
    enemy.frame_y = rng.gen_range(0..4);
    enemy.frame_x = 0;
    enemy.speed_x = roll_speed_x(enemy.kind, rng);
    enemy.speed_y = roll_speed_y(enemy.kind, rng);
    enemy.lives = initial_lives(enemy.kind);
    enemy.free = false;

    if enemy.kind == EnemyKind::Phantom {
        enemy.switch_timer = 0.0;
        enemy.switch_interval = rng.gen_range(1000.0..3000.0);
        let mode = if rng.gen_bool(0.5) {
            PhantomMode::Flying
        } else {
            PhantomMode::Phasing
        };
        return set_mode(enemy, mode, rng);
    }
    None
}

/// Cheap recycle: only the flag flips. Stale fields are overwritten by the
/// next `start_enemy`.
pub fn reset_enemy(enemy: &mut Enemy) {
    enemy.free = true;
}

pub fn is_alive(enemy: &Enemy) -> bool {
    enemy.lives >= 1
}

/// Register a pointer hit: pressed, not yet consumed this press, and
/// overlapping. Decrements lives (floored at zero) and consumes the press.
fn hit_check(enemy: &mut Enemy, ctx: &FrameCtx, fx: &mut UpdateEffects) {
    if ctx.pointer.pressed
        && !ctx.pointer.fired
        && !fx.fired
        && overlaps(&enemy_bounds(enemy), &pointer_bounds(&ctx.pointer))
    {
        enemy.lives = enemy.lives.saturating_sub(1);
        fx.fired = true;
    }
}

/// Enter a Phantom mode: sets the frame window, rewinds to its start, and
/// performs the mode's entry side effects.
pub fn set_mode(enemy: &mut Enemy, mode: PhantomMode, rng: &mut impl Rng) -> Option<AudioCue> {
    enemy.mode = mode;
    match mode {
        PhantomMode::Flying => {
            enemy.min_frame = 0;
            enemy.max_frame = 2;
            enemy.frame_x = enemy.min_frame;
            None
        }
        PhantomMode::Phasing => {
            enemy.min_frame = 3;
            enemy.max_frame = 5;
            enemy.frame_x = enemy.min_frame;
            enemy.speed_x = roll_speed_x(EnemyKind::Phantom, rng);
            enemy.speed_y = roll_speed_y(EnemyKind::Phantom, rng);
            None
        }
        PhantomMode::Imploding => {
            enemy.min_frame = 6;
            enemy.max_frame = enemy.last_frame + 1;
            enemy.frame_x = enemy.min_frame;
            Some(match rng.gen_range(0..4) {
                0 => AudioCue::Boom1,
                1 => AudioCue::Boom2,
                2 => AudioCue::Boom3,
                _ => AudioCue::Boom4,
            })
        }
    }
}

/// Cycle the animation column within the current frame window, one step per
/// animation tick.
fn handle_frames(enemy: &mut Enemy, ctx: &FrameCtx) {
    if ctx.sprite_update {
        if enemy.frame_x < enemy.max_frame {
            enemy.frame_x += 1;
        } else {
            enemy.frame_x = enemy.min_frame;
        }
    }
}

// ── Per-enemy update ─────────────────────────────────────────────────────────

/// Advance one slot by one frame: shared motion and recycle checks first,
/// then the kind's own behavior. Free slots are untouched.
pub fn update_enemy(enemy: &mut Enemy, ctx: &FrameCtx, rng: &mut impl Rng) -> UpdateEffects {
    let mut fx = UpdateEffects::default();
    if enemy.free {
        return fx;
    }

    // Float in from above the viewport
    if enemy.y < FLOAT_IN_LIMIT {
        enemy.y += FLOAT_IN_STEP;
    }

    // Keep the enemy from sliding fully past the right edge
    if enemy.x > ctx.width - enemy.width {
        enemy.x = ctx.width - enemy.width;
    }

    enemy.x += enemy.speed_x;
    enemy.y += enemy.speed_y;

    // Escaped out the bottom
    if enemy.y > ctx.height {
        reset_enemy(enemy);
        fx.escaped = true;
        return fx;
    }

    // Death animation: advance on ticks; past the last frame the slot is
    // recycled and the kill scores.
    if !is_alive(enemy) && ctx.sprite_update {
        enemy.frame_x += 1;
        if enemy.frame_x > enemy.last_frame {
            reset_enemy(enemy);
            fx.defeated = true;
            return fx;
        }
    }

    match enemy.kind {
        EnemyKind::Beetle => {
            if is_alive(enemy) {
                hit_check(enemy, ctx, &mut fx);
            }
        }
        EnemyKind::Lobster => update_lobster(enemy, ctx, &mut fx),
        EnemyKind::Phantom => update_phantom(enemy, ctx, rng, &mut fx),
    }
    fx
}

/// The lobster shows accumulated damage by capping its frame advance at a
/// threshold gated by remaining lives.
fn update_lobster(enemy: &mut Enemy, ctx: &FrameCtx, fx: &mut UpdateEffects) {
    if !is_alive(enemy) {
        return;
    }
    enemy.max_frame = match enemy.lives {
        l if l >= 3 => 0,
        2 => 3,
        _ => 7,
    };
    hit_check(enemy, ctx, fx);
    if enemy.frame_x < enemy.max_frame && ctx.sprite_update {
        enemy.frame_x += 1;
    }
}

fn update_phantom(enemy: &mut Enemy, ctx: &FrameCtx, rng: &mut impl Rng, fx: &mut UpdateEffects) {
    match enemy.mode {
        PhantomMode::Flying => {
            hit_check(enemy, ctx, fx);
            if !is_alive(enemy) && enemy.mode != PhantomMode::Imploding {
                if let Some(cue) = set_mode(enemy, PhantomMode::Imploding, rng) {
                    fx.sounds.push(cue);
                }
            }
            handle_frames(enemy, ctx);
            // Bounded random walk while flying
            enemy.speed_x = roll_speed_x(EnemyKind::Phantom, rng);
            enemy.speed_y = roll_speed_y(EnemyKind::Phantom, rng);
        }
        PhantomMode::Phasing => {
            handle_frames(enemy, ctx);
            // Unhittable, but a press on it makes it dive straight down
            if ctx.pointer.pressed
                && overlaps(&enemy_bounds(enemy), &pointer_bounds(&ctx.pointer))
            {
                enemy.y += DIVE_OFFSET;
                enemy.speed_x = 0.0;
                enemy.speed_y = DIVE_SPEED;
                fx.sounds.push(AudioCue::Slide);
            }
        }
        PhantomMode::Imploding => {}
    }

    // Bounce off either side wall, whatever the mode
    if enemy.x <= 0.0 || enemy.x >= ctx.width - enemy.width {
        enemy.speed_x = -enemy.speed_x;
    }

    // Timed alternation between Flying and Phasing while alive
    if is_alive(enemy) {
        if enemy.switch_timer < enemy.switch_interval {
            enemy.switch_timer += ctx.delta_ms;
        } else {
            enemy.switch_timer = 0.0;
            let next = if enemy.mode == PhantomMode::Flying {
                PhantomMode::Phasing
            } else {
                PhantomMode::Flying
            };
            if let Some(cue) = set_mode(enemy, next, rng) {
                fx.sounds.push(cue);
            }
        }
    }
}

// ── Pool ─────────────────────────────────────────────────────────────────────

/// First idle slot, or `None` when the pool is saturated.
pub fn first_free(pool: &[Enemy]) -> Option<usize> {
    pool.iter().position(|e| e.free)
}

/// One spawn attempt: silently skipped when no slot is free.
pub fn spawn_enemy(game: &mut Game, rng: &mut impl Rng) {
    if let Some(i) = first_free(&game.enemy_pool) {
        let width = game.width;
        if let Some(cue) = start_enemy(&mut game.enemy_pool[i], width, rng) {
            game.sounds.push(cue);
        }
    }
}

// ── Session ──────────────────────────────────────────────────────────────────

/// Build a fresh session in the not-started state. The pool is constructed
/// once here; the current configuration fills it uniformly with Phantoms,
/// though nothing in the pool logic depends on that.
pub fn init_game(width: f32, height: f32, rng: &mut impl Rng) -> Game {
    let enemy_pool = (0..POOL_SIZE)
        .map(|_| new_enemy(EnemyKind::Phantom, rng))
        .collect();
    Game {
        width,
        height,
        enemy_pool,
        enemy_timer: 0.0,
        sprite_timer: 0.0,
        sprite_update: false,
        score: 0,
        lives: 0,
        game_over: true,
        crew: Vec::new(),
        pointer: Pointer {
            x: -1.0,
            y: -1.0,
            pressed: false,
            fired: false,
        },
        sounds: Vec::new(),
        message1: "Run!",
        message2: "Or get eaten!",
        debug: false,
    }
}

/// Start or restart a round: counters reset, every slot recycled, a couple
/// of enemies spawned immediately.
pub fn start_game(game: &mut Game, rng: &mut impl Rng) {
    game.score = 0;
    game.lives = STARTING_LIVES;
    game.game_over = false;
    game.enemy_timer = 0.0;
    generate_crew(game, rng);
    for enemy in &mut game.enemy_pool {
        reset_enemy(enemy);
    }
    for _ in 0..INITIAL_SPAWNS {
        spawn_enemy(game, rng);
    }
    game.sounds.push(AudioCue::NewGame);
}

/// Pick a random icon look for each remaining life.
fn generate_crew(game: &mut Game, rng: &mut impl Rng) {
    game.crew = (0..game.lives)
        .map(|_| CrewIcon {
            frame_x: rng.gen_range(0..5),
            frame_y: rng.gen_range(0..5),
        })
        .collect();
}

pub fn resize(game: &mut Game, width: f32, height: f32) {
    game.width = width;
    game.height = height;
}

// ── Input operations ─────────────────────────────────────────────────────────

/// Press-down: moves the pointer and re-arms the per-press kill latch.
pub fn pointer_down(game: &mut Game, x: f32, y: f32) {
    game.pointer.x = x;
    game.pointer.y = y;
    game.pointer.pressed = true;
    game.pointer.fired = false;
}

pub fn pointer_up(game: &mut Game, x: f32, y: f32) {
    game.pointer.x = x;
    game.pointer.y = y;
    game.pointer.pressed = false;
}

/// Position-only update while the button is held (drag).
pub fn pointer_moved(game: &mut Game, x: f32, y: f32) {
    game.pointer.x = x;
    game.pointer.y = y;
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the whole session by one frame: animation tick, spawn cadence,
/// pool update (last slot to first), then end-condition evaluation.
pub fn tick(game: &mut Game, delta_ms: f32, rng: &mut impl Rng) {
    advance_sprite_timer(game, delta_ms);
    if !game.game_over {
        advance_enemy_timer(game, delta_ms, rng);
    }

    for i in (0..game.enemy_pool.len()).rev() {
        let ctx = FrameCtx {
            width: game.width,
            height: game.height,
            delta_ms,
            sprite_update: game.sprite_update,
            game_over: game.game_over,
            pointer: game.pointer,
        };
        let fx = update_enemy(&mut game.enemy_pool[i], &ctx, rng);
        apply_effects(game, fx);
    }

    evaluate_end_conditions(game);
}

/// Flip `sprite_update` true for exactly one frame per interval so every
/// enemy advances its animation in lockstep, whatever the render rate.
fn advance_sprite_timer(game: &mut Game, delta_ms: f32) {
    if game.sprite_timer < SPRITE_INTERVAL {
        game.sprite_timer += delta_ms;
        game.sprite_update = false;
    } else {
        game.sprite_timer = 0.0;
        game.sprite_update = true;
    }
}

fn advance_enemy_timer(game: &mut Game, delta_ms: f32, rng: &mut impl Rng) {
    if game.enemy_timer < ENEMY_INTERVAL {
        game.enemy_timer += delta_ms;
    } else {
        game.enemy_timer = 0.0;
        spawn_enemy(game, rng);
    }
}

/// Fold one enemy's effects back into the session. Score and lives freeze
/// once the round is over; the fired latch always propagates so later slots
/// in the same frame see it.
fn apply_effects(game: &mut Game, fx: UpdateEffects) {
    if fx.fired {
        game.pointer.fired = true;
    }
    if fx.escaped && !game.game_over {
        game.lives = game.lives.saturating_sub(1);
        game.sounds.push(AudioCue::Scream);
    }
    if fx.defeated && !game.game_over {
        game.score += 1;
    }
    game.sounds.extend(fx.sounds);
}

/// Terminal-condition check; a no-op once the round has ended, so the
/// message and cue fire exactly once.
pub fn evaluate_end_conditions(game: &mut Game) {
    if game.game_over {
        return;
    }
    if game.lives < 1 {
        game.game_over = true;
        game.message1 = "Aargh!";
        game.message2 = "The crew was eaten";
        game.sounds.push(AudioCue::Lose);
    } else if game.score >= WINNING_SCORE {
        game.game_over = true;
        game.message1 = "Well done!";
        game.message2 = "You escaped the swarm!";
        game.sounds.push(AudioCue::Win);
    }
}
