//! All game entity types — pure data, no logic.

/// An axis-aligned bounding box in viewport units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyKind {
    /// Drops straight down; one hit kills it.
    Beetle,
    /// Slow and armored: three hits, damage shown through its frame cap.
    Lobster,
    /// Drifts sideways and alternates between flying and an unhittable
    /// phasing mode.
    Phantom,
}

/// Behavioral mode for `EnemyKind::Phantom`. Exactly one mode is active at
/// a time; `Imploding` is terminal and only a killing hit enters it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PhantomMode {
    Flying,
    Phasing,
    Imploding,
}

/// Sound identifiers the core queues for the platform layer to play.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AudioCue {
    NewGame,
    Boom1,
    Boom2,
    Boom3,
    Boom4,
    Slide,
    Win,
    Lose,
    Scream,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Shared pointer record, written by the input layer and read by the core.
///
/// `fired` latches after the first registered kill of a press and only
/// clears on the next press-down, so one press kills at most one enemy.
#[derive(Clone, Copy, Debug)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    pub pressed: bool,
    pub fired: bool,
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// One reusable pool slot. Constructed once per session; `free == true`
/// means the slot is idle and its mutable fields hold stale data until the
/// next activation reinitializes them.
#[derive(Clone, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Scaled size, fixed for the life of the slot.
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    /// Animation column, and the row picked at activation.
    pub frame_x: u32,
    pub frame_y: u32,
    /// Frame window the current behavior cycles through.
    pub min_frame: u32,
    pub max_frame: u32,
    /// Final column of the death animation.
    pub last_frame: u32,
    pub lives: u32,
    pub free: bool,
    /// Phantom-only mode machine; other kinds never read these.
    pub mode: PhantomMode,
    pub switch_timer: f32,
    pub switch_interval: f32,
}

// ── HUD ───────────────────────────────────────────────────────────────────────

/// One remaining-life icon; the frames pick a look for variety.
#[derive(Clone, Copy, Debug)]
pub struct CrewIcon {
    pub frame_x: u32,
    pub frame_y: u32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire session state. The pool is fixed-capacity: slots are recycled
/// by flipping `free`, never allocated or dropped mid-session.
#[derive(Clone, Debug)]
pub struct Game {
    pub width: f32,
    pub height: f32,
    pub enemy_pool: Vec<Enemy>,
    /// Accumulates toward the spawn interval.
    pub enemy_timer: f32,
    /// Accumulates toward the animation interval; `sprite_update` flips true
    /// for exactly one frame per interval and gates all frame advances.
    pub sprite_timer: f32,
    pub sprite_update: bool,
    pub score: u32,
    pub lives: u32,
    pub game_over: bool,
    pub crew: Vec<CrewIcon>,
    pub pointer: Pointer,
    /// Cues queued this frame, drained by the platform layer.
    pub sounds: Vec<AudioCue>,
    pub message1: &'static str,
    pub message2: &'static str,
    pub debug: bool,
}
