//! Witch Run - an endless runner core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain scroller, player, game state)
//! - `scene`: Rendering/physics collaborator surface and a headless backend
//! - `hud`: Score label and menu overlay text
//! - `tuning`: Data-driven game balance

pub mod hud;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use hud::{HudText, MenuOverlay, format_score};
pub use scene::{HeadlessScene, Scene, VisualHandle, VisualKind};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Nominal frame time the scroll speed is expressed against (60 Hz)
    pub const EXPECTED_FRAME_TIME: f64 = 1.0 / 60.0;
    /// Largest real-time gap a single tick will scroll for
    pub const MAX_FRAME_ELAPSED: f64 = 0.5;

    /// Scroll speed at the start of a run (points per nominal frame)
    pub const STARTING_SCROLL_SPEED: f32 = 5.0;
    /// Added to the scroll speed every running tick
    pub const SCROLL_SPEED_INCREMENT: f32 = 0.01;

    /// Seconds between distance score awards
    pub const SCORE_INTERVAL: f64 = 1.0;
    /// Score for picking up a gem
    pub const GEM_BONUS: u32 = 50;

    /// Spawn rolls are drawn uniformly from 0..SPAWN_ROLL_RANGE
    pub const SPAWN_ROLL_RANGE: u32 = 99;
    pub const GAP_CHANCE: u32 = 2;
    pub const LEVEL_TOGGLE_CHANCE: u32 = 4;
    /// Gaps only open once the score is above this
    pub const GAP_SCORE_GATE: u32 = 10;
    /// Height changes only happen once the score is above this
    pub const LEVEL_TOGGLE_SCORE_GATE: u32 = 20;
    /// Gap width per unit of scroll speed
    pub const GAP_SPEED_FACTOR: f32 = 20.0;
    /// Horizontal spacing between neighbouring segments
    pub const SEGMENT_MARGIN: f32 = 1.0;
    /// Gems float up to this far above the jump line
    pub const GEM_MAX_LIFT: u32 = 150;

    /// Upward velocity applied by a jump
    pub const JUMP_IMPULSE: f32 = 260.0;
    /// Vertical speed beyond which the player counts as airborne
    pub const AIRBORNE_VELOCITY: f32 = 100.0;
    /// Landing sparks only fire below this vertical speed
    pub const LANDING_VELOCITY: f32 = 100.0;
    /// Tipping past this many degrees ends the run
    pub const MAX_TILT_DEGREES: f32 = 85.0;
    /// Height of the player's feet above the bottom of the frame at reset
    pub const STANCE_OFFSET: f32 = 64.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
