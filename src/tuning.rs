//! Data-driven game balance
//!
//! Every constant the simulation reads comes through [`Tuning`]. Defaults match
//! `crate::consts`; a JSON file can override any subset of fields.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Physics category bits used to classify contacts
///
/// `grass` tags the ground layer and `hay` the obstacle row. They are
/// independent values; configuring them equal makes the two layers share a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsCategories {
    pub player: u32,
    pub grass: u32,
    pub hay: u32,
    pub gem: u32,
}

impl Default for PhysicsCategories {
    fn default() -> Self {
        Self {
            player: 0x1 << 0,
            grass: 0x1 << 1,
            hay: 0x1 << 2,
            gem: 0x1 << 3,
        }
    }
}

/// Shape and placement of one terrain layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerTuning {
    /// Width and height of every segment in the layer
    pub segment_size: Vec2,
    /// Vertical offset of segments while the layer sits low
    pub low_height: f32,
    /// Vertical offset of segments while the layer sits high
    pub high_height: f32,
    /// Whether gaps in this layer get a gem above them
    pub spawns_gems: bool,
}

impl Default for LayerTuning {
    fn default() -> Self {
        Self {
            segment_size: Vec2::new(64.0, 64.0),
            low_height: 0.0,
            high_height: 100.0,
            spawns_gems: true,
        }
    }
}

impl LayerTuning {
    /// Default decorative obstacle row (hay bales above the ground)
    pub fn obstacle_row() -> Self {
        Self {
            segment_size: Vec2::new(96.0, 24.0),
            low_height: 260.0,
            high_height: 296.0,
            spawns_gems: false,
        }
    }
}

/// Game balance and layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// RNG seed for terrain generation
    pub seed: u64,
    /// Visible frame (width, height)
    pub frame_size: Vec2,

    // === Speed ===
    pub starting_scroll_speed: f32,
    pub scroll_speed_increment: f32,
    pub expected_frame_time: f64,
    pub max_frame_elapsed: f64,

    // === Score ===
    pub score_interval: f64,
    pub gem_bonus: u32,

    // === Terrain generation ===
    pub spawn_roll_range: u32,
    pub gap_chance: u32,
    pub level_toggle_chance: u32,
    pub gap_score_gate: u32,
    pub level_toggle_score_gate: u32,
    pub gap_speed_factor: f32,
    pub segment_margin: f32,
    pub gem_max_lift: u32,
    pub gem_size: Vec2,
    pub ground: LayerTuning,
    /// Second terrain row; `None` disables it
    pub obstacles: Option<LayerTuning>,

    // === Player ===
    pub player_size: Vec2,
    pub jump_impulse: f32,
    pub airborne_velocity: f32,
    pub landing_velocity: f32,
    pub max_tilt_degrees: f32,
    pub stance_offset: f32,

    pub categories: PhysicsCategories,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            frame_size: Vec2::new(568.0, 320.0),

            starting_scroll_speed: STARTING_SCROLL_SPEED,
            scroll_speed_increment: SCROLL_SPEED_INCREMENT,
            expected_frame_time: EXPECTED_FRAME_TIME,
            max_frame_elapsed: MAX_FRAME_ELAPSED,

            score_interval: SCORE_INTERVAL,
            gem_bonus: GEM_BONUS,

            spawn_roll_range: SPAWN_ROLL_RANGE,
            gap_chance: GAP_CHANCE,
            level_toggle_chance: LEVEL_TOGGLE_CHANCE,
            gap_score_gate: GAP_SCORE_GATE,
            level_toggle_score_gate: LEVEL_TOGGLE_SCORE_GATE,
            gap_speed_factor: GAP_SPEED_FACTOR,
            segment_margin: SEGMENT_MARGIN,
            gem_max_lift: GEM_MAX_LIFT,
            gem_size: Vec2::new(24.0, 24.0),
            ground: LayerTuning::default(),
            obstacles: Some(LayerTuning::obstacle_row()),

            player_size: Vec2::new(40.0, 64.0),
            jump_impulse: JUMP_IMPULSE,
            airborne_velocity: AIRBORNE_VELOCITY,
            landing_velocity: LANDING_VELOCITY,
            max_tilt_degrees: MAX_TILT_DEGREES,
            stance_offset: STANCE_OFFSET,

            categories: PhysicsCategories::default(),
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a starter file)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        positive("frame_size.x", self.frame_size.x)?;
        positive("frame_size.y", self.frame_size.y)?;
        positive("ground.segment_size.x", self.ground.segment_size.x)?;
        positive("ground.segment_size.y", self.ground.segment_size.y)?;
        if let Some(row) = &self.obstacles {
            positive("obstacles.segment_size.x", row.segment_size.x)?;
            positive("obstacles.segment_size.y", row.segment_size.y)?;
        }
        positive("player_size.x", self.player_size.x)?;
        positive("player_size.y", self.player_size.y)?;
        positive("expected_frame_time", self.expected_frame_time as f32)?;
        positive("max_frame_elapsed", self.max_frame_elapsed as f32)?;
        if self.spawn_roll_range == 0 {
            return Err(TuningError::Invalid {
                field: "spawn_roll_range",
                reason: "must be at least 1".to_string(),
            });
        }
        // Terrain fill advances by width + margin + gap per segment; none may shrink it
        for (field, value) in [
            ("segment_margin", self.segment_margin),
            ("starting_scroll_speed", self.starting_scroll_speed),
            ("scroll_speed_increment", self.scroll_speed_increment),
            ("gap_speed_factor", self.gap_speed_factor),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("must not be negative, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Frame width (the right edge terrain must always reach)
    #[inline]
    pub fn frame_width(&self) -> f32 {
        self.frame_size.x
    }

    /// Tilt limit in radians
    #[inline]
    pub fn max_tilt(&self) -> f32 {
        self.max_tilt_degrees.to_radians()
    }
}
