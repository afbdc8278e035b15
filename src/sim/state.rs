//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameSession`]; there are no statics.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::player::PlayerState;
use super::pool::{Entity, EntityPool};
use crate::hud::MenuOverlay;
use crate::scene::{Scene, VisualHandle, VisualKind};
use crate::tuning::{LayerTuning, Tuning, TuningError};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Menu overlay showing, waiting for a tap
    #[default]
    NotRunning,
    /// Active gameplay
    Running,
}

/// Which of a layer's two heights new segments are placed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeightLevel {
    #[default]
    Low,
    High,
}

impl HeightLevel {
    pub fn toggled(self) -> Self {
        match self {
            HeightLevel::Low => HeightLevel::High,
            HeightLevel::High => HeightLevel::Low,
        }
    }
}

/// Terrain row a segment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    /// Main ground the player runs on (grass)
    Ground,
    /// Decorative obstacle row (hay)
    Obstacles,
}

impl LayerKind {
    pub fn visual_kind(self) -> VisualKind {
        match self {
            LayerKind::Ground => VisualKind::Ground,
            LayerKind::Obstacles => VisualKind::Obstacle,
        }
    }
}

/// One ground/platform tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainSegment {
    pub handle: VisualHandle,
    /// Centre of the segment
    pub position: Vec2,
    pub size: Vec2,
    pub level: HeightLevel,
    pub layer: LayerKind,
    /// Physics category bits (solid ground)
    pub category: u32,
}

impl Entity for TerrainSegment {
    fn handle(&self) -> VisualHandle {
        self.handle
    }
}

/// A gem pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gem {
    pub handle: VisualHandle,
    pub position: Vec2,
    pub size: Vec2,
    /// Physics category bits (pickup)
    pub category: u32,
}

impl Entity for Gem {
    fn handle(&self) -> VisualHandle {
        self.handle
    }
}

/// A row of terrain with its own height state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainLayer {
    pub kind: LayerKind,
    pub tuning: LayerTuning,
    pub level: HeightLevel,
    /// Physics category bits stamped on every segment
    pub category: u32,
    pub segments: EntityPool<TerrainSegment>,
}

impl TerrainLayer {
    pub fn new(kind: LayerKind, tuning: LayerTuning, category: u32) -> Self {
        Self {
            kind,
            tuning,
            level: HeightLevel::Low,
            category,
            segments: EntityPool::new(),
        }
    }

    /// Vertical offset for the current level
    pub fn level_height(&self) -> f32 {
        match self.level {
            HeightLevel::Low => self.tuning.low_height,
            HeightLevel::High => self.tuning.high_height,
        }
    }

    /// Largest segment centre x, or 0.0 when empty
    pub fn rightmost_x(&self) -> f32 {
        self.segments
            .iter()
            .map(|s| s.position.x)
            .fold(0.0, f32::max)
    }

    /// Create a segment at `position` at the current level
    pub fn spawn_segment(&mut self, scene: &mut impl Scene, position: Vec2) {
        let size = self.tuning.segment_size;
        let handle = scene.spawn_visual(self.kind.visual_kind(), position, size);
        self.segments.append(TerrainSegment {
            handle,
            position,
            size,
            level: self.level,
            layer: self.kind,
            category: self.category,
        });
    }

    /// Drop every segment and go back to the low level
    pub fn reset(&mut self, scene: &mut impl Scene) {
        for segment in self.segments.remove_all() {
            scene.remove_visual(segment.handle);
        }
        self.level = HeightLevel::Low;
    }
}

/// One side of a contact report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactBody {
    /// Physics category bits of the body
    pub category: u32,
    pub handle: Option<VisualHandle>,
}

/// A "collision begin" report from the physics host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub a: ContactBody,
    pub b: ContactBody,
}

impl ContactEvent {
    pub fn new(a: ContactBody, b: ContactBody) -> Self {
        Self { a, b }
    }
}

/// Things the host should react to (sounds, sparks, labels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    Jumped,
    /// Player touched down from the air; play the landing effect here
    Landed { position: Vec2 },
    GemCollected { position: Vec2 },
    ScoreChanged { score: u32 },
    GameOver { score: u32, new_high_score: bool },
}

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct GameSession {
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u32,
    /// Best score across runs of this session; never decreases
    pub high_score: u32,
    /// Points scrolled per nominal (1/60 s) frame
    pub scroll_speed: f32,
    /// Timestamp of the previous running tick
    pub last_update: Option<f64>,
    /// Timestamp of the previous distance score award
    pub last_score_update: Option<f64>,
    /// Running ticks since the current run started
    pub time_ticks: u64,
    /// Distance scrolled in the current run
    pub distance: f32,
    pub player: PlayerState,
    pub ground: TerrainLayer,
    pub obstacles: Option<TerrainLayer>,
    pub gems: EntityPool<Gem>,
    /// Menu overlay, shown while not running
    pub overlay: Option<MenuOverlay>,
    pub(crate) rng: Pcg32,
    pub(crate) contacts: VecDeque<ContactEvent>,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Validate `tuning` and create a session seeded from `tuning.seed`
    pub fn try_new(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::new(tuning))
    }

    /// Create a session seeded from `tuning.seed`.
    ///
    /// `tuning` must already pass [`Tuning::validate`]; a zero roll range
    /// panics on the first spawn. Use [`GameSession::try_new`] for tuning
    /// built by hand.
    pub fn new(tuning: Tuning) -> Self {
        let seed = tuning.seed;
        Self::with_seed(tuning, seed)
    }

    /// Create a session with an explicit RNG seed
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        let categories = tuning.categories;
        let ground = TerrainLayer::new(LayerKind::Ground, tuning.ground, categories.grass);
        let obstacles = tuning
            .obstacles
            .map(|row| TerrainLayer::new(LayerKind::Obstacles, row, categories.hay));

        Self {
            phase: GamePhase::NotRunning,
            score: 0,
            high_score: 0,
            scroll_speed: tuning.starting_scroll_speed,
            last_update: None,
            last_score_update: None,
            time_ticks: 0,
            distance: 0.0,
            player: PlayerState::new(&tuning),
            ground,
            obstacles,
            gems: EntityPool::new(),
            overlay: Some(MenuOverlay::tap_to_play()),
            rng: Pcg32::seed_from_u64(seed),
            contacts: VecDeque::new(),
            events: Vec::new(),
            tuning,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// All terrain layers, ground first
    pub fn terrain_layers(&self) -> impl Iterator<Item = &TerrainLayer> {
        std::iter::once(&self.ground).chain(self.obstacles.iter())
    }

    /// Queue a contact report; drained by the next tick
    pub fn push_contact(&mut self, contact: ContactEvent) {
        self.contacts.push_back(contact);
    }

    pub fn pending_contacts(&self) -> usize {
        self.contacts.len()
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reset everything for a fresh run and start running
    pub fn start_game(&mut self, scene: &mut impl Scene) {
        self.score = 0;
        self.scroll_speed = self.tuning.starting_scroll_speed;
        self.last_update = None;
        self.last_score_update = None;
        self.time_ticks = 0;
        self.distance = 0.0;

        self.ground.reset(scene);
        if let Some(row) = self.obstacles.as_mut() {
            row.reset(scene);
        }
        for gem in self.gems.remove_all() {
            scene.remove_visual(gem.handle);
        }
        self.contacts.clear();
        self.overlay = None;

        self.player.reset(&self.tuning, scene);
        self.phase = GamePhase::Running;

        log::info!("Run started (high score {})", self.high_score);
        self.emit(GameEvent::GameStarted);
        self.emit(GameEvent::ScoreChanged { score: 0 });
    }

    /// End the run; folds the score into the high score
    pub fn game_over(&mut self) {
        self.phase = GamePhase::NotRunning;
        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
        }
        self.overlay = Some(MenuOverlay::game_over(self.score));

        log::info!(
            "Game over: score {} (high {}{})",
            self.score,
            self.high_score,
            if new_high_score { ", new record" } else { "" }
        );
        self.emit(GameEvent::GameOver {
            score: self.score,
            new_high_score,
        });
    }

    /// Convert the real time since the previous tick into a scroll distance.
    ///
    /// A slow frame scrolls proportionally farther, so speed does not depend
    /// on frame rate. The first tick of a run scrolls nothing.
    pub fn scroll_distance(&mut self, now: f64) -> f32 {
        let elapsed = match self.last_update {
            Some(last) => (now - last).clamp(0.0, self.tuning.max_frame_elapsed),
            None => 0.0,
        };
        self.last_update = Some(now);
        let adjustment = elapsed / self.tuning.expected_frame_time;
        self.scroll_speed * adjustment as f32
    }

    /// Award distance score once per score interval
    pub fn update_score(&mut self, now: f64) {
        if !self.is_running() {
            return;
        }
        match self.last_score_update {
            None => self.last_score_update = Some(now),
            Some(last) if now - last >= self.tuning.score_interval => {
                self.score = self.score.saturating_add(self.scroll_speed.floor() as u32);
                self.last_score_update = Some(now);
                self.emit(GameEvent::ScoreChanged { score: self.score });
            }
            Some(_) => {}
        }
    }
}
