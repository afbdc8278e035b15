//! Player state: ground contact, jumping, and the fall/tip checks

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameSession};
use crate::normalize_angle;
use crate::scene::{Scene, VisualHandle, VisualKind};
use crate::tuning::Tuning;

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Visual in the scene (spawned on the first run)
    pub handle: Option<VisualHandle>,
    /// Centre of the player
    pub position: Vec2,
    pub velocity: Vec2,
    /// Rotation in radians (counter-clockwise)
    pub rotation: f32,
    pub size: Vec2,
    pub on_ground: bool,
    /// Resting height of the default stance
    pub minimum_y: f32,
}

impl PlayerState {
    pub fn new(tuning: &Tuning) -> Self {
        let stance = Self::stance(tuning);
        Self {
            handle: None,
            position: stance,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            size: tuning.player_size,
            on_ground: true,
            minimum_y: stance.y,
        }
    }

    /// Default stance: a quarter of the way across, feet on the low ground
    pub fn stance(tuning: &Tuning) -> Vec2 {
        Vec2::new(
            tuning.frame_width() / 4.0,
            tuning.player_size.y / 2.0 + tuning.stance_offset,
        )
    }

    /// Put the player back in the default stance at rest
    pub fn reset(&mut self, tuning: &Tuning, scene: &mut impl Scene) {
        let stance = Self::stance(tuning);
        self.position = stance;
        self.minimum_y = stance.y;
        self.velocity = Vec2::ZERO;
        self.rotation = 0.0;
        self.size = tuning.player_size;
        self.on_ground = true;

        match self.handle {
            Some(handle) => scene.move_visual(handle, stance),
            None => {
                self.handle = Some(scene.spawn_visual(VisualKind::Player, stance, self.size));
            }
        }
    }

    /// Apply an upward impulse; the caller checks `on_ground`
    pub fn jump(&mut self, impulse: f32) {
        self.velocity.y += impulse;
        self.on_ground = false;
    }

    /// Fell below or behind the visible frame
    pub fn is_off_screen(&self) -> bool {
        self.position.y < 0.0 || self.position.x < 0.0
    }

    /// Rotated past `max_tilt` radians either way
    pub fn is_tipped_over(&self, max_tilt: f32) -> bool {
        normalize_angle(self.rotation).abs() > max_tilt
    }
}

/// Per-tick player check. Returns true if the run just ended.
///
/// Ground contact is only reported when it begins, so a large vertical speed
/// is taken to mean the player has left the ground.
pub fn update_player(session: &mut GameSession) -> bool {
    let tuning = &session.tuning;
    let player = &mut session.player;

    if player.velocity.y.abs() > tuning.airborne_velocity {
        player.on_ground = false;
    }

    if player.is_off_screen() || player.is_tipped_over(tuning.max_tilt()) {
        log::debug!(
            "Player lost at ({:.1}, {:.1}) rotation {:.2}",
            player.position.x,
            player.position.y,
            player.rotation
        );
        session.game_over();
        return true;
    }
    false
}

/// Jump if grounded; returns whether the jump happened
pub fn try_jump(session: &mut GameSession) -> bool {
    if !session.is_running() || !session.player.on_ground {
        return false;
    }
    session.player.jump(session.tuning.jump_impulse);
    session.emit(GameEvent::Jumped);
    true
}
