//! Scene collaborator surface
//!
//! The simulation never draws or integrates physics itself. It talks to a
//! [`Scene`] that can place, move and remove visuals; the host's physics
//! feeds player motion and contact reports back into the session.
//!
//! [`HeadlessScene`] keeps visuals in memory and carries a tiny kinematic
//! stand-in (gravity, landing on segment tops, walls, gem overlap) so the
//! loop can run without a renderer.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{ContactBody, ContactEvent, GameSession};

/// Opaque reference to a visual owned by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// What a visual represents (chooses the sprite and physics body)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualKind {
    Player,
    /// Ground layer segment (solid)
    Ground,
    /// Obstacle row segment (solid)
    Obstacle,
    /// Gem pickup (non-solid, no gravity)
    Gem,
}

/// Rendering/scene-graph collaborator
pub trait Scene {
    /// Create a visual centred at `position`
    fn spawn_visual(&mut self, kind: VisualKind, position: Vec2, size: Vec2) -> VisualHandle;
    /// Reposition an existing visual
    fn move_visual(&mut self, handle: VisualHandle, position: Vec2);
    /// Remove a visual; unknown handles are ignored
    fn remove_visual(&mut self, handle: VisualHandle);
}

/// A visual held by [`HeadlessScene`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub kind: VisualKind,
    pub position: Vec2,
    pub size: Vec2,
}

impl Visual {
    fn min(&self) -> Vec2 {
        self.position - self.size / 2.0
    }

    fn max(&self) -> Vec2 {
        self.position + self.size / 2.0
    }
}

/// Feet may sink this far below a top surface and still count as landing on it
const STEP_TOLERANCE: f32 = 8.0;

/// Default gravity for the kinematic stand-in (points/s², downward)
pub const HEADLESS_GRAVITY: f32 = -300.0;

/// In-memory scene with a minimal kinematic stand-in
#[derive(Debug, Clone)]
pub struct HeadlessScene {
    visuals: BTreeMap<VisualHandle, Visual>,
    next_handle: u64,
    spawned: u64,
    removed: u64,
    /// Vertical acceleration applied to the player
    pub gravity: f32,
    /// Segment the player currently rests on (contacts only fire on change)
    resting_on: Option<VisualHandle>,
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self {
            visuals: BTreeMap::new(),
            next_handle: 1,
            spawned: 0,
            removed: 0,
            gravity: HEADLESS_GRAVITY,
            resting_on: None,
        }
    }

    pub fn visual(&self, handle: VisualHandle) -> Option<&Visual> {
        self.visuals.get(&handle)
    }

    /// Number of live visuals of `kind`
    pub fn count(&self, kind: VisualKind) -> usize {
        self.visuals.values().filter(|v| v.kind == kind).count()
    }

    pub fn live_count(&self) -> usize {
        self.visuals.len()
    }

    /// Total visuals ever spawned
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Total visuals removed
    pub fn removed(&self) -> u64 {
        self.removed
    }

    /// Integrate the player for `dt` seconds and report new contacts.
    ///
    /// The player never moves horizontally on its own; terrain scrolls past
    /// it. A taller segment in front pushes it back, which is how a missed
    /// step ends a run.
    pub fn step_physics(&mut self, session: &mut GameSession, dt: f32) {
        if !session.is_running() {
            return;
        }
        let categories = session.tuning.categories;

        let blocks: Vec<(VisualHandle, u32, Visual)> = session
            .terrain_layers()
            .flat_map(|layer| layer.segments.iter())
            .map(|seg| {
                (
                    seg.handle,
                    seg.category,
                    Visual {
                        kind: VisualKind::Ground,
                        position: seg.position,
                        size: seg.size,
                    },
                )
            })
            .collect();
        let gems: Vec<(VisualHandle, u32, Visual)> = session
            .gems
            .iter()
            .map(|gem| {
                (
                    gem.handle,
                    gem.category,
                    Visual {
                        kind: VisualKind::Gem,
                        position: gem.position,
                        size: gem.size,
                    },
                )
            })
            .collect();

        let player = &mut session.player;
        let half = player.size / 2.0;
        let prev_bottom = player.position.y - half.y;
        let prev_top = player.position.y + half.y;

        player.velocity.y += self.gravity * dt;
        player.position += player.velocity * dt;

        let mut contacts = Vec::new();
        let mut landed_on = None;
        for (handle, category, block) in &blocks {
            let (min, max) = (block.min(), block.max());
            let left = player.position.x - half.x;
            let right = player.position.x + half.x;
            if right <= min.x || left >= max.x {
                continue;
            }
            let bottom = player.position.y - half.y;
            let top = player.position.y + half.y;

            if player.velocity.y <= 0.0 && prev_bottom >= max.y - STEP_TOLERANCE && bottom <= max.y
            {
                player.position.y = max.y + half.y;
                player.velocity.y = 0.0;
                landed_on = Some((*handle, *category));
            } else if player.velocity.y > 0.0 && prev_top <= min.y && top > min.y {
                player.position.y = min.y - half.y;
                player.velocity.y = 0.0;
            } else if bottom < max.y - STEP_TOLERANCE && top > min.y {
                player.position.x = min.x - half.x;
            }
        }

        let player_body = ContactBody {
            category: categories.player,
            handle: player.handle,
        };

        match landed_on {
            Some((handle, category)) if self.resting_on != Some(handle) => {
                contacts.push(ContactEvent::new(
                    player_body,
                    ContactBody {
                        category,
                        handle: Some(handle),
                    },
                ));
                self.resting_on = Some(handle);
            }
            Some(_) => {}
            None => self.resting_on = None,
        }

        let player_min = player.position - half;
        let player_max = player.position + half;
        for (handle, category, gem) in &gems {
            let (min, max) = (gem.min(), gem.max());
            if player_max.x > min.x
                && player_min.x < max.x
                && player_max.y > min.y
                && player_min.y < max.y
            {
                contacts.push(ContactEvent::new(
                    player_body,
                    ContactBody {
                        category: *category,
                        handle: Some(*handle),
                    },
                ));
            }
        }

        let position = player.position;
        if let Some(handle) = player.handle {
            self.move_visual(handle, position);
        }
        for contact in contacts {
            session.push_contact(contact);
        }
    }
}

impl Scene for HeadlessScene {
    fn spawn_visual(&mut self, kind: VisualKind, position: Vec2, size: Vec2) -> VisualHandle {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        self.spawned += 1;
        self.visuals.insert(
            handle,
            Visual {
                kind,
                position,
                size,
            },
        );
        log::trace!("spawn {:?} #{} at ({:.1}, {:.1})", kind, handle.0, position.x, position.y);
        handle
    }

    fn move_visual(&mut self, handle: VisualHandle, position: Vec2) {
        if let Some(visual) = self.visuals.get_mut(&handle) {
            visual.position = position;
        }
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle).is_some() {
            self.removed += 1;
        }
        if self.resting_on == Some(handle) {
            self.resting_on = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::{TickInput, tick};

    #[test]
    fn test_spawn_move_remove() {
        let mut scene = HeadlessScene::new();
        let a = scene.spawn_visual(VisualKind::Gem, Vec2::new(1.0, 2.0), Vec2::splat(4.0));
        let b = scene.spawn_visual(VisualKind::Ground, Vec2::ZERO, Vec2::splat(64.0));
        assert_ne!(a, b);
        assert_eq!(scene.count(VisualKind::Gem), 1);

        scene.move_visual(a, Vec2::new(5.0, 6.0));
        assert_eq!(scene.visual(a).map(|v| v.position), Some(Vec2::new(5.0, 6.0)));

        scene.remove_visual(a);
        scene.remove_visual(a);
        assert_eq!(scene.removed(), 1);
        assert_eq!(scene.live_count(), 1);
        assert_eq!(scene.spawned(), 2);
    }

    #[test]
    fn test_player_rests_on_ground_after_start() {
        let mut scene = HeadlessScene::new();
        let mut session = GameSession::new(Tuning::default());
        let dt = 1.0 / 60.0;
        for i in 0..120 {
            let input = TickInput { tap: i == 0 };
            tick(&mut session, &mut scene, &input, i as f64 * dt as f64);
            scene.step_physics(&mut session, dt);
        }
        assert!(session.is_running());
        assert!(session.player.on_ground);
        // Standing on the low ground: feet at the segment top
        let feet = session.player.position.y - session.player.size.y / 2.0;
        assert!((feet - session.tuning.ground.segment_size.y).abs() < 1.0);
    }

    #[test]
    fn test_jump_leaves_and_returns_to_ground() {
        let mut scene = HeadlessScene::new();
        let mut session = GameSession::new(Tuning::default());
        let dt = 1.0 / 60.0;
        let mut now = 0.0;
        let mut run = |session: &mut GameSession, scene: &mut HeadlessScene, tap: bool| {
            tick(session, scene, &TickInput { tap }, now);
            scene.step_physics(session, dt);
            now += dt as f64;
        };

        run(&mut session, &mut scene, true);
        for _ in 0..30 {
            run(&mut session, &mut scene, false);
        }
        let rest_y = session.player.position.y;

        run(&mut session, &mut scene, true);
        assert!(session.player.position.y > rest_y);
        assert!(!session.player.on_ground);

        // Full arc is 2 * 260 / 300 s; give it two seconds
        for _ in 0..120 {
            run(&mut session, &mut scene, false);
        }
        assert!(session.player.on_ground);
        assert!((session.player.position.y - rest_y).abs() < 1.0);
    }
}
