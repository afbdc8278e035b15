//! Terrain scroller
//!
//! Each tick the world moves left by the scroll distance. Segments that leave
//! the frame are retired and new ones are appended on the right until the
//! visible width is covered again. While filling, a roll per segment may open
//! a jumpable gap (with a gem above it) or flip the layer between its low and
//! high height.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::pool::EntityPool;
use super::state::{Gem, GameSession, TerrainLayer};
use crate::scene::{Scene, VisualKind};
use crate::tuning::Tuning;

/// Inputs to the spawn rolls, fixed for the duration of one `advance`
#[derive(Debug, Clone, Copy)]
struct SpawnPolicy {
    frame_width: f32,
    margin: f32,
    roll_range: u32,
    gap_chance: u32,
    gap_score_gate: u32,
    level_toggle_chance: u32,
    level_toggle_score_gate: u32,
    gap_width: f32,
    gem_rise: f32,
    gem_max_lift: u32,
    gem_size: Vec2,
    gem_category: u32,
    score: u32,
}

impl SpawnPolicy {
    fn new(tuning: &Tuning, score: u32, scroll_speed: f32, player_height: f32) -> Self {
        Self {
            frame_width: tuning.frame_width(),
            margin: tuning.segment_margin,
            roll_range: tuning.spawn_roll_range,
            gap_chance: tuning.gap_chance,
            gap_score_gate: tuning.gap_score_gate,
            level_toggle_chance: tuning.level_toggle_chance,
            level_toggle_score_gate: tuning.level_toggle_score_gate,
            gap_width: tuning.gap_speed_factor * scroll_speed,
            gem_rise: player_height,
            gem_max_lift: tuning.gem_max_lift,
            gem_size: tuning.gem_size,
            gem_category: tuning.categories.gem,
            score,
        }
    }
}

/// Scroll all terrain left by `scroll` and refill the visible window.
///
/// Afterwards every layer's rightmost segment sits at or past the frame width.
pub fn advance(session: &mut GameSession, scene: &mut impl Scene, scroll: f32) {
    let policy = SpawnPolicy::new(
        &session.tuning,
        session.score,
        session.scroll_speed,
        session.player.size.y,
    );
    let GameSession {
        ground,
        obstacles,
        gems,
        rng,
        ..
    } = session;

    advance_layer(ground, &policy, rng, gems, scene, scroll);
    if let Some(row) = obstacles.as_mut() {
        advance_layer(row, &policy, rng, gems, scene, scroll);
    }
}

fn advance_layer(
    layer: &mut TerrainLayer,
    policy: &SpawnPolicy,
    rng: &mut Pcg32,
    gems: &mut EntityPool<Gem>,
    scene: &mut impl Scene,
    scroll: f32,
) {
    let width = layer.tuning.segment_size.x;
    // Survivors may all sit left of 0 after a long scroll; continue from them
    let mut survivor_x: Option<f32> = None;

    let retired = layer.segments.retire_where(|segment| {
        let x = segment.position.x - scroll;
        if x < -width {
            return true;
        }
        segment.position.x = x;
        survivor_x = Some(survivor_x.map_or(x, |r| r.max(x)));
        scene.move_visual(segment.handle, segment.position);
        false
    });
    for segment in retired {
        scene.remove_visual(segment.handle);
    }

    let mut rightmost_x = survivor_x.unwrap_or(0.0);
    while rightmost_x < policy.frame_width {
        let mut x = rightmost_x + width + policy.margin;
        let y = layer.tuning.segment_size.y / 2.0 + layer.level_height();

        let roll = rng.random_range(0..policy.roll_range);
        if roll < policy.gap_chance && policy.score > policy.gap_score_gate {
            let gap = policy.gap_width;
            x += gap;
            log::debug!("{:?} gap of {:.1} at x={:.1}", layer.kind, gap, x);
            if layer.tuning.spawns_gems {
                let lift = if policy.gem_max_lift > 0 {
                    rng.random_range(0..policy.gem_max_lift) as f32
                } else {
                    0.0
                };
                let position = Vec2::new(x - gap / 2.0, y + policy.gem_rise + lift);
                spawn_gem(gems, scene, policy, position);
            }
        } else if roll < policy.level_toggle_chance
            && policy.score > policy.level_toggle_score_gate
        {
            layer.level = layer.level.toggled();
            log::debug!("{:?} level now {:?}", layer.kind, layer.level);
        }

        layer.spawn_segment(scene, Vec2::new(x, y));
        rightmost_x = x;
    }
}

fn spawn_gem(
    gems: &mut EntityPool<Gem>,
    scene: &mut impl Scene,
    policy: &SpawnPolicy,
    position: Vec2,
) {
    let handle = scene.spawn_visual(VisualKind::Gem, position, policy.gem_size);
    gems.append(Gem {
        handle,
        position,
        size: policy.gem_size,
        category: policy.gem_category,
    });
}

/// Scroll gems left by `scroll`, retiring any that pass the left edge
pub fn scroll_gems(session: &mut GameSession, scene: &mut impl Scene, scroll: f32) {
    let retired = session.gems.retire_where(|gem| {
        gem.position.x -= scroll;
        if gem.position.x < 0.0 {
            return true;
        }
        scene.move_visual(gem.handle, gem.position);
        false
    });
    for gem in retired {
        scene.remove_visual(gem.handle);
    }
}
