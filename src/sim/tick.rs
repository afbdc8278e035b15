//! Frame-driven game loop
//!
//! One `tick` per rendered frame. Contacts reported by the physics host since
//! the previous frame are drained before the tap is handled, so a landing
//! reported last frame already counts for this frame's jump. Then the world
//! scrolls, the player is checked, gems move, and distance score is awarded.

use super::collision::resolve_contact;
use super::player::{try_jump, update_player};
use super::scroller::{advance, scroll_gems};
use super::state::{GamePhase, GameSession};
use crate::scene::Scene;

/// Input collected for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Tap (jump while running, start a run otherwise)
    pub tap: bool,
}

/// Handle a tap: jump when grounded, or start a new run from the menu
pub fn tap(session: &mut GameSession, scene: &mut impl Scene) {
    match session.phase {
        GamePhase::Running => {
            try_jump(session);
        }
        GamePhase::NotRunning => {
            session.overlay = None;
            session.start_game(scene);
        }
    }
}

/// Advance the session by one frame at timestamp `now` (seconds)
pub fn tick(session: &mut GameSession, scene: &mut impl Scene, input: &TickInput, now: f64) {
    if session.is_running() {
        while let Some(contact) = session.contacts.pop_front() {
            resolve_contact(session, scene, &contact);
        }
    } else {
        session.contacts.clear();
    }

    if input.tap {
        tap(session, scene);
    }

    if !session.is_running() {
        return;
    }

    session.time_ticks += 1;

    session.scroll_speed += session.tuning.scroll_speed_increment;
    let scroll = session.scroll_distance(now);
    session.distance += scroll;

    advance(session, scene, scroll);
    if update_player(session) {
        return;
    }
    scroll_gems(session, scene, scroll);
    session.update_score(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::scene::HeadlessScene;
    use crate::sim::{ContactBody, ContactEvent, GameEvent};

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn test_tap_starts_game() {
        let mut scene = HeadlessScene::new();
        let mut session = GameSession::new(Tuning::default());
        assert_eq!(session.phase, GamePhase::NotRunning);

        // Tick without tap - stays in menu
        tick(&mut session, &mut scene, &TickInput::default(), 0.0);
        assert_eq!(session.phase, GamePhase::NotRunning);
        assert!(session.ground.segments.is_empty());

        tick(&mut session, &mut scene, &TickInput { tap: true }, DT);
        assert_eq!(session.phase, GamePhase::Running);
        assert!(session.overlay.is_none());
        assert!(session.ground.rightmost_x() >= session.tuning.frame_width());
    }

    #[test]
    fn test_speed_ramps_every_running_tick() {
        let mut scene = HeadlessScene::new();
        let mut session = GameSession::new(Tuning::default());
        tick(&mut session, &mut scene, &TickInput { tap: true }, 0.0);
        let start = session.scroll_speed;
        for i in 1..=100 {
            tick(&mut session, &mut scene, &TickInput::default(), i as f64 * DT);
        }
        assert!((session.scroll_speed - (start + 1.0)).abs() < 1e-3);
    }

    #[test]
    fn test_score_after_one_second() {
        let mut scene = HeadlessScene::new();
        let mut session = GameSession::new(Tuning::default());
        tick(&mut session, &mut scene, &TickInput { tap: true }, 0.0);
        session.drain_events();

        // 1.5 seconds of frames: one award at t = 1.0
        for i in 1..=90 {
            tick(&mut session, &mut scene, &TickInput::default(), i as f64 * DT);
        }
        assert_eq!(session.score, 5);
        let awards = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ScoreChanged { .. }))
            .count();
        assert_eq!(awards, 1);
    }

    #[test]
    fn test_contacts_dropped_when_not_running() {
        let mut scene = HeadlessScene::new();
        let mut session = GameSession::new(Tuning::default());
        let cats = session.tuning.categories;
        session.push_contact(ContactEvent::new(
            ContactBody {
                category: cats.player,
                handle: None,
            },
            ContactBody {
                category: cats.grass,
                handle: None,
            },
        ));
        tick(&mut session, &mut scene, &TickInput::default(), 0.0);
        assert_eq!(session.pending_contacts(), 0);
    }

    #[test]
    fn test_run_ends_when_player_pushed_off() {
        let mut scene = HeadlessScene::new();
        let mut session = GameSession::new(Tuning::default());
        tick(&mut session, &mut scene, &TickInput { tap: true }, 0.0);
        session.score = 33;

        session.player.position.x = -5.0;
        tick(&mut session, &mut scene, &TickInput::default(), DT);
        assert_eq!(session.phase, GamePhase::NotRunning);
        assert_eq!(session.high_score, 33);
        assert!(session.overlay.is_some());

        // Frozen while in the menu
        let speed = session.scroll_speed;
        tick(&mut session, &mut scene, &TickInput::default(), 2.0 * DT);
        assert_eq!(session.scroll_speed, speed);
    }

    #[test]
    fn test_tap_while_airborne_does_nothing() {
        let mut scene = HeadlessScene::new();
        let mut session = GameSession::new(Tuning::default());
        tick(&mut session, &mut scene, &TickInput { tap: true }, 0.0);
        tick(&mut session, &mut scene, &TickInput { tap: true }, DT);
        assert_eq!(session.player.velocity.y, 260.0);
        tick(&mut session, &mut scene, &TickInput { tap: true }, 2.0 * DT);
        assert_eq!(session.player.velocity.y, 260.0);
    }

    #[test]
    fn test_tap_right_after_landing_jumps() {
        let mut scene = HeadlessScene::new();
        let mut session = GameSession::new(Tuning::default());
        tick(&mut session, &mut scene, &TickInput { tap: true }, 0.0);
        session.player.on_ground = false;
        session.player.velocity.y = -50.0;

        // Landing reported by the host during its physics step
        let cats = session.tuning.categories;
        session.push_contact(ContactEvent::new(
            ContactBody {
                category: cats.player,
                handle: session.player.handle,
            },
            ContactBody {
                category: cats.grass,
                handle: None,
            },
        ));
        tick(&mut session, &mut scene, &TickInput { tap: true }, DT);

        assert!(!session.player.on_ground);
        assert_eq!(session.player.velocity.y, -50.0 + 260.0);
        assert_eq!(session.pending_contacts(), 0);
        let events = session.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::Landed { .. })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::Jumped)));
    }
}
