//! Contact classification and response
//!
//! The physics host reports "collision begin" pairs tagged with category bits.
//! Pairs are classified by what the two bodies are, in either order, and
//! resolved against the session.

use super::state::{ContactBody, ContactEvent, GameEvent, GameSession, LayerKind};
use crate::scene::{Scene, VisualHandle};
use crate::tuning::PhysicsCategories;

/// What a body is, from its category bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Player,
    Terrain(LayerKind),
    Gem,
    Unknown,
}

/// Classify category bits. Grass is checked before hay, so equal bits read as ground.
pub fn classify_body(categories: &PhysicsCategories, bits: u32) -> BodyKind {
    if bits & categories.player != 0 {
        BodyKind::Player
    } else if bits & categories.grass != 0 {
        BodyKind::Terrain(LayerKind::Ground)
    } else if bits & categories.hay != 0 {
        BodyKind::Terrain(LayerKind::Obstacles)
    } else if bits & categories.gem != 0 {
        BodyKind::Gem
    } else {
        BodyKind::Unknown
    }
}

/// A contact pair the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    PlayerTerrain { layer: LayerKind },
    PlayerGem { gem: Option<VisualHandle> },
    Ignored,
}

pub fn classify_contact(categories: &PhysicsCategories, event: &ContactEvent) -> Contact {
    let kind = |body: &ContactBody| classify_body(categories, body.category);
    let other = match (kind(&event.a), kind(&event.b)) {
        (BodyKind::Player, _) => event.b,
        (_, BodyKind::Player) => event.a,
        _ => return Contact::Ignored,
    };
    match kind(&other) {
        BodyKind::Terrain(layer) => Contact::PlayerTerrain { layer },
        BodyKind::Gem => Contact::PlayerGem { gem: other.handle },
        BodyKind::Player | BodyKind::Unknown => Contact::Ignored,
    }
}

/// Apply one contact to a running session
pub fn resolve_contact(session: &mut GameSession, scene: &mut impl Scene, event: &ContactEvent) {
    if !session.is_running() {
        return;
    }

    match classify_contact(&session.tuning.categories, event) {
        Contact::PlayerTerrain { .. } => {
            let player = &mut session.player;
            let landing =
                !player.on_ground && player.velocity.y < session.tuning.landing_velocity;
            player.on_ground = true;
            if landing {
                let position = player.position;
                session.emit(GameEvent::Landed { position });
            }
        }
        Contact::PlayerGem { gem: Some(handle) } => {
            let Some(gem) = session.gems.remove_by_handle(handle) else {
                log::trace!("Stale gem contact #{}", handle.0);
                return;
            };
            scene.remove_visual(gem.handle);
            session.score = session.score.saturating_add(session.tuning.gem_bonus);
            log::debug!("Gem collected, score {}", session.score);
            session.emit(GameEvent::GemCollected {
                position: gem.position,
            });
            session.emit(GameEvent::ScoreChanged {
                score: session.score,
            });
        }
        Contact::PlayerGem { gem: None } | Contact::Ignored => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::scene::{HeadlessScene, VisualKind};
    use crate::sim::Gem;
    use glam::Vec2;

    fn body(category: u32, handle: Option<u64>) -> ContactBody {
        ContactBody {
            category,
            handle: handle.map(VisualHandle),
        }
    }

    #[test]
    fn test_classify_either_order() {
        let cats = PhysicsCategories::default();
        let ab = ContactEvent::new(body(cats.player, None), body(cats.grass, Some(3)));
        let ba = ContactEvent::new(body(cats.grass, Some(3)), body(cats.player, None));
        let expected = Contact::PlayerTerrain {
            layer: LayerKind::Ground,
        };
        assert_eq!(classify_contact(&cats, &ab), expected);
        assert_eq!(classify_contact(&cats, &ba), expected);
    }

    #[test]
    fn test_hay_is_its_own_layer() {
        let cats = PhysicsCategories::default();
        let event = ContactEvent::new(body(cats.hay, Some(9)), body(cats.player, None));
        assert_eq!(
            classify_contact(&cats, &event),
            Contact::PlayerTerrain {
                layer: LayerKind::Obstacles
            }
        );
    }

    #[test]
    fn test_shared_hay_grass_bits_read_as_ground() {
        let cats = PhysicsCategories {
            hay: 0x2,
            grass: 0x2,
            ..PhysicsCategories::default()
        };
        assert_eq!(
            classify_body(&cats, 0x2),
            BodyKind::Terrain(LayerKind::Ground)
        );
    }

    #[test]
    fn test_non_player_pairs_ignored() {
        let cats = PhysicsCategories::default();
        let event = ContactEvent::new(body(cats.gem, Some(1)), body(cats.grass, Some(2)));
        assert_eq!(classify_contact(&cats, &event), Contact::Ignored);
        assert_eq!(classify_body(&cats, 0x100), BodyKind::Unknown);
    }

    fn session_with_gem() -> (GameSession, HeadlessScene, VisualHandle) {
        let mut scene = HeadlessScene::new();
        let mut session = GameSession::new(Tuning::default());
        session.start_game(&mut scene);
        let position = Vec2::new(200.0, 150.0);
        let size = session.tuning.gem_size;
        let handle = scene.spawn_visual(VisualKind::Gem, position, size);
        session.gems.append(Gem {
            handle,
            position,
            size,
            category: session.tuning.categories.gem,
        });
        (session, scene, handle)
    }

    #[test]
    fn test_gem_pickup_scores_once() {
        let (mut session, mut scene, handle) = session_with_gem();
        let cats = session.tuning.categories;
        let event = ContactEvent::new(body(cats.player, None), body(cats.gem, Some(handle.0)));

        resolve_contact(&mut session, &mut scene, &event);
        assert_eq!(session.score, 50);
        assert!(session.gems.is_empty());
        assert!(scene.visual(handle).is_none());

        // Repeat report for the same gem does nothing
        resolve_contact(&mut session, &mut scene, &event);
        assert_eq!(session.score, 50);
    }

    #[test]
    fn test_gem_bonus_saturates_score() {
        let (mut session, mut scene, handle) = session_with_gem();
        let cats = session.tuning.categories;
        session.score = u32::MAX - 10;
        let event = ContactEvent::new(body(cats.gem, Some(handle.0)), body(cats.player, None));
        resolve_contact(&mut session, &mut scene, &event);
        assert_eq!(session.score, u32::MAX);
        assert!(session.gems.is_empty());
    }

    #[test]
    fn test_landing_from_air_emits_effect() {
        let (mut session, mut scene, _) = session_with_gem();
        let cats = session.tuning.categories;
        let event = ContactEvent::new(body(cats.player, None), body(cats.grass, Some(1)));
        session.drain_events();

        session.player.on_ground = false;
        session.player.velocity.y = -40.0;
        resolve_contact(&mut session, &mut scene, &event);
        assert!(session.player.on_ground);
        assert!(matches!(
            session.drain_events().as_slice(),
            [GameEvent::Landed { .. }]
        ));

        // Already grounded: no effect
        resolve_contact(&mut session, &mut scene, &event);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_fast_rising_contact_grounds_without_effect() {
        let (mut session, mut scene, _) = session_with_gem();
        let cats = session.tuning.categories;
        let event = ContactEvent::new(body(cats.player, None), body(cats.hay, Some(1)));
        session.drain_events();

        session.player.on_ground = false;
        session.player.velocity.y = 150.0;
        resolve_contact(&mut session, &mut scene, &event);
        assert!(session.player.on_ground);
        assert!(session.drain_events().is_empty());
    }
}
