//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only
//! - Stable iteration order (insertion order of each pool)
//! - No rendering or platform dependencies; visuals go through `Scene`

pub mod collision;
pub mod player;
pub mod pool;
pub mod scroller;
pub mod state;
pub mod tick;

pub use collision::{BodyKind, Contact, classify_body, classify_contact, resolve_contact};
pub use player::{PlayerState, try_jump, update_player};
pub use pool::{Entity, EntityPool};
pub use scroller::{advance, scroll_gems};
pub use state::{
    ContactBody, ContactEvent, GameEvent, GamePhase, GameSession, Gem, HeightLevel, LayerKind,
    TerrainLayer, TerrainSegment,
};
pub use tick::{TickInput, tap, tick};
