//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure:
//! - Time only enters through the `dt` argument
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod catalog;
pub mod clock;
pub mod collision;
pub mod player;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use catalog::{Catalog, CatalogEntry, DrawableHandle, EntityKind};
pub use clock::FrameClock;
pub use collision::Aabb;
pub use player::PlayerBody;
pub use snapshot::{BoxView, EntityView, Snapshot};
pub use spawner::{Spawn, Spawner, next_interval};
pub use state::{Entity, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
