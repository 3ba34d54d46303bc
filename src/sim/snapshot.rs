//! Read-only view of the state for the presentation layer

use serde::Serialize;

use super::catalog::{DrawableHandle, EntityKind};
use super::collision::Aabb;
use super::state::{GamePhase, GameState};

/// A drawable rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxView {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl From<Aabb> for BoxView {
    fn from(b: Aabb) -> Self {
        Self {
            x: b.min.x,
            y: b.min.y,
            w: b.size.x,
            h: b.size.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub kind: EntityKind,
    pub display_name: String,
    pub drawable: DrawableHandle,
    #[serde(flatten)]
    pub rect: BoxView,
}

/// Everything a renderer needs after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub entities: Vec<EntityView>,
    pub player: BoxView,
}

impl From<&GameState> for Snapshot {
    fn from(state: &GameState) -> Self {
        Self {
            phase: state.phase,
            score: state.score,
            entities: state
                .entities
                .iter()
                .map(|e| EntityView {
                    kind: e.kind,
                    display_name: e.name.clone(),
                    drawable: e.drawable,
                    rect: e.bounds().into(),
                })
                .collect(),
            player: state.player.bounds().into(),
        }
    }
}
