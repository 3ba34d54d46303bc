//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; there is no ambient state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::{CatalogEntry, DrawableHandle, EntityKind};
use super::collision::Aabb;
use super::player::PlayerBody;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Loaded, waiting for the first start
    Idle,
    /// Active gameplay
    Running,
    /// Run ended on an obstacle
    Over,
}

/// An obstacle or collectible scrolling toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub name: String,
    pub drawable: DrawableHandle,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Entity {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// True once the right edge has scrolled past the left side of the field
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }
}

/// Things that happened during a tick, for sound and effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    Spawned { id: u32, kind: EntityKind },
    Collected { id: u32, name: String, score: u64 },
    Despawned { id: u32 },
    GameOver { obstacle: String, score: u64 },
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Collectibles picked up this run
    pub score: u64,
    /// Horizontal entity speed (pixels/s)
    pub speed: f32,
    /// Time between spawns (ms), shrinks with every spawn
    pub spawn_interval_ms: f32,
    /// Time since the last spawn (ms)
    pub spawn_timer_ms: f32,
    /// Ticks processed this run
    pub tick_count: u64,
    pub player: PlayerBody,
    /// Live entities, in spawn order
    pub entities: Vec<Entity>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh state in the Idle phase
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            speed: tuning.initial_speed,
            spawn_interval_ms: tuning.initial_spawn_interval_ms,
            spawn_timer_ms: 0.0,
            tick_count: 0,
            player: PlayerBody::new(tuning),
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Reset everything to initial values and enter Running
    pub fn begin_run(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
        self.phase = GamePhase::Running;
    }

    /// Enter Over; returns false (and changes nothing) unless currently Running
    pub fn end_run(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::Over;
        true
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an entity built from a catalog entry; returns its ID
    pub fn push_entity(
        &mut self,
        kind: EntityKind,
        entry: &CatalogEntry,
        pos: Vec2,
        size: Vec2,
    ) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(Entity {
            id,
            kind,
            name: entry.name.clone(),
            drawable: entry.drawable,
            pos,
            size,
        });
        id
    }

    /// Debug-build check of the state invariants
    pub fn debug_check(&self, tuning: &Tuning) {
        debug_assert!(self.speed >= tuning.initial_speed, "speed fell below its start value");
        debug_assert!(
            self.spawn_interval_ms >= tuning.min_spawn_interval_ms,
            "spawn interval below floor"
        );
        debug_assert!(self.spawn_timer_ms >= 0.0);
        debug_assert!(self.player.pos.is_finite());
        debug_assert!(self.entities.iter().all(|e| e.pos.is_finite()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::Catalog;

    #[test]
    fn test_new_state_is_idle_and_empty() {
        let tuning = Tuning::default();
        let state = GameState::new(&tuning);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed, 250.0);
        assert_eq!(state.spawn_interval_ms, 1500.0);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_begin_run_discards_previous_run() {
        let tuning = Tuning::default();
        let catalog = Catalog::default();
        let mut state = GameState::new(&tuning);
        state.begin_run(&tuning);

        state.score = 7;
        state.speed = 400.0;
        state.spawn_interval_ms = 900.0;
        state.push_entity(
            EntityKind::Obstacle,
            &catalog.entries(EntityKind::Obstacle)[0],
            Vec2::new(100.0, 360.0),
            Vec2::new(30.0, 30.0),
        );
        assert!(state.end_run());

        state.begin_run(&tuning);
        let mut expected = GameState::new(&tuning);
        expected.phase = GamePhase::Running;
        assert_eq!(state, expected);
    }

    #[test]
    fn test_end_run_is_idempotent() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning);
        assert!(!state.end_run());
        assert_eq!(state.phase, GamePhase::Idle);

        state.begin_run(&tuning);
        assert!(state.end_run());
        assert!(!state.end_run());
        assert_eq!(state.phase, GamePhase::Over);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let tuning = Tuning::default();
        let catalog = Catalog::default();
        let mut state = GameState::new(&tuning);
        let entry = &catalog.entries(EntityKind::Collectible)[0];
        let a = state.push_entity(EntityKind::Collectible, entry, Vec2::ZERO, Vec2::ONE);
        let b = state.push_entity(EntityKind::Collectible, entry, Vec2::ZERO, Vec2::ONE);
        assert_ne!(a, b);
        assert_eq!(state.entities[1].name, "CodeConnect");
    }
}
