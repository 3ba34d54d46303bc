//! Entity spawning and difficulty ramp
//!
//! Spawns are driven by accumulated time, so the cadence does not depend on the
//! frame rate. All randomness comes from a seeded PCG stream.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::catalog::{Catalog, CatalogEntry, EntityKind};
use crate::tuning::Tuning;

/// A spawn decision: what to place and where
#[derive(Debug, Clone, PartialEq)]
pub struct Spawn<'a> {
    pub kind: EntityKind,
    pub entry: &'a CatalogEntry,
    /// Top-left corner, at the right edge of the field
    pub pos: Vec2,
    pub size: Vec2,
}

/// Chooses when and what to spawn
#[derive(Debug, Clone)]
pub struct Spawner {
    seed: u64,
    rng: Pcg32,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Restart the random stream from `seed`
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Spawn once `elapsed_ms` strictly exceeds `interval_ms`
    ///
    /// The caller owns the elapsed counter and the interval: after a spawn it
    /// resets the counter and tightens the interval with [`next_interval`].
    pub fn maybe_spawn<'a>(
        &mut self,
        elapsed_ms: f32,
        interval_ms: f32,
        catalog: &'a Catalog,
        tuning: &Tuning,
    ) -> Option<Spawn<'a>> {
        if elapsed_ms <= interval_ms {
            return None;
        }

        let kind = if self.rng.random::<f64>() < tuning.obstacle_probability {
            EntityKind::Obstacle
        } else {
            EntityKind::Collectible
        };

        let entries = catalog.entries(kind);
        if entries.is_empty() {
            log::warn!("No {:?} entries in catalog, skipping spawn", kind);
            return None;
        }
        let entry = &entries[self.rng.random_range(0..entries.len())];

        let y = match kind {
            EntityKind::Obstacle => tuning.obstacle_y(),
            EntityKind::Collectible => tuning.collectible_y(),
        };

        Some(Spawn {
            kind,
            entry,
            pos: Vec2::new(tuning.field_width, y),
            size: Vec2::new(tuning.entity_width, tuning.entity_height),
        })
    }
}

/// Interval after one more spawn: multiplicative decay, floored
pub fn next_interval(interval_ms: f32, tuning: &Tuning) -> f32 {
    (interval_ms * tuning.spawn_interval_decay).max(tuning.min_spawn_interval_ms)
}
