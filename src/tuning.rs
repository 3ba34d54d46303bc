//! Data-driven game balance
//!
//! Every constant the simulation reads lives in [`Tuning`]. Defaults come from
//! [`crate::consts`]; a JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::EntityKind;

/// How entity speed grows while a run is in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "amount", rename_all = "snake_case")]
pub enum SpeedRamp {
    /// Fixed increment per tick, regardless of frame duration
    PerTick(f32),
    /// Increment per simulated second (scaled by dt)
    PerSecond(f32),
}

impl SpeedRamp {
    /// Speed increase for a tick of `dt` seconds
    pub fn increment(&self, dt: f32) -> f32 {
        match *self {
            SpeedRamp::PerTick(amount) => amount,
            SpeedRamp::PerSecond(rate) => rate * dt,
        }
    }

    fn amount(&self) -> f32 {
        match *self {
            SpeedRamp::PerTick(amount) | SpeedRamp::PerSecond(amount) => amount,
        }
    }
}

impl Default for SpeedRamp {
    fn default() -> Self {
        SpeedRamp::PerTick(SPEED_INCREMENT_PER_TICK)
    }
}

/// Rejected tuning values
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("obstacle probability must be within [0, 1], got {0}")]
    Probability(f64),
    #[error("spawn interval decay must be within (0, 1], got {0}")]
    Decay(f32),
    #[error("minimum spawn interval {floor_ms}ms exceeds the initial interval {initial_ms}ms")]
    FloorAboveInitial { floor_ms: f32, initial_ms: f32 },
    #[error("jump impulse must point upward (negative), got {0}")]
    JumpImpulse(f32),
    #[error("speed ramp must not be negative, got {0}")]
    NegativeRamp(f32),
    #[error("player does not fit between the field top and the ground line")]
    PlayerTooTall,
    #[error("collectible lane bottom {lane_bottom} is out of jump reach (apex top {apex_top})")]
    CollectibleUnreachable { lane_bottom: f32, apex_top: f32 },
    #[error("collectible lane bottom {lane_bottom} overlaps a grounded player (top {player_top})")]
    CollectibleBlocksRunner { lane_bottom: f32, player_top: f32 },
    #[error("catalog has no {0:?} entries")]
    EmptyCategory(EntityKind),
}

/// Game balance and field geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field_width: f32,
    pub field_height: f32,
    pub ground_offset: f32,

    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub gravity: f32,
    pub jump_impulse: f32,

    pub initial_speed: f32,
    pub speed_ramp: SpeedRamp,

    pub initial_spawn_interval_ms: f32,
    pub spawn_interval_decay: f32,
    pub min_spawn_interval_ms: f32,
    pub obstacle_probability: f64,

    pub entity_width: f32,
    pub entity_height: f32,
    /// Distance from the field bottom to the top edge of a collectible;
    /// obstacles always rest on the ground line
    pub collectible_drop: f32,

    /// Clamp for a single frame delta (seconds)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            ground_offset: GROUND_OFFSET,

            player_x: PLAYER_X,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,

            initial_speed: INITIAL_SPEED,
            speed_ramp: SpeedRamp::default(),

            initial_spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            spawn_interval_decay: SPAWN_INTERVAL_DECAY,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            obstacle_probability: OBSTACLE_PROBABILITY,

            entity_width: ENTITY_WIDTH,
            entity_height: ENTITY_HEIGHT,
            collectible_drop: COLLECTIBLE_DROP,

            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::debug!("Loaded tuning: {:?}", tuning);
        Ok(tuning)
    }

    /// Y coordinate of the ground line (bodies rest with their bottom edge here)
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.field_height - self.ground_offset
    }

    /// Top edge of a spawned obstacle, resting on the ground line
    #[inline]
    pub fn obstacle_y(&self) -> f32 {
        self.ground_y() - self.entity_height
    }

    /// Top edge of a spawned collectible
    #[inline]
    pub fn collectible_y(&self) -> f32 {
        self.field_height - self.collectible_drop
    }

    /// Highest point a jump lifts the player's top edge to (continuous motion)
    pub fn jump_apex_top(&self) -> f32 {
        let rise = self.jump_impulse * self.jump_impulse / (2.0 * self.gravity);
        self.ground_y() - self.player_height - rise
    }

    /// Check that the values describe a playable field
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("gravity", self.gravity),
            ("initial_speed", self.initial_speed),
            ("initial_spawn_interval_ms", self.initial_spawn_interval_ms),
            ("min_spawn_interval_ms", self.min_spawn_interval_ms),
            ("entity_width", self.entity_width),
            ("entity_height", self.entity_height),
            ("max_frame_dt", self.max_frame_dt),
        ];
        for (field, value) in positive {
            // Written as a negated comparison so NaN is rejected too
            if !(value > 0.0) {
                return Err(TuningError::NonPositive { field, value });
            }
        }

        if !(0.0..=1.0).contains(&self.obstacle_probability) {
            return Err(TuningError::Probability(self.obstacle_probability));
        }
        if !(self.spawn_interval_decay > 0.0 && self.spawn_interval_decay <= 1.0) {
            return Err(TuningError::Decay(self.spawn_interval_decay));
        }
        if self.min_spawn_interval_ms > self.initial_spawn_interval_ms {
            return Err(TuningError::FloorAboveInitial {
                floor_ms: self.min_spawn_interval_ms,
                initial_ms: self.initial_spawn_interval_ms,
            });
        }
        if !(self.jump_impulse < 0.0) {
            return Err(TuningError::JumpImpulse(self.jump_impulse));
        }
        if self.speed_ramp.amount() < 0.0 {
            return Err(TuningError::NegativeRamp(self.speed_ramp.amount()));
        }
        if self.player_height > self.ground_y() {
            return Err(TuningError::PlayerTooTall);
        }

        // Collectibles must pass over a runner on the ground yet stay within a jump
        let lane_bottom = self.collectible_y() + self.entity_height;
        let player_top = self.ground_y() - self.player_height;
        if lane_bottom > player_top {
            return Err(TuningError::CollectibleBlocksRunner {
                lane_bottom,
                player_top,
            });
        }
        let apex_top = self.jump_apex_top();
        if lane_bottom <= apex_top {
            return Err(TuningError::CollectibleUnreachable {
                lane_bottom,
                apex_top,
            });
        }

        Ok(())
    }
}
