//! RC Runner - a side-scrolling reflex runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, spawning, collisions, scoring)
//! - `session`: Idle/Running/Over state machine and frame scheduling
//! - `tuning`: Data-driven game balance

pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{FrameScheduler, Session};
pub use tuning::{SpeedRamp, Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Nominal frame step (60 Hz) used by the headless driver
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Play field dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 400.0;
    /// Height of the ground strip; the ground line sits this far above the field bottom
    pub const GROUND_OFFSET: f32 = 10.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 1200.0;
    /// Initial upward velocity of a jump (pixels/s, negative is up)
    pub const JUMP_IMPULSE: f32 = -600.0;

    /// Horizontal entity speed at session start (pixels/s)
    pub const INITIAL_SPEED: f32 = 250.0;
    /// Legacy speed increase applied once per tick
    pub const SPEED_INCREMENT_PER_TICK: f32 = 0.2;

    /// Spawn cadence
    pub const INITIAL_SPAWN_INTERVAL_MS: f32 = 1500.0;
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.99;
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 700.0;
    /// Chance that a spawn is an obstacle rather than a collectible
    pub const OBSTACLE_PROBABILITY: f64 = 0.65;

    /// Spawned entity box
    pub const ENTITY_WIDTH: f32 = 30.0;
    pub const ENTITY_HEIGHT: f32 = 30.0;
    /// Distance from the field bottom to the top edge of a spawned collectible
    pub const COLLECTIBLE_DROP: f32 = 120.0;

    /// Largest delta a single frame may feed the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}
