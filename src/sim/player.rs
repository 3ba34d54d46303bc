//! Player physics body
//!
//! The runner never moves horizontally; it only jumps and falls back onto the
//! ground line under constant gravity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::Tuning;

/// The player's body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (pixels/s, negative is up)
    pub velocity_y: f32,
    pub on_ground: bool,
}

impl PlayerBody {
    /// A body standing on the ground line
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.player_x, tuning.ground_y() - tuning.player_height),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            velocity_y: 0.0,
            on_ground: true,
        }
    }

    /// Put the body back at its starting position
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Integrate gravity over `dt` seconds and land on the ground line
    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        debug_assert!(dt >= 0.0, "negative dt {dt}");
        if !self.on_ground {
            self.velocity_y += tuning.gravity * dt;
            self.pos.y += self.velocity_y * dt;
        }

        let ground = tuning.ground_y();
        if self.pos.y + self.size.y > ground {
            self.pos.y = ground - self.size.y;
            self.velocity_y = 0.0;
            self.on_ground = true;
        }
    }

    /// Start a jump if standing; returns whether a jump started
    pub fn jump(&mut self, tuning: &Tuning) -> bool {
        if !self.on_ground {
            return false;
        }
        self.velocity_y = tuning.jump_impulse;
        self.on_ground = false;
        true
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}
