// src/motion/request.rs - Problem instance for one axis move
use serde::{Deserialize, Serialize};

/// Direction of travel along the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Direction from `from` towards `to`. Equal positions count as forward.
    pub fn between(from: f64, to: f64) -> Self {
        if to < from {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

/// The five scalars describing a single move.
///
/// Units are whatever the caller uses consistently (steps, steps/s, steps/s²).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionRequest {
    pub initial_position: f64,
    pub initial_velocity: f64,
    pub goal_position: f64,
    pub max_velocity: f64,
    pub max_acceleration: f64,
}

impl MotionRequest {
    pub fn new(
        initial_position: f64,
        initial_velocity: f64,
        goal_position: f64,
        max_velocity: f64,
        max_acceleration: f64,
    ) -> Self {
        Self {
            initial_position,
            initial_velocity,
            goal_position,
            max_velocity,
            max_acceleration,
        }
    }

    pub fn direction(&self) -> Direction {
        Direction::between(self.initial_position, self.goal_position)
    }

    pub fn total_distance(&self) -> f64 {
        (self.goal_position - self.initial_position).abs()
    }

    /// Named fields, in declaration order. Used for input diagnostics.
    pub(crate) fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("initial_position", self.initial_position),
            ("initial_velocity", self.initial_velocity),
            ("goal_position", self.goal_position),
            ("max_velocity", self.max_velocity),
            ("max_acceleration", self.max_acceleration),
        ]
    }
}
