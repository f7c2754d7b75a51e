// src/motion/planner.rs - Closed-form trapezoidal profile geometry
use serde::Serialize;

use super::{Direction, MotionError, MotionRequest};

/// Phase geometry of a single move.
///
/// Computed once per request by [`plan`]; never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionPlan {
    pub direction: Direction,
    pub acceleration_time: f64,
    pub acceleration_distance: f64,
    pub cruising_time: f64,
    /// Clamped to be non-negative.
    pub cruising_distance: f64,
    pub deceleration_time: f64,
    pub deceleration_distance: f64,
    pub total_time: f64,
    pub total_distance: f64,
    /// Set when the unclamped cruise distance was not positive.
    pub triangular: bool,
}

/// Segment of the profile the axis is in at a given elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Accelerating,
    Cruising,
    Decelerating,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Accelerating => "accelerating",
            Phase::Cruising => "cruising",
            Phase::Decelerating => "decelerating",
        };
        f.write_str(name)
    }
}

impl MotionPlan {
    /// Elapsed time at which cruising ends and deceleration begins.
    pub fn cruise_end(&self) -> f64 {
        self.acceleration_time + self.cruising_time
    }

    /// Phase at `time_elapsed`. A time equal to a boundary belongs to the later phase.
    pub fn phase_at(&self, time_elapsed: f64) -> Phase {
        if time_elapsed < self.acceleration_time {
            Phase::Accelerating
        } else if time_elapsed < self.cruise_end() {
            Phase::Cruising
        } else {
            Phase::Decelerating
        }
    }

    pub fn is_triangular(&self) -> bool {
        self.triangular
    }

    fn log_parameters(&self) {
        tracing::debug!(
            acceleration_time = self.acceleration_time,
            acceleration_distance = self.acceleration_distance,
            deceleration_time = self.deceleration_time,
            deceleration_distance = self.deceleration_distance,
            cruising_time = self.cruising_time,
            cruising_distance = self.cruising_distance,
            total_time = self.total_time,
            total_distance = self.total_distance,
            "Planned {:?} move",
            self.direction
        );
    }
}

/// Compute the phase durations and distances for `request`.
///
/// The request is expected to have passed [`super::validate`]; the only failure detected here is
/// a total time that is not strictly positive.
pub fn plan(request: &MotionRequest) -> Result<MotionPlan, MotionError> {
    let MotionRequest {
        initial_velocity,
        max_velocity,
        max_acceleration,
        ..
    } = *request;

    let direction = request.direction();
    let total_distance = request.total_distance();

    // v = v0 + a*t and s = v0*t + a*t^2/2, applied per phase
    let acceleration_time = ((max_velocity - initial_velocity) / max_acceleration).abs();
    let acceleration_distance =
        initial_velocity * acceleration_time + 0.5 * max_acceleration * acceleration_time.powi(2);

    let deceleration_time = (max_velocity / max_acceleration).abs();
    let deceleration_distance = 0.5 * max_acceleration * deceleration_time.powi(2);

    let raw_cruising_distance = total_distance - acceleration_distance - deceleration_distance;
    let triangular = raw_cruising_distance <= 0.0;
    if triangular {
        tracing::warn!(
            "Cannot follow a trapezoidal velocity curve with the given parameters, cruising distance is {}; \
             falling back to a triangular profile",
            raw_cruising_distance
        );
    }
    let cruising_distance = raw_cruising_distance.max(0.0);
    let cruising_time = cruising_distance / max_velocity.abs();

    let total_time = acceleration_time + cruising_time + deceleration_time;
    if !(total_time > 0.0 && total_time.is_finite()) {
        tracing::error!("Total motion time {} is not feasible", total_time);
        return Err(MotionError::InfeasibleTotalTime(total_time));
    }

    let plan = MotionPlan {
        direction,
        acceleration_time,
        acceleration_distance,
        cruising_time,
        cruising_distance,
        deceleration_time,
        deceleration_distance,
        total_time,
        total_distance,
        triangular,
    };
    plan.log_parameters();
    Ok(plan)
}
