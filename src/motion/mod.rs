// src/motion/mod.rs - Single-axis trapezoidal motion: validation, planning, sampling

pub mod planner;
pub mod request;
pub mod trajectory;
pub mod validator;

pub use planner::{plan, MotionPlan, Phase};
pub use request::{Direction, MotionRequest};
pub use trajectory::{RunSummary, Sample, StepDiagnostics, TrajectorySampler, DEFAULT_TIME_STEP};
pub use validator::{is_feasible, validate};

use thiserror::Error;

/// Reasons a motion request cannot be planned or sampled.
///
/// Every variant is detected before the first sample is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MotionError {
    #[error("{field} is not a finite number")]
    NonFiniteInput { field: &'static str },
    #[error("max velocity is 0, the axis would cruise forever")]
    ZeroCruiseVelocity,
    #[error("max velocity {max_velocity} is below initial velocity {initial_velocity}")]
    VelocityLimitBelowInitial { max_velocity: f64, initial_velocity: f64 },
    #[error(
        "goal position {goal_position} lies behind initial position {initial_position} \
         but the velocity limit only permits forward travel"
    )]
    UnreachableGoalDirection { initial_position: f64, goal_position: f64 },
    #[error("max acceleration cannot be negative: {0}")]
    NegativeAcceleration(f64),
    #[error("max acceleration is 0, phase durations are undefined")]
    ZeroAcceleration,
    #[error("initial and goal position are both {0}, the axis would not move")]
    ZeroDistanceGoal(f64),
    #[error("total motion time {0} is not positive")]
    InfeasibleTotalTime(f64),
    #[error("time step must be finite and positive, got {0}")]
    InvalidTimeStep(f64),
}
