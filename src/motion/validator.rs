// src/motion/validator.rs - Pre-motion feasibility checks
use super::{MotionError, MotionRequest};

/// Check whether `request` admits a trapezoidal profile.
///
/// Rules are evaluated in a fixed order and the first violation is returned.
pub fn validate(request: &MotionRequest) -> Result<(), MotionError> {
    check(request).inspect_err(|e| tracing::error!("Rejected motion request {:?}: {}", request, e))
}

/// Boolean form of [`validate`].
pub fn is_feasible(request: &MotionRequest) -> bool {
    validate(request).is_ok()
}

fn check(request: &MotionRequest) -> Result<(), MotionError> {
    if let Some((field, _)) = request.fields().into_iter().find(|(_, v)| !v.is_finite()) {
        return Err(MotionError::NonFiniteInput { field });
    }

    let MotionRequest {
        initial_position,
        initial_velocity,
        goal_position,
        max_velocity,
        max_acceleration,
    } = *request;

    if max_velocity == 0.0 {
        return Err(MotionError::ZeroCruiseVelocity);
    }
    if max_velocity > 0.0 && initial_velocity > 0.0 && max_velocity < initial_velocity {
        return Err(MotionError::VelocityLimitBelowInitial {
            max_velocity,
            initial_velocity,
        });
    }
    if max_velocity > 0.0 && initial_velocity < 0.0 && goal_position < initial_position {
        return Err(MotionError::UnreachableGoalDirection {
            initial_position,
            goal_position,
        });
    }
    if max_velocity < 0.0 && initial_velocity < 0.0 && max_velocity.abs() < initial_velocity.abs() {
        return Err(MotionError::VelocityLimitBelowInitial {
            max_velocity,
            initial_velocity,
        });
    }
    if max_acceleration < 0.0 {
        return Err(MotionError::NegativeAcceleration(max_acceleration));
    }
    if max_acceleration == 0.0 {
        return Err(MotionError::ZeroAcceleration);
    }
    if initial_position == goal_position {
        return Err(MotionError::ZeroDistanceGoal(initial_position));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(p0: f64, v0: f64, goal: f64, vmax: f64, amax: f64) -> MotionRequest {
        MotionRequest::new(p0, v0, goal, vmax, amax)
    }

    #[test]
    fn test_rejection_reasons() {
        assert_eq!(validate(&req(10.0, -5.0, 0.0, 0.0, 10.0)), Err(MotionError::ZeroCruiseVelocity));
        assert!(matches!(
            validate(&req(0.0, 20.0, 100.0, 10.0, 2.0)),
            Err(MotionError::VelocityLimitBelowInitial { .. })
        ));
        assert!(matches!(
            validate(&req(10.0, -5.0, 0.0, 5.0, 10.0)),
            Err(MotionError::UnreachableGoalDirection { .. })
        ));
        assert!(matches!(
            validate(&req(10.0, -5.0, 0.0, -4.0, 10.0)),
            Err(MotionError::VelocityLimitBelowInitial { .. })
        ));
        assert_eq!(
            validate(&req(0.0, 0.0, 100.0, 20.0, -2.0)),
            Err(MotionError::NegativeAcceleration(-2.0))
        );
        assert_eq!(validate(&req(0.0, 0.0, 100.0, 20.0, 0.0)), Err(MotionError::ZeroAcceleration));
        assert_eq!(validate(&req(5.0, 0.0, 5.0, 20.0, 2.0)), Err(MotionError::ZeroDistanceGoal(5.0)));
    }

    #[test]
    fn test_first_violation_wins() {
        // Zero velocity and zero distance at once: velocity is checked first.
        assert_eq!(validate(&req(5.0, 0.0, 5.0, 0.0, 2.0)), Err(MotionError::ZeroCruiseVelocity));
        // Negative acceleration is reported before zero distance.
        assert_eq!(
            validate(&req(5.0, 0.0, 5.0, 10.0, -1.0)),
            Err(MotionError::NegativeAcceleration(-1.0))
        );
    }

    #[test]
    fn test_non_finite_inputs() {
        assert_eq!(
            validate(&req(0.0, 0.0, f64::NAN, 10.0, 1.0)),
            Err(MotionError::NonFiniteInput { field: "goal_position" })
        );
        assert_eq!(
            validate(&req(0.0, 0.0, 100.0, 10.0, f64::INFINITY)),
            Err(MotionError::NonFiniteInput { field: "max_acceleration" })
        );
    }

    #[test]
    fn test_accepts_reverse_travel_with_resting_start() {
        assert!(is_feasible(&req(100.0, 0.0, 0.0, 10.0, 1.0)));
        assert!(is_feasible(&req(0.0, -20.0, 50.0, 10.0, 2.0)));
        assert!(is_feasible(&req(0.0, 10.0, 100.0, 10.0, 1.0)));
    }
}
