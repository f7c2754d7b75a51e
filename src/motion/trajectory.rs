// src/motion/trajectory.rs - Fixed-step sampling of a planned move
use serde::{Deserialize, Serialize};

use super::{MotionError, MotionPlan, MotionRequest, Phase};
use crate::sink::{MemorySink, SampleSink, SinkError};

/// Sampling period used when none is configured.
pub const DEFAULT_TIME_STEP: f64 = 0.1;

/// One emitted point of the trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
}

impl Sample {
    /// Text record for the live viewer: `time,position,velocity,acceleration\n`, three decimals each.
    pub fn mirror_line(&self) -> String {
        format!(
            "{:.3},{:.3},{:.3},{:.3}\n",
            self.time, self.position, self.velocity, self.acceleration
        )
    }
}

/// Per-step trace handed to a diagnostics callback before the state advances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepDiagnostics {
    pub phase: Phase,
    pub time_elapsed: f64,
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub remaining_distance: f64,
    pub distance_covered: f64,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub plan: MotionPlan,
    pub samples_emitted: usize,
    pub final_sample: Sample,
}

#[derive(Debug, Clone, Copy)]
struct MotionState {
    time_elapsed: f64,
    position: f64,
    velocity: f64,
    acceleration: f64,
}

impl MotionState {
    fn reset(request: &MotionRequest) -> Self {
        Self {
            time_elapsed: 0.0,
            position: request.initial_position,
            velocity: request.initial_velocity,
            acceleration: request.max_acceleration,
        }
    }

    fn sample(&self) -> Sample {
        Sample {
            time: self.time_elapsed,
            position: self.position,
            velocity: self.velocity,
            acceleration: self.acceleration,
        }
    }

    fn accelerate(&mut self, max_acceleration: f64, speed_limit: f64, sign: f64, dt: f64) {
        self.acceleration = max_acceleration * sign;
        self.velocity = (self.velocity + self.acceleration * dt).clamp(-speed_limit, speed_limit);
        self.position += self.velocity * dt + 0.5 * self.acceleration * dt * dt;
    }

    fn cruise(&mut self, speed_limit: f64, sign: f64, dt: f64) {
        self.acceleration = 0.0;
        self.velocity = speed_limit * sign;
        self.position += self.velocity * dt;
    }

    fn decelerate(&mut self, max_acceleration: f64, sign: f64, dt: f64) {
        self.acceleration = -max_acceleration * sign;
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt + 0.5 * self.acceleration * dt * dt;
    }
}

type DiagnosticsFn<'a> = Box<dyn FnMut(&StepDiagnostics) + 'a>;

/// Walks a [`MotionPlan`] at a fixed time step, emitting one [`Sample`] per step.
///
/// Each step emits the current state before advancing it, so the first sample of a phase still
/// carries the acceleration of the phase before it. After the last step inside the plan one more
/// sample is emitted for the terminal state.
pub struct TrajectorySampler<'a> {
    request: MotionRequest,
    plan: MotionPlan,
    time_step: f64,
    diagnostics: Option<DiagnosticsFn<'a>>,
}

impl std::fmt::Debug for TrajectorySampler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrajectorySampler")
            .field("request", &self.request)
            .field("plan", &self.plan)
            .field("time_step", &self.time_step)
            .field("diagnostics", &self.diagnostics.is_some())
            .finish()
    }
}

impl<'a> TrajectorySampler<'a> {
    pub fn new(request: MotionRequest, plan: MotionPlan, time_step: f64) -> Result<Self, MotionError> {
        if !(time_step > 0.0 && time_step.is_finite()) {
            return Err(MotionError::InvalidTimeStep(time_step));
        }
        Ok(Self {
            request,
            plan,
            time_step,
            diagnostics: None,
        })
    }

    /// Install a callback that observes every step.
    pub fn with_diagnostics(mut self, callback: impl FnMut(&StepDiagnostics) + 'a) -> Self {
        self.diagnostics = Some(Box::new(callback));
        self
    }

    pub fn plan(&self) -> &MotionPlan {
        &self.plan
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Sample the whole move into `sink`, stopping at the first sink failure.
    pub fn run<S: SampleSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunSummary, SinkError> {
        let dt = self.time_step;
        let sign = self.plan.direction.sign();
        let speed_limit = self.request.max_velocity.abs();
        let max_acceleration = self.request.max_acceleration;

        let mut state = MotionState::reset(&self.request);
        let mut step: u64 = 0;
        let mut samples_emitted = 0;

        while state.time_elapsed <= self.plan.total_time {
            let phase = self.plan.phase_at(state.time_elapsed);
            self.observe(phase, &state);
            emit(sink, state.sample())?;
            samples_emitted += 1;

            match phase {
                Phase::Accelerating => state.accelerate(max_acceleration, speed_limit, sign, dt),
                Phase::Cruising => state.cruise(speed_limit, sign, dt),
                Phase::Decelerating => state.decelerate(max_acceleration, sign, dt),
            }
            step += 1;
            // Multiplying avoids drift from repeated addition.
            state.time_elapsed = step as f64 * dt;
        }

        let final_sample = state.sample();
        emit(sink, final_sample)?;
        samples_emitted += 1;
        sink.finish().inspect_err(|e| tracing::error!("Failed to finish sample sink: {}", e))?;

        tracing::debug!(
            "Sampled {} points, terminal state at t={:.3}: position={:.3} velocity={:.3}",
            samples_emitted,
            final_sample.time,
            final_sample.position,
            final_sample.velocity
        );
        Ok(RunSummary {
            plan: self.plan,
            samples_emitted,
            final_sample,
        })
    }

    /// Sample the whole move into memory.
    pub fn collect(&mut self) -> Vec<Sample> {
        let mut sink = MemorySink::new();
        if let Err(e) = self.run(&mut sink) {
            tracing::error!("Collecting samples into memory failed: {}", e);
        }
        sink.into_samples()
    }

    fn observe(&mut self, phase: Phase, state: &MotionState) {
        let Some(callback) = self.diagnostics.as_mut() else {
            return;
        };
        let remaining_distance = self.request.goal_position - state.position;
        callback(&StepDiagnostics {
            phase,
            time_elapsed: state.time_elapsed,
            position: state.position,
            velocity: state.velocity,
            acceleration: state.acceleration,
            remaining_distance,
            distance_covered: self.plan.total_distance - remaining_distance,
        });
    }
}

fn emit<S: SampleSink + ?Sized>(sink: &mut S, sample: Sample) -> Result<(), SinkError> {
    sink.accept(sample).inspect_err(|e| {
        tracing::error!("Sample sink failed at t={:.3}, aborting run: {}", sample.time, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::plan;

    fn sampler(request: MotionRequest) -> TrajectorySampler<'static> {
        let plan = plan(&request).unwrap();
        TrajectorySampler::new(request, plan, DEFAULT_TIME_STEP).unwrap()
    }

    #[test]
    fn test_rejects_bad_time_step() {
        let request = MotionRequest::new(0.0, 0.0, 100.0, 10.0, 1.0);
        let plan = plan(&request).unwrap();
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                TrajectorySampler::new(request, plan, dt),
                Err(MotionError::InvalidTimeStep(_))
            ));
        }
    }

    #[test]
    fn test_first_sample_is_reset_state() {
        let samples = sampler(MotionRequest::new(100.0, 0.0, 0.0, 10.0, 1.0)).collect();
        // Acceleration starts at the unsigned limit regardless of direction.
        assert_eq!(
            samples[0],
            Sample { time: 0.0, position: 100.0, velocity: 0.0, acceleration: 1.0 }
        );
        assert_eq!(samples[1].acceleration, -1.0);
        assert!((samples[1].velocity + 0.1).abs() < 1e-12);
        assert!((samples[1].position - 99.985).abs() < 1e-9);
    }

    #[test]
    fn test_exact_fit_sample_count_and_terminal() {
        let samples = sampler(MotionRequest::new(0.0, 0.0, 100.0, 10.0, 1.0)).collect();
        // 201 in-plan samples (t = 0.0 ..= 20.0) plus the terminal one.
        assert_eq!(samples.len(), 202);
        let at_total = samples[200];
        assert!((at_total.time - 20.0).abs() < 1e-9);
        assert!((at_total.position - 100.0).abs() < 1e-6);
        assert!(at_total.velocity.abs() < 1e-6);
        let last = samples[201];
        assert!((last.position - 100.0).abs() < 0.02);
        assert!((last.velocity + 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_phase_entry_sample_lags_one_step() {
        let samples = sampler(MotionRequest::new(0.0, 0.0, 200.0, 10.0, 1.0)).collect();
        // t = 10.0 opens the cruise but still shows the acceleration phase.
        assert!((samples[100].time - 10.0).abs() < 1e-9);
        assert_eq!(samples[100].acceleration, 1.0);
        assert_eq!(samples[101].acceleration, 0.0);
        assert_eq!(samples[101].velocity, 10.0);
        // Same at the cruise to deceleration handover.
        assert_eq!(samples[200].acceleration, 0.0);
        assert_eq!(samples[201].acceleration, -1.0);
    }

    #[test]
    fn test_velocity_never_exceeds_limit() {
        let samples = sampler(MotionRequest::new(0.0, -20.0, 50.0, 10.0, 2.0)).collect();
        assert_eq!(samples[0].velocity, -20.0);
        assert!(samples[1..].iter().all(|s| s.velocity.abs() <= 10.0));
    }

    #[test]
    fn test_diagnostics_see_every_in_plan_step() {
        let request = MotionRequest::new(0.0, 0.0, 200.0, 10.0, 1.0);
        let plan = plan(&request).unwrap();
        let mut seen = Vec::new();
        let summary = {
            let mut sampler = TrajectorySampler::new(request, plan, DEFAULT_TIME_STEP)
                .unwrap()
                .with_diagnostics(|d| seen.push(*d));
            sampler.run(&mut MemorySink::new()).unwrap()
        };
        assert_eq!(seen.len(), summary.samples_emitted - 1);
        assert_eq!(seen[0].remaining_distance, 200.0);
        assert_eq!(seen[0].distance_covered, 0.0);
        assert_eq!(seen[0].phase, Phase::Accelerating);
        assert_eq!(seen[150].phase, Phase::Cruising);
        assert_eq!(seen.last().unwrap().phase, Phase::Decelerating);
        for d in &seen {
            assert!((d.remaining_distance + d.distance_covered - 200.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_mirror_line_format() {
        let sample = Sample { time: 0.1, position: 0.015, velocity: -0.1, acceleration: 1.0 };
        assert_eq!(sample.mirror_line(), "0.100,0.015,-0.100,1.000\n");
    }
}
