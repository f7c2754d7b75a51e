// src/controller.rs - Single-axis controller: validate, plan, sample
use thiserror::Error;

use crate::motion::{
    plan, validate, MotionError, MotionPlan, MotionRequest, RunSummary, Sample, StepDiagnostics,
    TrajectorySampler, DEFAULT_TIME_STEP,
};
use crate::sink::{SampleSink, SinkError};

/// Failure of a controller run.
///
/// Planning failures happen before any sample is emitted; sink failures abort a run in progress.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("motion rejected: {0}")]
    Motion(#[from] MotionError),
    #[error("sample sink failed: {0}")]
    Sink(#[from] SinkError),
}

/// Construction-time options for an [`AxisController`].
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOptions {
    pub time_step: f64,
    /// Log plan parameters and every sampled step at debug level.
    pub trace: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            trace: false,
        }
    }
}

/// Owns the request for one axis and exposes its last known state.
#[derive(Debug, Clone)]
pub struct AxisController {
    request: MotionRequest,
    options: ControllerOptions,
    current_position: f64,
    current_velocity: f64,
    feasible: bool,
}

impl AxisController {
    /// Controller resting at a position with no goal yet. Running it before
    /// [`set_goal`](Self::set_goal) is rejected because the velocity limit is zero.
    pub fn new(initial_position: f64, initial_velocity: f64, options: ControllerOptions) -> Self {
        Self::with_request(
            MotionRequest::new(initial_position, initial_velocity, initial_position, 0.0, 0.0),
            options,
        )
    }

    pub fn with_request(request: MotionRequest, options: ControllerOptions) -> Self {
        Self {
            current_position: request.initial_position,
            current_velocity: request.initial_velocity,
            request,
            options,
            feasible: false,
        }
    }

    pub fn set_goal(&mut self, goal_position: f64, max_velocity: f64, max_acceleration: f64) {
        self.request.goal_position = goal_position;
        self.request.max_velocity = max_velocity;
        self.request.max_acceleration = max_acceleration;
    }

    pub fn request(&self) -> &MotionRequest {
        &self.request
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn current_position(&self) -> f64 {
        self.current_position
    }

    pub fn current_velocity(&self) -> f64 {
        self.current_velocity
    }

    /// Whether the last planning attempt succeeded.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Validate and plan the current request, updating the feasibility flag.
    pub fn plan(&mut self) -> Result<MotionPlan, MotionError> {
        let result = validate(&self.request).and_then(|_| plan(&self.request));
        self.feasible = result.is_ok();
        result
    }

    /// Plan the move and stream every sample into `sink`.
    ///
    /// Afterwards the current position and velocity are those of the last sample the sink
    /// accepted: the terminal sample on success, the last one before the failure otherwise.
    pub fn run<S: SampleSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunSummary, RunError> {
        let plan = self.plan()?;
        let sampler = TrajectorySampler::new(self.request, plan, self.options.time_step)?;
        let mut sampler = if self.options.trace {
            sampler.with_diagnostics(trace_step)
        } else {
            sampler
        };

        tracing::info!(
            "Moving from {} to {} over {:.3}s ({} profile)",
            self.request.initial_position,
            self.request.goal_position,
            plan.total_time,
            if plan.is_triangular() { "triangular" } else { "trapezoidal" }
        );
        let mut tracked = Tracked { inner: sink, last: None };
        let result = sampler.run(&mut tracked);
        if let Some(last) = tracked.last {
            self.current_position = last.position;
            self.current_velocity = last.velocity;
        }
        let summary = result?;

        tracing::info!(
            "Move finished after {} samples at position {:.3}",
            summary.samples_emitted,
            self.current_position
        );
        Ok(summary)
    }
}

/// Remembers the last sample the wrapped sink accepted.
struct Tracked<'s, S: ?Sized> {
    inner: &'s mut S,
    last: Option<Sample>,
}

impl<S: SampleSink + ?Sized> SampleSink for Tracked<'_, S> {
    fn accept(&mut self, sample: Sample) -> Result<(), SinkError> {
        self.inner.accept(sample)?;
        self.last = Some(sample);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.inner.finish()
    }
}

fn trace_step(step: &StepDiagnostics) {
    tracing::debug!(
        phase = %step.phase,
        time_elapsed = step.time_elapsed,
        position = step.position,
        velocity = step.velocity,
        acceleration = step.acceleration,
        remaining_distance = step.remaining_distance,
        distance_covered = step.distance_covered,
        "step"
    );
}
