//! # trapezoid-rs
//!
//! Plans and samples one-dimensional trapezoidal velocity profiles for a single axis such as a
//! stepper motor.
//!
//! - [`motion`] validates a [`MotionRequest`], computes its [`MotionPlan`] in closed form and
//!   samples it at a fixed time step.
//! - [`sink`] holds the consumers the samples are streamed into (CSV, JSON lines, live TCP mirror).
//! - [`controller`] ties the two together and keeps the queryable axis state.
//! - [`config`] loads run settings from TOML.
//!
//! ```rust
//! use trapezoid_rs::{AxisController, ControllerOptions, MemorySink, MotionRequest};
//!
//! let request = MotionRequest::new(0.0, 0.0, 100.0, 10.0, 1.0);
//! let mut controller = AxisController::with_request(request, ControllerOptions::default());
//! let mut sink = MemorySink::new();
//! let summary = controller.run(&mut sink).unwrap();
//! assert_eq!(summary.plan.total_time, 20.0);
//! assert!((controller.current_position() - 100.0).abs() < 0.02);
//! ```

pub mod config;
pub mod controller;
pub mod motion;
pub mod sink;

pub use config::{load_config, Config, ConfigError};
pub use controller::{AxisController, ControllerOptions, RunError};
pub use motion::{
    is_feasible, plan, validate, Direction, MotionError, MotionPlan, MotionRequest, Phase,
    RunSummary, Sample, TrajectorySampler,
};
pub use sink::{CsvSink, FanoutSink, JsonLinesSink, MemorySink, MirrorSink, SampleSink, SinkError};
