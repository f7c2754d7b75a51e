// src/main.rs - Plan a single-axis move and write its trajectory
use std::path::PathBuf;

use clap::Parser;
use trapezoid_rs::config::{self, Config, OutputFormat};
use trapezoid_rs::{AxisController, CsvSink, FanoutSink, JsonLinesSink, MirrorSink};

/// Trapezoidal velocity profile generator
#[derive(Parser, Debug)]
#[command(name = "trapezoid", version, about = "Plan and sample a trapezoidal motion profile for one stepper axis.")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial position of the stepper motor
    #[arg(long, allow_negative_numbers = true)]
    initial_pos: Option<f64>,

    /// Initial velocity of the stepper motor
    #[arg(long, allow_negative_numbers = true)]
    initial_vel: Option<f64>,

    /// Goal position of the stepper motor
    #[arg(long, allow_negative_numbers = true)]
    goal_pos: Option<f64>,

    /// Maximum velocity of the stepper motor
    #[arg(long, allow_negative_numbers = true)]
    max_vel: Option<f64>,

    /// Maximum acceleration of the stepper motor
    #[arg(long, allow_negative_numbers = true)]
    max_acc: Option<f64>,

    /// Trajectory output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Trajectory output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Skip writing the trajectory file
    #[arg(long)]
    no_output: bool,

    /// Mirror samples to a live viewer at this address (e.g. 127.0.0.1:8082)
    #[arg(long)]
    mirror: Option<String>,

    /// Delay after each mirrored sample, in milliseconds
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Sampling period
    #[arg(long)]
    time_step: Option<f64>,

    /// Log plan parameters and every step
    #[arg(long)]
    trace: bool,
}

impl Cli {
    /// Command-line values take precedence over the config file.
    fn apply(&self, config: &mut Config) {
        let request = &mut config.request;
        if let Some(v) = self.initial_pos { request.initial_position = v; }
        if let Some(v) = self.initial_vel { request.initial_velocity = v; }
        if let Some(v) = self.goal_pos { request.goal_position = v; }
        if let Some(v) = self.max_vel { request.max_velocity = v; }
        if let Some(v) = self.max_acc { request.max_acceleration = v; }

        if let Some(path) = &self.output {
            config.output.path = path.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.no_output {
            config.output.enabled = false;
        }
        if let Some(address) = &self.mirror {
            config.mirror.enabled = true;
            config.mirror.address = address.clone();
        }
        if let Some(pacing_ms) = self.pacing_ms {
            config.mirror.pacing_ms = pacing_ms;
        }
        if let Some(dt) = self.time_step {
            config.sampler.time_step = dt;
        }
        config.trace |= self.trace;
    }
}

fn build_sinks(config: &Config) -> Result<FanoutSink, trapezoid_rs::SinkError> {
    let mut sinks = FanoutSink::new();
    if config.output.enabled {
        match config.output.format {
            OutputFormat::Csv => sinks.push(Box::new(CsvSink::create(&config.output.path)?)),
            OutputFormat::Jsonl => sinks.push(Box::new(JsonLinesSink::create(&config.output.path)?)),
        }
    }
    if config.mirror.enabled {
        sinks.push(Box::new(MirrorSink::connect(
            config.mirror.address.as_str(),
            config.mirror.pacing(),
        )?));
    }
    Ok(sinks)
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(&path.to_string_lossy())?,
        None => Config::default(),
    };
    cli.apply(&mut config);

    // Initialize logging
    let level = if config.trace { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Some(path) = &cli.config {
        tracing::info!("Loaded configuration from: {}", path.display());
    }
    config.validate().map_err(|e| {
        tracing::error!("{}", e);
        Box::new(e) as Box<dyn std::error::Error + Send + Sync + 'static>
    })?;

    let request = config.request;
    tracing::info!(
        "Request: position {} -> {}, initial velocity {}, max velocity {}, max acceleration {}",
        request.initial_position,
        request.goal_position,
        request.initial_velocity,
        request.max_velocity,
        request.max_acceleration
    );

    // Reject before any output file is truncated or the viewer is dialed.
    let mut controller = AxisController::with_request(request, config.controller_options());
    if let Err(e) = controller.plan() {
        tracing::error!("Motion rejected: {}", e);
        return Err(e.into());
    }

    let mut sinks = build_sinks(&config)?;
    if sinks.is_empty() {
        tracing::warn!("No output enabled, samples will be discarded");
    }

    match controller.run(&mut sinks) {
        Ok(summary) => {
            tracing::info!(
                "Total time {:.3}s, final position {:.3}, final velocity {:.3}",
                summary.plan.total_time,
                controller.current_position(),
                controller.current_velocity()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
