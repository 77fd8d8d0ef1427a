//! # Transport Replay
//!
//! Records a headless robot run, then plays it back through a transport in
//! real time. The transport advances one timeline position per fixed step of
//! wall-clock time and hands the current time to a playback that prints the
//! recorded sample.
//!
//! ```sh
//! cargo run -p cadence-examples --example player
//! cargo run -p cadence-examples --example player -- --speed 4 --from 10
//! ```

use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result, ensure};
use cadence_core::whole_steps;
use cadence_examples::{init_tracing, load_config};
use cadence_player::{DrainPolicy, Playback, Transport};
use cadence_wmr::{
    Fidelity, Wmr, WmrConfig,
    runner::{self, Sample},
};
use clap::Parser;
use tracing::info;

/// Replay a recorded robot run through the transport controls.
#[derive(Parser)]
#[command(name = "player", version, about, long_about = None)]
struct Cli {
    /// TOML file with robot, controller and arena parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// How motion is computed: closed-form, numerical or engine
    #[arg(long, default_value = "engine")]
    fidelity: Fidelity,

    /// Seconds of simulated time to record
    #[arg(long, default_value_t = 20.0)]
    duration: f64,

    /// Timeline seconds between playback positions
    #[arg(long, default_value_t = 0.1)]
    step: f64,

    /// Playback speed relative to the wall clock
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Timeline seconds to scrub to before playing
    #[arg(long)]
    from: Option<f64>,

    /// Take every step that has elapsed on a tick instead of at most one
    #[arg(long)]
    catch_up: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Prints the recorded sample nearest to the timeline time.
struct Replay {
    samples: Vec<Sample>,
    fixed_step: f64,
    shown: Option<usize>,
}

impl Replay {
    fn sample_at(&self, time: f64) -> Option<&Sample> {
        let index = whole_steps(time, self.fixed_step).min(self.samples.len().saturating_sub(1));
        self.samples.get(index)
    }
}

impl Playback for Replay {
    fn update(&mut self, time: f64) {
        let Some(sample) = self.sample_at(time).copied() else {
            return;
        };
        if self.shown == Some(sample.step) {
            return;
        }
        self.shown = Some(sample.step);
        println!(
            "{time:6.2}  x = {:7.3}  ω = {:6.3}  d = {:6.3}{}",
            sample.location,
            sample.speed,
            sample.distance,
            if sample.contact { "  [contact]" } else { "" },
        );
    }

    fn reset(&mut self) {
        self.shown = None;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    ensure!(cli.speed > 0.0, "--speed must be positive");

    let config: WmrConfig = load_config(cli.config.as_deref())?;
    let mut wmr = Wmr::new(config, cli.fidelity).context("invalid robot configuration")?;
    let run = runner::run_unobserved(&mut wmr, cli.duration);
    info!(steps = run.steps, hit_wall = run.hit_wall(), "recorded run");

    let replay = Replay {
        samples: run.samples,
        fixed_step: wmr.fixed_step().seconds(),
        shown: None,
    };

    let policy = if cli.catch_up {
        DrainPolicy::CatchUp
    } else {
        DrainPolicy::SingleStep
    };
    let mut transport = Transport::new(cli.duration, cli.step, replay)
        .context("invalid timeline")?
        .with_policy(policy);

    if let Some(from) = cli.from {
        transport.scrub(whole_steps(from, cli.step));
    }

    info!(
        positions = transport.num_steps(),
        start = %transport.label(),
        "playing"
    );

    let start = Instant::now();
    transport.start();
    while transport.is_running() {
        let now = start.elapsed().mul_f64(cli.speed);
        transport.tick(now);
        thread::sleep(Duration::from_millis(5));
    }

    info!(position = transport.position(), time = %transport.label(), "stopped");
    Ok(())
}
