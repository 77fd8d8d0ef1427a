//! # Wheeled Robot Demo
//!
//! Drives the robot toward a wall at a chosen fidelity and prints its state
//! as it goes. Frames arrive either at a fixed rate or paced in real time by
//! the wall clock, and the fixed-step driver turns each frame delta into
//! whole simulation steps.
//!
//! ```sh
//! cargo run -p cadence-examples --example wmr_demo -- --fidelity engine
//! cargo run -p cadence-examples --example wmr_demo -- \
//!     --config crates/examples/configs/open_loop.toml --fidelity numerical
//! cargo run -p cadence-examples --example wmr_demo --features plot -- --plot
//! ```

use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result, ensure};
use cadence_examples::{init_tracing, load_config};
use cadence_observers::{SAMPLE_TRACES, SeriesRecorder};
use cadence_wmr::{Fidelity, Wmr, WmrConfig};
use clap::Parser;
use tracing::info;
use uom::si::{f64::Time, time::second};

/// Drive a wheeled robot toward a wall.
#[derive(Parser)]
#[command(name = "wmr_demo", version, about, long_about = None)]
struct Cli {
    /// TOML file with robot, controller and arena parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// How motion is computed: closed-form, numerical or engine
    #[arg(long, default_value = "engine")]
    fidelity: Fidelity,

    /// Seconds of simulated time
    #[arg(long, default_value_t = 20.0)]
    duration: f64,

    /// Frames per second of the host loop
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Pace frames with the wall clock instead of a fixed frame delta
    #[arg(long)]
    realtime: bool,

    /// Seconds of simulated time between status lines
    #[arg(long, default_value_t = 1.0)]
    report_every: f64,

    /// Show the recorded traces in a window when done
    #[arg(long)]
    plot: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    ensure!(cli.fps > 0.0, "--fps must be positive");
    ensure!(cli.duration >= 0.0, "--duration must not be negative");

    let config: WmrConfig = load_config(cli.config.as_deref())?;
    let mut wmr = Wmr::new(config, cli.fidelity).context("invalid robot configuration")?;

    info!(
        fidelity = %wmr.fidelity(),
        fixed_step = wmr.fixed_step().seconds(),
        location = wmr.location(),
        "starting"
    );

    let mut series = SeriesRecorder::new(SAMPLE_TRACES);
    let frame = Duration::from_secs_f64(1.0 / cli.fps);
    let mut last = Instant::now();
    let mut next_report = 0.0;
    let mut frames = 0_u64;
    let mut steps = 0;

    while wmr.logical_seconds() < cli.duration {
        let delta = if cli.realtime {
            thread::sleep(frame);
            let now = Instant::now();
            let delta = now - last;
            last = now;
            delta
        } else {
            frame
        };

        steps += wmr.advance(Time::new::<second>(delta.as_secs_f64()));
        frames += 1;

        let time = wmr.logical_seconds();
        series.record(
            time,
            [
                Some(wmr.location()),
                Some(wmr.angular_velocity()),
                Some(wmr.sensor_distance()),
            ],
        );

        if time >= next_report {
            println!(
                "t = {time:6.2} s  x = {:7.3}  ω = {:6.3}  d = {:6.3}{}",
                wmr.location(),
                wmr.angular_velocity(),
                wmr.sensor_distance(),
                if wmr.in_contact() { "  [contact]" } else { "" },
            );
            next_report += cli.report_every;
        }
    }

    info!(frames, steps, location = wmr.location(), "done");

    if cli.plot {
        let walls: Vec<f64> = wmr.config().arena.walls.iter().map(|w| w.x).collect();
        show(series, cli.fidelity, &walls)?;
    }

    Ok(())
}

#[cfg(feature = "plot")]
fn show(series: SeriesRecorder<3>, fidelity: Fidelity, walls: &[f64]) -> Result<()> {
    use cadence_observers::{PlotObserver, ShowConfig};

    let options = walls.iter().fold(
        ShowConfig::new().title(format!("WMR ({fidelity})")).legend(),
        |options, &x| options.reference("wall", x),
    );
    PlotObserver::from(series)
        .show(options)
        .map_err(|e| anyhow::anyhow!("failed to open plot window: {e}"))
}

#[cfg(not(feature = "plot"))]
fn show(_series: SeriesRecorder<3>, _fidelity: Fidelity, _walls: &[f64]) -> Result<()> {
    anyhow::bail!("plotting needs the `plot` feature")
}
