//! # Design Search
//!
//! Evolves wheel size, chassis length, sensor range and controller gains so
//! the robot stops close to a target in front of a wall, then writes the
//! final population and per-generation statistics to `<name>-evolution.json`.
//!
//! ```sh
//! cargo run -p cadence-examples --example evolution --release -- --name run1
//! cargo run -p cadence-examples --example evolution --release -- \
//!     --config crates/examples/configs/evolution.toml --name quick
//! ```

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use cadence_evolve::{
    Assessment, Config, Design, Fitness, Generation, Individual, Statistics, Status, evaluate,
    evolve,
};
use cadence_examples::{init_tracing, load_config};
use clap::Parser;
use serde::Serialize;
use tracing::info;

/// Run an evolutionary search over robot designs.
#[derive(Parser)]
#[command(name = "evolution", version, about, long_about = None)]
struct Cli {
    /// Prefix for the output file
    name: String,

    /// TOML file with search parameters
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    population_size: Option<usize>,

    #[arg(long)]
    num_generations: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct Member {
    design: Design,
    fitness: Fitness,
}

#[derive(Serialize)]
struct Report {
    name: String,
    status: Status,
    generations: usize,
    best: Design,
    assessment: Assessment,
    history: Vec<Statistics>,
    population: Vec<Member>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let mut config: Config = load_config(cli.config.as_deref())?;
    if let Some(size) = cli.population_size {
        config.population_size = size;
    }
    if let Some(generations) = cli.num_generations {
        config.max_generations = generations;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let solution = evolve(&config, |event: &Generation| {
        let stats = &event.statistics;
        println!(
            "generation {:4}  best {:7.4}  average {:7.4}  worst {:7.4}  stagnant {}",
            event.generation,
            stats.best.objective,
            stats.average.objective,
            stats.worst.objective,
            event.stagnant_for,
        );
        None
    })
    .context("search failed")?;

    let assessment = evaluate(&solution.best.genome, &config.scenario)
        .context("failed to re-evaluate the best design")?;
    let best = solution.best.genome.design();

    info!(status = ?solution.status, objective = assessment.fitness.objective, "search done");
    println!("{}", cli.name);
    println!("{best:#?}");
    println!("{assessment:#?}");

    let report = Report {
        name: cli.name.clone(),
        status: solution.status,
        generations: solution.generations,
        best,
        assessment,
        history: solution.history,
        population: solution
            .population
            .iter()
            .map(|Individual { genome, fitness }| Member {
                design: genome.design(),
                fitness: *fitness,
            })
            .collect(),
    };

    let path = format!("{}-evolution.json", cli.name);
    let json = serde_json::to_string_pretty(&report).context("failed to serialize results")?;
    fs::write(&path, json).with_context(|| format!("failed to write {path}"))?;
    info!(%path, "wrote results");

    Ok(())
}
