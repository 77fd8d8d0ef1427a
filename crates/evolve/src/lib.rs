//! Evolutionary search over wheeled-robot designs and controller gains.
//!
//! # Algorithm
//!
//! A genome of eight genes in `[0, 1]` scales onto a [`Design`]: wheel
//! radius, chassis length, suspension frequency and damping, sensor limit,
//! and the controller's speed limit, slope and intercept. Each design is
//! scored by driving it over a step toward a wall at engine fidelity (see
//! [`evaluate`]).
//!
//! Every generation:
//!
//! 1. Tournament selection picks one parent per slot.
//! 2. Gaussian mutation perturbs each parent gene with a fixed rate, always
//!    mutating at least one gene.
//! 3. The children are evaluated.
//! 4. The fittest individual of the previous generation replaces the last
//!    child.
//!
//! The search stops after `max_generations`, when the best fitness has not
//! improved for `stagnation_limit` generations, or when an observer asks.
//!
//! # Fitness
//!
//! [`Fitness`] compares feasibility before the objective. A design whose
//! wheels do not fit under its chassis is infeasible and never simulated.
//! Feasible designs earn up to four points for stopping close to the target,
//! at rest, without touching the wall, with small wheels and settling early.
//!
//! # Observer Events
//!
//! The search emits one [`Generation`] after the initial population is
//! evaluated and one after each later generation. Observers can return
//! [`Action::StopEarly`] to end the search with the current population.

mod config;
mod error;
mod event;
mod fitness;
mod genome;
mod population;
mod search;
mod solution;
mod stagnation;

#[cfg(test)]
mod tests;

pub use config::{Config, ConfigError, Scenario};
pub use error::Error;
pub use event::{Action, Generation};
pub use fitness::{Assessment, Breakdown, Fitness, evaluate, index_at_rest};
pub use genome::{Design, GENE_COUNT, GENES, Gene, Genome};
pub use population::{Individual, Statistics, fittest};
pub use solution::{Solution, Status};

use cadence_core::Observer;

/// Runs the evolutionary search.
///
/// The observer receives a [`Generation`] for the initial population and each
/// bred generation.
///
/// # Errors
///
/// Returns an error if the config is invalid or a design produces an invalid
/// robot.
pub fn evolve<Obs>(config: &Config, observer: Obs) -> Result<Solution, Error>
where
    Obs: Observer<Generation, Action>,
{
    search::search(config, observer)
}

/// Runs the evolutionary search without observer support.
///
/// # Errors
///
/// Returns an error if the config is invalid or a design produces an invalid
/// robot.
pub fn evolve_unobserved(config: &Config) -> Result<Solution, Error> {
    evolve(config, ())
}
