use cadence_wmr::{Fidelity, Wmr, runner};
use serde::Serialize;
use tracing::trace;

use crate::{Genome, Scenario, genome::GENES, genome::SPEED_MAX};

/// Lexicographic fitness: feasibility first, then objective. Both are
/// maximized.
///
/// Feasibility is zero for a buildable design and negative by how much an
/// infeasible one overlaps, so any feasible design beats any infeasible one.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Fitness {
    pub feasibility: f64,
    pub objective: f64,
}

impl Fitness {
    /// The fitness of an individual that has not been evaluated.
    pub const UNEVALUATED: Fitness = Fitness {
        feasibility: f64::NEG_INFINITY,
        objective: f64::NEG_INFINITY,
    };

    #[must_use]
    pub fn is_feasible(&self) -> bool {
        self.feasibility >= 0.0
    }
}

/// The measurements behind a feasible design's objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breakdown {
    /// Final chassis location minus the target location.
    pub final_distance: f64,
    pub final_speed: f64,
    pub hit_wall: bool,
    pub wheel_radius: f64,
    /// Number of steps before the wheels came to rest for good.
    pub index_at_rest: usize,
    pub steps: usize,
}

/// A scored design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assessment {
    pub fitness: Fitness,
    /// Absent for infeasible designs, which are never simulated.
    pub breakdown: Option<Breakdown>,
}

/// Scores `genome` by simulating it at engine fidelity.
///
/// # Errors
///
/// Returns an error if a feasible design still produces an invalid robot
/// configuration.
pub fn evaluate(
    genome: &Genome,
    scenario: &Scenario,
) -> Result<Assessment, cadence_wmr::ConfigError> {
    let design = genome.design();

    let overlap = design.wheel_overlap();
    if overlap < 0.0 {
        return Ok(Assessment {
            fitness: Fitness {
                feasibility: overlap,
                objective: 0.0,
            },
            breakdown: None,
        });
    }

    let mut wmr = Wmr::new(scenario.robot(&design), Fidelity::Engine)?;
    let run = runner::run_unobserved(&mut wmr, scenario.duration);

    // Score the recorded steps, not the state before the first one.
    let series = &run.samples[1..];
    let speeds: Vec<f64> = series.iter().map(|s| s.speed).collect();
    let n = series.len();

    let (final_location, final_speed) = series
        .last()
        .map_or((scenario.initial_position, 0.0), |s| (s.location, s.speed));

    let breakdown = Breakdown {
        final_distance: final_location - scenario.target_location,
        final_speed,
        hit_wall: series.iter().any(|s| s.contact),
        wheel_radius: design.wheel_radius,
        index_at_rest: index_at_rest(&speeds, scenario.speed_tolerance),
        steps: n,
    };

    let objective = objective(&breakdown, genome, scenario);
    trace!(objective, ?breakdown, "evaluated design");

    Ok(Assessment {
        fitness: Fitness {
            feasibility: 0.0,
            objective,
        },
        breakdown: Some(breakdown),
    })
}

#[allow(clippy::cast_precision_loss)]
fn objective(breakdown: &Breakdown, genome: &Genome, scenario: &Scenario) -> f64 {
    let mut objective = 0.0;

    objective += 2.0 * (1.0 - breakdown.final_distance.abs() / scenario.initial_target_distance);
    objective += 1.0 - breakdown.final_speed.abs() / GENES[SPEED_MAX].hi;
    objective += if breakdown.hit_wall { 0.0 } else { 0.5 };
    objective += 0.25 * (1.0 - genome.genes()[0]);

    if breakdown.steps > 0 {
        objective += 0.25 * (1.0 - breakdown.index_at_rest as f64 / breakdown.steps as f64);
    }

    objective
}

/// The index just past the last step whose speed is not at rest, if the
/// series ends at rest. Otherwise, the series length.
///
/// A series that never leaves rest also scores the full length, since the
/// robot never went anywhere.
///
/// ```
/// use cadence_evolve::index_at_rest;
///
/// assert_eq!(index_at_rest(&[3.0, 1.0, 0.01, 0.0], 0.05), 2);
/// assert_eq!(index_at_rest(&[3.0, 0.0, 1.0], 0.05), 3);
/// assert_eq!(index_at_rest(&[0.0, 0.0], 0.05), 2);
/// ```
#[must_use]
pub fn index_at_rest(speeds: &[f64], tolerance: f64) -> usize {
    let at_rest = |s: &f64| s.abs() < tolerance;
    let ends_at_rest = speeds.last().is_some_and(at_rest);

    match speeds.iter().rposition(|s| !at_rest(s)) {
        Some(last_moving) if ends_at_rest => last_moving + 1,
        _ => speeds.len(),
    }
}
