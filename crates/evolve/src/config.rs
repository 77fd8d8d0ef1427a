use cadence_wmr::{ControlConfig, SensorConfig, SuspensionConfig, WmrConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Design;

/// Parameters of the evolutionary search.
///
/// Every field has a default, so a TOML file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub population_size: usize,
    pub max_generations: usize,
    /// Seed for the deterministic random number generator.
    pub seed: u64,
    pub tournament_size: usize,
    /// Standard deviation of the Gaussian added to a mutated gene.
    pub mutation_scale: f64,
    /// Probability that each gene mutates. At least one gene always does.
    pub mutation_rate: f64,
    /// Generations without a better best individual before the search stops.
    pub stagnation_limit: usize,
    /// Design placed in the initial population alongside random genomes.
    pub seed_design: Option<Design>,
    pub scenario: Scenario,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 100,
            seed: 47,
            tournament_size: 3,
            mutation_scale: 0.08,
            mutation_rate: 1.0 / 8.0,
            stagnation_limit: 100,
            seed_design: Some(Design::default()),
            scenario: Scenario::default(),
        }
    }
}

/// Errors that can occur when validating an evolutionary search config.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("population size must be at least one")]
    PopulationSize,

    #[error("tournament size must be at least one")]
    TournamentSize,

    #[error("mutation scale must be finite and positive, got {0}")]
    MutationScale(f64),

    #[error("mutation rate must be in [0, 1], got {0}")]
    MutationRate(f64),

    #[error("stagnation limit must be at least one")]
    StagnationLimit,

    #[error("scenario duration must be finite and non-negative, got {0}")]
    Duration(f64),

    #[error("initial target distance must be finite and positive, got {0}")]
    TargetDistance(f64),

    #[error("speed tolerance must be finite and non-negative, got {0}")]
    SpeedTolerance(f64),
}

impl Config {
    /// # Errors
    ///
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::PopulationSize);
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::TournamentSize);
        }
        if !self.mutation_scale.is_finite() || self.mutation_scale <= 0.0 {
            return Err(ConfigError::MutationScale(self.mutation_scale));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRate(self.mutation_rate));
        }
        if self.stagnation_limit == 0 {
            return Err(ConfigError::StagnationLimit);
        }
        self.scenario.validate()
    }
}

/// The run every candidate design is scored on.
///
/// The robot starts at rest at `initial_position` with the arena's default
/// wall ahead, and is scored on how close to `target_location` it stops.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// Logical seconds simulated per evaluation.
    pub duration: f64,
    pub fixed_step: f64,
    pub control_period: f64,
    pub initial_position: f64,
    pub target_location: f64,
    /// Normalizes the final distance from the target.
    pub initial_target_distance: f64,
    /// Wheel speeds below this magnitude count as at rest.
    pub speed_tolerance: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            duration: 20.0,
            fixed_step: 0.01,
            control_period: 0.1,
            initial_position: 3.0,
            target_location: 20.0,
            initial_target_distance: 17.0,
            speed_tolerance: 0.05,
        }
    }
}

impl Scenario {
    /// # Errors
    ///
    /// Returns an error for a negative duration, a non-positive target
    /// distance, or a negative speed tolerance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(ConfigError::Duration(self.duration));
        }
        if !self.initial_target_distance.is_finite() || self.initial_target_distance <= 0.0 {
            return Err(ConfigError::TargetDistance(self.initial_target_distance));
        }
        if !self.speed_tolerance.is_finite() || self.speed_tolerance < 0.0 {
            return Err(ConfigError::SpeedTolerance(self.speed_tolerance));
        }
        Ok(())
    }

    /// The robot configuration for `design` in this scenario.
    #[must_use]
    pub fn robot(&self, design: &Design) -> WmrConfig {
        WmrConfig {
            wheel_radius: design.wheel_radius,
            chassis_length: design.chassis_length,
            initial_position: self.initial_position,
            angular_velocity: 0.0,
            fixed_step: self.fixed_step,
            sensor: SensorConfig {
                limit: design.sensor_limit,
                ..SensorConfig::default()
            },
            suspension: SuspensionConfig {
                frequency: design.suspension_frequency,
                damping: design.suspension_damping,
            },
            control: Some(ControlConfig {
                period: self.control_period,
                speed_slope: design.speed_slope,
                speed_intercept: design.speed_intercept,
                speed_max: design.speed_max,
            }),
            ..WmrConfig::default()
        }
    }
}
