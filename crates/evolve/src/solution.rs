use serde::Serialize;

use crate::{Individual, Statistics};

/// How the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Ran every configured generation.
    MaxGenerations,

    /// The best fitness stopped improving.
    Stagnated,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of an evolutionary search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub status: Status,

    /// Fittest individual of the final population.
    pub best: Individual,

    /// Final population, elite first.
    pub population: Vec<Individual>,

    /// Statistics per generation, starting with the initial population.
    pub history: Vec<Statistics>,

    /// Generations bred after the initial population.
    pub generations: usize,
}
