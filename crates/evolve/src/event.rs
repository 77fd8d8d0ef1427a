use crate::{Individual, Statistics};

/// Emitted once the initial population is evaluated, and again after each
/// generation is combined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Generation {
    /// Zero for the initial population.
    pub generation: usize,
    pub statistics: Statistics,
    /// The fittest individual of this generation.
    pub best: Individual,
    /// Generations since the best fitness last improved.
    pub stagnant_for: usize,
}

/// Actions an observer can take during the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop and return the current population.
    StopEarly,
}
