use rand::{Rng, seq::SliceRandom};
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use crate::{Fitness, Genome};

/// A genome and its fitness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Individual {
    pub genome: Genome,
    pub fitness: Fitness,
}

impl Individual {
    /// An individual that still needs evaluating.
    #[must_use]
    pub fn unevaluated(genome: Genome) -> Self {
        Self {
            genome,
            fitness: Fitness::UNEVALUATED,
        }
    }
}

/// The fittest individual, or `None` for an empty population.
///
/// Ties keep the earliest individual.
#[must_use]
pub fn fittest(population: &[Individual]) -> Option<&Individual> {
    population.iter().fold(None, |best, candidate| match best {
        Some(best) if best.fitness >= candidate.fitness => Some(best),
        _ => Some(candidate),
    })
}

/// Tournament selection: each slot gets the fittest of `size` individuals
/// drawn without replacement.
pub fn select<R: Rng + ?Sized>(
    population: &[Individual],
    size: usize,
    rng: &mut R,
) -> Vec<Individual> {
    (0..population.len())
        .filter_map(|_| {
            let entrants: Vec<Individual> =
                population.choose_multiple(rng, size).copied().collect();
            fittest(&entrants).copied()
        })
        .collect()
}

/// Gaussian mutation with a per-gene rate.
#[derive(Debug, Clone, Copy)]
pub struct Mutation {
    rate: f64,
    noise: Normal<f64>,
}

impl Mutation {
    /// Returns `None` unless `scale` is finite and positive.
    #[must_use]
    pub fn new(rate: f64, scale: f64) -> Option<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        let noise = Normal::new(0.0, scale).ok()?;
        Some(Self { rate, noise })
    }

    /// Mutates each gene with probability `rate`, and one random gene if none
    /// was picked. Mutated genes are clamped back into `[0, 1]`.
    pub fn apply<R: Rng + ?Sized>(&self, genome: &Genome, rng: &mut R) -> Genome {
        let mut child = *genome;
        let genes = child.genes_mut();

        let mut picked: Vec<usize> = (0..genes.len())
            .filter(|_| rng.r#gen::<f64>() < self.rate)
            .collect();
        if picked.is_empty() {
            picked.push(rng.gen_range(0..genes.len()));
        }

        for i in picked {
            genes[i] = (genes[i] + self.noise.sample(rng)).clamp(0.0, 1.0);
        }
        child
    }
}

/// Elitist replacement: the fittest of `previous` takes the first slot and
/// the children fill the rest, dropping the last child.
#[must_use]
pub fn combine(previous: &[Individual], children: Vec<Individual>) -> Vec<Individual> {
    let Some(elite) = fittest(previous).copied() else {
        return children;
    };
    let keep = children.len().saturating_sub(1);

    std::iter::once(elite)
        .chain(children.into_iter().take(keep))
        .collect()
}

/// Worst, mean and best fitness of a population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub worst: Fitness,
    pub average: Fitness,
    pub best: Fitness,
}

impl Statistics {
    /// Returns `None` for an empty population.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn of(population: &[Individual]) -> Option<Self> {
        let best = fittest(population)?.fitness;
        let worst = population
            .iter()
            .map(|i| i.fitness)
            .fold(best, |worst, f| if f < worst { f } else { worst });

        let n = population.len() as f64;
        let average = Fitness {
            feasibility: population.iter().map(|i| i.fitness.feasibility).sum::<f64>() / n,
            objective: population.iter().map(|i| i.fitness.objective).sum::<f64>() / n,
        };

        Some(Self {
            worst,
            average,
            best,
        })
    }
}
